//! Command implementations for the akar CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::analysis::analyzer::Normalizer;
use crate::analysis::token_filter::StopFilter;
use crate::artifacts::{self, load_stemmer};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PipelineConfig;
use crate::error::{AkarError, Result};
use crate::ml::tfidf::FitOptions;
use crate::ml::training::{load_training_data, train};
use crate::pipeline::orchestrator::Pipeline;
use crate::stemming::Stemmer;

/// Execute a CLI command.
pub fn execute_command(args: AkarArgs) -> Result<()> {
    match &args.command {
        Command::Stem(stem_args) => stem_words(stem_args, &args),
        Command::Normalize(normalize_args) => normalize_text(normalize_args, &args),
        Command::Classify(classify_args) => classify_text(classify_args, &args),
        Command::Batch(batch_args) => classify_batch(batch_args, &args),
        Command::Train(train_args) => train_model(train_args, &args),
        Command::Stats => show_stats(&args),
    }
}

/// Stem words. Only the dictionary and rules are loaded.
fn stem_words(args: &StemArgs, cli_args: &AkarArgs) -> Result<()> {
    let config = cli_args.pipeline_config()?;
    let stemmer = load_stemmer(&config)?;

    let results: Vec<_> = args.words.iter().map(|word| stemmer.stem(word)).collect();
    if args.trace {
        return output_result("Stemming trace", &results, cli_args);
    }

    let output: Vec<StemOutput> = results
        .into_iter()
        .map(|result| StemOutput {
            word: result.original,
            root: result.root,
            success: result.success,
        })
        .collect();
    output_result("Stemmed words", &output, cli_args)
}

/// Normalize a text into root tokens.
fn normalize_text(args: &NormalizeArgs, cli_args: &AkarArgs) -> Result<()> {
    let config = cli_args.pipeline_config()?;
    let normalizer = build_normalizer(&config)?;

    if args.trace {
        let trace = normalizer.normalize_with_trace(&args.text)?;
        return output_result("Normalization trace", &trace, cli_args);
    }

    let document = normalizer.normalize(&args.text)?;
    output_result(
        "Normalized text",
        &NormalizeOutput {
            fingerprint: document.fingerprint.to_hex(),
            roots: document.roots().into_iter().map(String::from).collect(),
        },
        cli_args,
    )
}

/// Classify one text end to end.
fn classify_text(args: &ClassifyArgs, cli_args: &AkarArgs) -> Result<()> {
    let pipeline = load_pipeline(cli_args)?;
    let result = pipeline.run(&args.text)?;
    output_result("Classification", &result, cli_args)
}

/// Classify every text in a file, keeping input order.
fn classify_batch(args: &BatchArgs, cli_args: &AkarArgs) -> Result<()> {
    let texts = read_batch_file(&args.file)?;
    let pipeline = load_pipeline(cli_args)?;

    let start_time = Instant::now();
    let results = pipeline.run_batch(&texts);
    let duration = start_time.elapsed();

    let items: Vec<BatchItem> = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(result) => BatchItem {
                index,
                result: Some(result),
                error: None,
            },
            Err(e) => BatchItem {
                index,
                result: None,
                error: Some(e.to_string()),
            },
        })
        .collect();
    let failed = items.iter().filter(|item| item.error.is_some()).count();

    output_result(
        "Batch classification",
        &BatchOutput {
            succeeded: items.len() - failed,
            failed,
            items,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Fit and write vocabulary.json and model.json.
fn train_model(args: &TrainArgs, cli_args: &AkarArgs) -> Result<()> {
    let config = cli_args.pipeline_config()?;
    let normalizer = build_normalizer(&config)?;
    let samples = load_training_data(&args.samples)?;

    let options = FitOptions {
        min_df: args.min_df,
        max_df: args.max_df,
        max_features: Some(args.max_features),
        ..FitOptions::default()
    };
    let (vectorizer, model, report) = train(&samples, &normalizer, &options)?;

    fs::create_dir_all(&args.out_dir)?;
    let vocabulary_path = args.out_dir.join("vocabulary.json");
    let model_path = args.out_dir.join("model.json");
    vectorizer.save(&vocabulary_path)?;
    model.save(&model_path)?;
    info!("Wrote {} and {}", vocabulary_path.display(), model_path.display());

    output_result(
        "Training complete",
        &TrainOutput {
            vocabulary_path: vocabulary_path.to_string_lossy().to_string(),
            model_path: model_path.to_string_lossy().to_string(),
            report,
        },
        cli_args,
    )
}

/// Show artifact and pipeline statistics.
fn show_stats(cli_args: &AkarArgs) -> Result<()> {
    let pipeline = load_pipeline(cli_args)?;
    output_result("Pipeline statistics", &pipeline.stats(), cli_args)
}

fn load_pipeline(cli_args: &AkarArgs) -> Result<Pipeline> {
    let config = cli_args.pipeline_config()?;
    let artifacts = artifacts::init_global(&config)?;
    Pipeline::new(artifacts, &config)
}

/// A normalizer needs the dictionary but not the vocabulary or model.
fn build_normalizer(config: &PipelineConfig) -> Result<Normalizer> {
    config.validate()?;
    let stemmer = load_stemmer(config)?;
    let stop_filter = match &config.artifacts.stopwords {
        Some(path) => StopFilter::load(path)?,
        None => StopFilter::new(),
    };
    Normalizer::new(&config.analysis, Arc::new(stemmer), stop_filter)
}

/// Non-empty lines, or a JSON array of strings for `.json` files.
fn read_batch_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;

    if path.extension().is_some_and(|ext| ext == "json") {
        return serde_json::from_str(&content).map_err(|e| {
            AkarError::invalid_input(format!(
                "{} is not a JSON array of strings: {e}",
                path.display()
            ))
        });
    }

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect())
}
