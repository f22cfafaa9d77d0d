//! Command line argument parsing for the akar CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::Result;

/// akar - Indonesian stemming, normalization and text classification
#[derive(Parser, Debug, Clone)]
#[command(name = "akar")]
#[command(about = "Rule-based Indonesian stemming and text classification")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct AkarArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, env = "AKAR_CONFIG", value_name = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Root word dictionary (overrides the config file)
    #[arg(long, value_name = "FILE", global = true)]
    pub dictionary: Option<PathBuf>,

    /// Stopword list (overrides the config file)
    #[arg(long, value_name = "FILE", global = true)]
    pub stopwords: Option<PathBuf>,

    /// Affix rule table (overrides the config file)
    #[arg(long, value_name = "FILE", global = true)]
    pub rules: Option<PathBuf>,

    /// Frozen vocabulary (overrides the config file)
    #[arg(long, value_name = "FILE", global = true)]
    pub vocabulary: Option<PathBuf>,

    /// Classifier model (overrides the config file)
    #[arg(long, value_name = "FILE", global = true)]
    pub model: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl AkarArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// The config file, if any, with path overrides applied.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(path) = &self.dictionary {
            config = config.with_dictionary(path);
        }
        if let Some(path) = &self.stopwords {
            config = config.with_stopwords(path);
        }
        if let Some(path) = &self.rules {
            config = config.with_rules(path);
        }
        if let Some(path) = &self.vocabulary {
            config = config.with_vocabulary(path);
        }
        if let Some(path) = &self.model {
            config = config.with_model(path);
        }
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Stem words with the dictionary and rule table
    Stem(StemArgs),

    /// Normalize text into root tokens
    Normalize(NormalizeArgs),

    /// Classify a text
    Classify(ClassifyArgs),

    /// Classify every text in a file
    Batch(BatchArgs),

    /// Fit a vocabulary and centroid model from labeled samples
    Train(TrainArgs),

    /// Show artifact and pipeline statistics
    Stats,
}

/// Arguments for stemming
#[derive(Parser, Debug, Clone)]
pub struct StemArgs {
    /// Words to stem
    #[arg(value_name = "WORD", required = true)]
    pub words: Vec<String>,

    /// Show the rules applied to each word
    #[arg(long)]
    pub trace: bool,
}

/// Arguments for normalization
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Text to normalize
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Show every intermediate step
    #[arg(long)]
    pub trace: bool,
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Text to classify
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Arguments for batch classification
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// One text per line, or a JSON array of strings for `.json` files
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// JSON array of `{"text": .., "label": ..}` samples
    #[arg(value_name = "SAMPLES")]
    pub samples: PathBuf,

    /// Directory receiving vocabulary.json and model.json
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Drop terms found in fewer documents
    #[arg(long, default_value = "2")]
    pub min_df: usize,

    /// Drop terms found in a larger fraction of documents
    #[arg(long, default_value = "0.85")]
    pub max_df: f32,

    /// Keep at most this many terms
    #[arg(long, default_value = "5000")]
    pub max_features: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
