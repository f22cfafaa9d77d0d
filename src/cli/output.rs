//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{AkarArgs, OutputFormat};
use crate::error::Result;
use crate::ml::training::TrainingReport;
use crate::pipeline::document::ClassificationResult;

/// Result structure for one stemmed word.
#[derive(Debug, Serialize, Deserialize)]
pub struct StemOutput {
    pub word: String,
    pub root: String,
    pub success: bool,
}

/// Result structure for normalization.
#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeOutput {
    pub fingerprint: String,
    pub roots: Vec<String>,
}

/// One line of a batch run. Exactly one of `result` and `error` is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ClassificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result structure for batch classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchOutput {
    pub items: Vec<BatchItem>,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainOutput {
    pub vocabulary_path: String,
    pub model_path: String,
    pub report: TrainingReport,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &AkarArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &AkarArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    for line in human_lines(&value) {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &AkarArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Render a value as `key: value` lines; arrays of records get one line per
/// element.
fn human_lines(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| match val {
                serde_json::Value::Array(items) if items.iter().any(|v| v.is_object()) => {
                    let mut lines = vec![format!("{key}:")];
                    lines.extend(items.iter().map(|item| format!("  {}", format_value(item))));
                    lines.join("\n")
                }
                _ => format!("{key}: {}", format_value(val)),
            })
            .collect(),
        serde_json::Value::Array(items) => items.iter().map(format_value).collect(),
        _ => vec![format_value(value)],
    }
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(obj) => obj
            .iter()
            .map(|(key, val)| format!("{key}={}", format_value(val)))
            .collect::<Vec<_>>()
            .join(" "),
        serde_json::Value::Null => "null".to_string(),
    }
}
