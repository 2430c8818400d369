pub mod report;

use crate::config::AnalyzerConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for radscan
#[derive(Parser, Debug)]
#[command(name = "radscan")]
#[command(about = "Multi-label chest radiograph findings from PNG, JPEG or DICOM")]
#[command(version)]
pub struct Cli {
    /// Path to image file (.png, .jpg, .dcm)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// ONNX model file (overrides RADSCAN_MODEL_PATH)
    #[arg(short, long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Label file, one label per line (overrides RADSCAN_LABELS_PATH)
    #[arg(short, long, value_name = "PATH")]
    pub labels: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Applies command-line overrides on top of an environment-derived config
    pub fn apply_to(&self, mut config: AnalyzerConfig) -> AnalyzerConfig {
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(labels) = &self.labels {
            config.labels_path = Some(labels.clone());
        }
        config
    }
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["radscan", "chest.png"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("chest.png"));
        assert!(matches!(cli.format, OutputFormat::Text));
        assert!(!cli.verbose);
        assert_eq!(cli.apply_to(AnalyzerConfig::default()), AnalyzerConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "radscan",
            "study.dcm",
            "--model",
            "/m/cxr.onnx",
            "--labels",
            "/m/labels.txt",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(cli.verbose);

        let config = cli.apply_to(AnalyzerConfig::default());
        assert_eq!(config.model_path, PathBuf::from("/m/cxr.onnx"));
        assert_eq!(config.labels_path, Some(PathBuf::from("/m/labels.txt")));
    }
}
