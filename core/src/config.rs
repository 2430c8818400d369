use crate::classifier::RuntimeConfig;
use crate::error::{RadscanError, Result};
use crate::types::LabelSet;
use std::env;
use std::path::PathBuf;

pub const ENV_MODEL_PATH: &str = "RADSCAN_MODEL_PATH";
pub const ENV_LABELS_PATH: &str = "RADSCAN_LABELS_PATH";
pub const ENV_MODALITY: &str = "RADSCAN_MODALITY";
pub const ENV_INTRA_THREADS: &str = "RADSCAN_INTRA_THREADS";

pub const DEFAULT_MODEL_PATH: &str = "models/densenet121-res224-all.onnx";
pub const DEFAULT_MODALITY: &str = "chest-xray (inferred)";

/// Settings needed to build an [`ImageAnalyzer`](crate::ImageAnalyzer)
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// ONNX model file
    pub model_path: PathBuf,

    /// Optional label file; the reference pathologies are used when absent
    pub labels_path: Option<PathBuf>,

    /// Modality text placed in every report
    pub modality: String,

    pub runtime: RuntimeConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: None,
            modality: DEFAULT_MODALITY.to_string(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Reads overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_MODEL_PATH) {
            config.model_path = PathBuf::from(path);
        }
        if let Some(path) = get(ENV_LABELS_PATH) {
            config.labels_path = Some(PathBuf::from(path));
        }
        if let Some(modality) = get(ENV_MODALITY) {
            config.modality = modality.trim().to_string();
        }
        if let Some(threads) = get(ENV_INTRA_THREADS) {
            config.runtime.intra_threads = threads.trim().parse().map_err(|e| {
                RadscanError::Config(format!(
                    "{} must be a non-negative integer, got '{}': {}",
                    ENV_INTRA_THREADS, threads, e
                ))
            })?;
        }

        Ok(config)
    }

    /// Loads the label vocabulary the model was exported with
    pub fn load_labels(&self) -> Result<LabelSet> {
        match &self.labels_path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    RadscanError::Config(format!(
                        "Failed to read label file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                LabelSet::from_lines(&content)
            }
            None => Ok(LabelSet::chest_xray_default()),
        }
    }
}
