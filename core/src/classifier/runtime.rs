use crate::error::{RadscanError, Result};
use log::info;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

/// Graph optimization applied when the session is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizationLevel {
    Disable,
    Basic,
    Extended,
    #[default]
    All,
}

impl OptimizationLevel {
    fn to_ort(self) -> GraphOptimizationLevel {
        match self {
            OptimizationLevel::Disable => GraphOptimizationLevel::Disable,
            OptimizationLevel::Basic => GraphOptimizationLevel::Level1,
            OptimizationLevel::Extended => GraphOptimizationLevel::Level2,
            OptimizationLevel::All => GraphOptimizationLevel::Level3,
        }
    }
}

/// ONNX Runtime session settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// 0 lets ONNX Runtime decide
    pub intra_threads: usize,
    /// 0 lets ONNX Runtime decide
    pub inter_threads: usize,
    pub optimization_level: OptimizationLevel,
}

/// Commits the process-wide ONNX environment exactly once
pub fn ensure_initialized() {
    INIT.call_once(|| {
        let _ = ort::init().with_name("radscan").commit();
    });
}

pub fn create_session_builder(config: &RuntimeConfig) -> Result<SessionBuilder> {
    ensure_initialized();
    let mut builder = Session::builder()
        .map_err(|e: ort::Error| RadscanError::Inference(e.to_string()))?;

    if config.inter_threads > 0 {
        builder = builder
            .with_inter_threads(config.inter_threads)
            .map_err(|e: ort::Error| RadscanError::Inference(e.to_string()))?;
    }
    if config.intra_threads > 0 {
        builder = builder
            .with_intra_threads(config.intra_threads)
            .map_err(|e: ort::Error| RadscanError::Inference(e.to_string()))?;
    }

    builder
        .with_optimization_level(config.optimization_level.to_ort())
        .map_err(|e: ort::Error| RadscanError::Inference(e.to_string()))
}

/// Loads an ONNX model file into a session
///
/// # Errors
///
/// Returns `Config` if the file does not exist, `Inference` if ONNX Runtime rejects it
pub fn load_session(model_path: &Path, config: &RuntimeConfig) -> Result<Session> {
    if !model_path.is_file() {
        return Err(RadscanError::Config(format!(
            "Model file not found: {}",
            model_path.display()
        )));
    }
    let session = create_session_builder(config)?
        .commit_from_file(model_path)
        .map_err(|e: ort::Error| {
            RadscanError::Inference(format!("ONNX load failed for {}: {}", model_path.display(), e))
        })?;
    info!("Loaded ONNX model from {}", model_path.display());
    Ok(session)
}
