//! Chest radiograph intake and multi-label inference
//!
//! Bytes are decoded (DICOM or PNG/JPEG), resized and standardized into a
//! 224x224 tensor, passed through a multi-label classifier, and ranked into an
//! [`AnalysisReport`].

pub mod api;
pub mod classifier;
pub mod cli;
pub mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod intake;
pub mod preprocess;
pub mod types;

pub use api::{ImageAnalyzer, SharedAnalyzer};
pub use classifier::{Backbone, Classifier, OnnxBackbone, RuntimeConfig};
pub use cli::report::TextReport;
pub use config::AnalyzerConfig;
pub use context::ImagingFindings;
pub use error::{RadscanError, Result};
pub use types::*;
