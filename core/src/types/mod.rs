//! Core type definitions for the analysis pipeline
//!
//! This module provides the records passed between pipeline stages:
//! - [`RawImagePayload`]: Borrowed upload bytes plus filename hint
//! - [`DecodedImage`]: Single-channel intensity grid in [0, 1]
//! - [`NormalizedTensor`]: Fixed 224x224 standardized classifier input
//! - [`LabelSet`]: Ordered, immutable pathology vocabulary
//! - [`Finding`] and [`AnalysisReport`]: Ranked, serializable output
//! - [`PhotometricInterpretation`] and [`SourceFormat`]: Decoder classification enums

mod enums;
mod image;
mod labels;
mod payload;
mod report;

pub use enums::{PhotometricInterpretation, SourceFormat};
pub use image::{DecodedImage, NormalizedTensor, MODEL_INPUT_SIZE};
pub use labels::{LabelSet, CHEST_XRAY_PATHOLOGIES};
pub use payload::RawImagePayload;
pub use report::{AnalysisReport, Finding};
