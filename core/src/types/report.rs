use serde::{Deserialize, Serialize};

/// A single label with its independent probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub label: String,
    pub prob: f32,
}

impl Finding {
    pub fn new(label: impl Into<String>, prob: f32) -> Self {
        Self {
            label: label.into(),
            prob,
        }
    }
}

/// Structured result of one image analysis
///
/// Serializes to the `{modality, shape, top5, positive, findings}` wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Free-text modality guess
    pub modality: String,

    /// Original (width, height) of the decoded image
    pub shape: (u32, u32),

    /// Highest probabilities, descending, ties in label order
    pub top5: Vec<Finding>,

    /// Labels at or above the positivity threshold, in label order
    pub positive: Vec<String>,

    /// Human-readable summary lines, never empty
    pub findings: Vec<String>,
}

impl AnalysisReport {
    /// Returns whether any label cleared the positivity threshold
    pub fn has_positive_findings(&self) -> bool {
        !self.positive.is_empty()
    }
}
