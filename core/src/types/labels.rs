use crate::error::{RadscanError, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Pathologies emitted by the reference chest radiograph model, in output order
pub const CHEST_XRAY_PATHOLOGIES: [&str; 18] = [
    "Atelectasis",
    "Consolidation",
    "Infiltration",
    "Pneumothorax",
    "Edema",
    "Emphysema",
    "Fibrosis",
    "Effusion",
    "Pneumonia",
    "Pleural_Thickening",
    "Cardiomegaly",
    "Nodule",
    "Mass",
    "Hernia",
    "Lung Lesion",
    "Fracture",
    "Lung Opacity",
    "Enlarged Cardiomediastinum",
];

/// Ordered, immutable label vocabulary
///
/// Index `i` of every probability vector corresponds to `labels[i]`. Clones share
/// the same backing slice, so the ordering cannot diverge between holders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Arc<[String]>,
}

impl LabelSet {
    /// Creates a label set, rejecting empty, blank or duplicate labels
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(RadscanError::Config("Label set cannot be empty".into()));
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if label.trim().is_empty() {
                return Err(RadscanError::Config("Label set contains a blank label".into()));
            }
            if !seen.insert(label.as_str()) {
                return Err(RadscanError::Config(format!("Duplicate label: {}", label)));
            }
        }
        Ok(Self {
            labels: labels.into(),
        })
    }

    /// The 18 reference chest radiograph pathologies
    pub fn chest_xray_default() -> Self {
        Self {
            labels: CHEST_XRAY_PATHOLOGIES
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .into(),
        }
    }

    /// Parses a label file: one label per line, blank lines and `#` comments skipped
    pub fn from_lines(content: &str) -> Result<Self> {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels.join(", "))
    }
}
