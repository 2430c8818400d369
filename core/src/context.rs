//! Hand-off of report findings to the summarization and chat collaborators
//!
//! Both collaborators consume the same flat `imaging_findings` list and render it
//! as a bulleted block; that rendering lives here once.

use crate::types::AnalysisReport;
use serde::{Deserialize, Serialize};

/// Maximum findings lines included in a chat context
pub const CHAT_FINDINGS_LIMIT: usize = 20;

/// Placeholder bullet when no findings were supplied
pub const NO_FINDINGS_BULLET: &str = "- (none provided)";

/// The literal `imaging_findings` field: a flat list of plain strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagingFindings(pub Vec<String>);

impl ImagingFindings {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&AnalysisReport> for ImagingFindings {
    fn from(report: &AnalysisReport) -> Self {
        Self(report.findings.clone())
    }
}

impl From<AnalysisReport> for ImagingFindings {
    fn from(report: AnalysisReport) -> Self {
        Self(report.findings)
    }
}

/// Renders findings as `- line` bullets, optionally keeping only the first `limit`
pub fn render_findings_block(findings: &[String], limit: Option<usize>) -> String {
    let kept = limit.unwrap_or(findings.len()).min(findings.len());
    if kept == 0 {
        return NO_FINDINGS_BULLET.to_string();
    }
    findings[..kept]
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}
