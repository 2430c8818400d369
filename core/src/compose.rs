//! Ranking and report assembly
//!
//! Turns an index-aligned probability vector into the final [`AnalysisReport`].

use crate::error::{RadscanError, Result};
use crate::types::{AnalysisReport, Finding, LabelSet};

/// Number of ranked findings kept in the report
pub const TOP_K: usize = 5;

/// Probability at or above which a label is reported as positive
pub const POSITIVE_THRESHOLD: f32 = 0.5;

/// Prefix of the summary line listing positive labels
pub const POSITIVE_LINE_PREFIX: &str = "Positive findings (p≥0.5): ";

/// Sole summary line when nothing else was produced
pub const NO_FINDINGS_LINE: &str = "No strong positive findings";

/// Pairs every label with its probability, in label order
pub fn all_findings(labels: &LabelSet, probs: &[f32]) -> Result<Vec<Finding>> {
    if labels.len() != probs.len() {
        return Err(RadscanError::Inference(format!(
            "{} probabilities for {} labels",
            probs.len(),
            labels.len()
        )));
    }
    labels
        .iter()
        .zip(probs)
        .map(|(label, &prob)| {
            if !(0.0..=1.0).contains(&prob) {
                return Err(RadscanError::Inference(format!(
                    "Probability {} for {} is outside [0, 1]",
                    prob, label
                )));
            }
            Ok(Finding::new(label, prob))
        })
        .collect()
}

/// Highest `k` findings, descending; equal probabilities keep label order
pub fn top_k(findings: &[Finding], k: usize) -> Vec<Finding> {
    let mut ranked = findings.to_vec();
    // sort_by is stable
    ranked.sort_by(|a, b| b.prob.total_cmp(&a.prob));
    ranked.truncate(k);
    ranked
}

/// Labels with probability at or above the threshold, in label order
pub fn positive_labels(findings: &[Finding]) -> Vec<String> {
    findings
        .iter()
        .filter(|f| f.prob >= POSITIVE_THRESHOLD)
        .map(|f| f.label.clone())
        .collect()
}

/// Human-readable summary lines; never empty
pub fn summary_lines(top: &[Finding], positive: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(top.len() + 1);
    if !positive.is_empty() {
        lines.push(format!("{}{}", POSITIVE_LINE_PREFIX, positive.join(", ")));
    }
    lines.extend(top.iter().map(|f| format!("{}: {:.2}", f.label, f.prob)));
    if lines.is_empty() {
        lines.push(NO_FINDINGS_LINE.to_string());
    }
    lines
}

/// Builds the full report
///
/// # Errors
///
/// Returns `Inference` if the vector length differs from the label count or any
/// probability is outside [0, 1]
pub fn compose(
    labels: &LabelSet,
    probs: &[f32],
    shape: (u32, u32),
    modality: &str,
) -> Result<AnalysisReport> {
    let findings = all_findings(labels, probs)?;
    let top5 = top_k(&findings, TOP_K);
    let positive = positive_labels(&findings);
    let lines = summary_lines(&top5, &positive);

    Ok(AnalysisReport {
        modality: modality.to_string(),
        shape,
        top5,
        positive,
        findings: lines,
    })
}
