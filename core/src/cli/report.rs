use crate::types::AnalysisReport;
use std::fmt;

/// Text report formatter for analysis results
pub struct TextReport<'a> {
    report: &'a AnalysisReport,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Radiograph Findings")?;
        writeln!(f, "===================")?;
        writeln!(f)?;
        writeln!(f, "Modality:       {}", self.report.modality)?;
        writeln!(
            f,
            "Shape:          {}x{}",
            self.report.shape.0, self.report.shape.1
        )?;
        let positive = if self.report.has_positive_findings() {
            self.report.positive.join(", ")
        } else {
            "none".to_string()
        };
        writeln!(f, "Positive:       {}", positive)?;
        writeln!(f)?;

        writeln!(f, "Top Findings")?;
        writeln!(f, "------------")?;
        for finding in &self.report.top5 {
            writeln!(f, "{:<28} {:.2}", finding.label, finding.prob)?;
        }
        writeln!(f)?;

        writeln!(f, "Summary")?;
        writeln!(f, "-------")?;
        for line in &self.report.findings {
            writeln!(f, "{}", line)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Finding;

    #[test]
    fn test_text_report_format() {
        let report = AnalysisReport {
            modality: "chest-xray (inferred)".to_string(),
            shape: (2048, 2500),
            top5: vec![Finding::new("Cardiomegaly", 0.72), Finding::new("Edema", 0.31)],
            positive: vec!["Cardiomegaly".to_string()],
            findings: vec![
                "Positive findings (p≥0.5): Cardiomegaly".to_string(),
                "Cardiomegaly: 0.72".to_string(),
                "Edema: 0.31".to_string(),
            ],
        };

        let output = format!("{}", TextReport::new(&report));

        assert!(output.contains("Radiograph Findings"));
        assert!(output.contains("Modality:       chest-xray (inferred)"));
        assert!(output.contains("Shape:          2048x2500"));
        assert!(output.contains("Positive:       Cardiomegaly"));
        assert!(output.contains("Edema"));
        assert!(output.contains("Positive findings (p≥0.5): Cardiomegaly"));
    }

    #[test]
    fn test_text_report_without_positives() {
        let report = AnalysisReport {
            modality: "chest-xray (inferred)".to_string(),
            shape: (10, 10),
            top5: vec![],
            positive: vec![],
            findings: vec!["No strong positive findings".to_string()],
        };
        let output = TextReport::new(&report).to_string();
        assert!(output.contains("Positive:       none"));
        assert!(output.contains("No strong positive findings"));
    }
}
