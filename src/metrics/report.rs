use std::fmt;

use crate::label::Label;

use super::{ConfusionMatrix, Metrics};

/// Outcome of evaluating one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointReport {
    /// Endpoint display name
    pub name: String,

    /// Counts for every sample that produced a prediction
    pub matrix: ConfusionMatrix,

    /// Samples processed per class, indexed like [`Label::ALL`]
    pub processed: [usize; 2],

    /// Samples whose prediction failed
    pub failed: usize,

    /// Class folders absent from the dataset root
    pub missing_classes: Vec<Label>,
}

impl EndpointReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matrix: ConfusionMatrix::new(),
            processed: [0; 2],
            failed: 0,
            missing_classes: Vec::new(),
        }
    }

    pub fn processed(&self, label: Label) -> usize {
        self.processed[label.index()]
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::from_matrix(&self.matrix)
    }

    /// Whether at least one sample was scored.
    pub fn has_predictions(&self) -> bool {
        !self.matrix.is_empty()
    }

    /// Human-readable report text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn cell(matrix: &ConfusionMatrix, actual: Label, predicted: Label, width: usize) -> String {
    let ratio = match matrix.row_ratio(actual, predicted) {
        Some(r) => format!("{r:.2}"),
        None => "n/a".to_string(),
    };
    format!("{:>width$} ({ratio})", matrix.get(actual, predicted))
}

impl fmt::Display for EndpointReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Results for {} ---", self.name)?;
        for label in &self.missing_classes {
            writeln!(f, "Missing class folder: {}", label.dir_name())?;
        }
        writeln!(
            f,
            "Number of NSFW images processed: {}",
            self.processed(Label::Nsfw)
        )?;
        writeln!(
            f,
            "Number of Normal images processed: {}",
            self.processed(Label::Normal)
        )?;
        writeln!(f, "Failed predictions: {}", self.failed)?;

        if !self.has_predictions() {
            return writeln!(
                f,
                "No predictions were made for {}. Check endpoint and dataset.",
                self.name
            );
        }

        let m = &self.matrix;
        writeln!(f)?;
        writeln!(f, "Confusion Matrix for {} Model:", self.name)?;
        writeln!(
            f,
            "{:>13} | {:>25} | {:>23}",
            "", "Predicted Normal", "Predicted NSFW"
        )?;
        writeln!(f, "{}", "-".repeat(67))?;
        for actual in Label::ALL {
            let row_name = match actual {
                Label::Normal => "Actual Normal",
                Label::Nsfw => "Actual NSFW",
            };
            writeln!(
                f,
                "{:>13} | {} | {}",
                row_name,
                cell(m, actual, Label::Normal, 18),
                cell(m, actual, Label::Nsfw, 16)
            )?;
        }
        writeln!(f)?;

        let metrics = self.metrics();
        match metrics.accuracy {
            Some(accuracy) => writeln!(f, "Accuracy: {accuracy:.4}")?,
            None => writeln!(f, "Accuracy: N/A")?,
        }
        writeln!(f, "Precision: {:.4}", metrics.precision)?;
        writeln!(f, "Recall (Sensitivity): {:.4}", metrics.recall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored_report() -> EndpointReport {
        let mut report = EndpointReport::new("nsfwjs");
        for (actual, predicted) in [
            (Label::Normal, Label::Normal),
            (Label::Normal, Label::Normal),
            (Label::Normal, Label::Nsfw),
            (Label::Nsfw, Label::Nsfw),
            (Label::Nsfw, Label::Nsfw),
        ] {
            report.matrix.record(actual, predicted);
        }
        report.processed = [3, 2];
        report
    }

    #[test]
    fn test_render_contains_counts_ratios_and_metrics() {
        let text = scored_report().render();

        assert!(text.contains("Confusion Matrix for nsfwjs Model:"));
        assert!(text.contains("Number of NSFW images processed: 2"));
        assert!(text.contains("Number of Normal images processed: 3"));
        assert!(text.contains("2 (0.67)"));
        assert!(text.contains("1 (0.33)"));
        assert!(text.contains("0 (0.00)"));
        assert!(text.contains("2 (1.00)"));
        assert!(text.contains("Accuracy: 0.8000"));
        assert!(text.contains("Precision: 0.6667"));
        assert!(text.contains("Recall (Sensitivity): 1.0000"));
    }

    #[test]
    fn test_render_is_reproducible() {
        assert_eq!(scored_report().render(), scored_report().render());
    }

    #[test]
    fn test_render_empty_row_ratio() {
        let mut report = EndpointReport::new("normal-only");
        report.matrix.record(Label::Normal, Label::Normal);
        report.processed = [1, 0];
        report.missing_classes = vec![Label::Nsfw];

        let text = report.render();
        assert!(text.contains("Missing class folder: nsfw"));
        assert!(text.contains("0 (n/a)"));
        assert!(text.contains("Accuracy: 1.0000"));
    }

    #[test]
    fn test_render_without_predictions() {
        let mut report = EndpointReport::new("offline");
        report.failed = 4;

        let text = report.render();
        assert!(text.contains("No predictions were made for offline. Check endpoint and dataset."));
        assert!(text.contains("Failed predictions: 4"));
        assert!(!text.contains("Accuracy"));
        assert!(!text.contains("Confusion Matrix"));
    }
}
