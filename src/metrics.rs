// -- submodules
mod confusion;
mod report;

pub use confusion::ConfusionMatrix;
pub use report::EndpointReport;

/// Scores derived from a binary confusion matrix, with `nsfw` as positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// `None` when the matrix is empty
    pub accuracy: Option<f64>,

    /// 0 when nothing was predicted nsfw
    pub precision: f64,

    /// 0 when no nsfw sample was scored
    pub recall: f64,
}

impl Metrics {
    pub fn from_matrix(matrix: &ConfusionMatrix) -> Self {
        let tp = matrix.true_positives() as f64;
        let tn = matrix.true_negatives() as f64;
        let fp = matrix.false_positives() as f64;
        let fne = matrix.false_negatives() as f64;
        let total = matrix.total();

        let accuracy = (total > 0).then(|| (tp + tn) / total as f64);
        let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let recall = if tp + fne > 0.0 { tp / (tp + fne) } else { 0.0 };

        Self {
            accuracy,
            precision,
            recall,
        }
    }
}
