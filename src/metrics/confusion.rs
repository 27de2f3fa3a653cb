use crate::label::Label;

/// 2x2 count table indexed by (actual, predicted).
///
/// Only [`ConfusionMatrix::record`] mutates the counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one scored sample.
    pub fn record(&mut self, actual: Label, predicted: Label) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    #[inline]
    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    /// Number of scored samples whose actual class is `actual`.
    pub fn row_total(&self, actual: Label) -> usize {
        self.counts[actual.index()].iter().sum()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Cell divided by its row total; `None` for an empty row.
    pub fn row_ratio(&self, actual: Label, predicted: Label) -> Option<f64> {
        let row = self.row_total(actual);
        (row > 0).then(|| self.get(actual, predicted) as f64 / row as f64)
    }

    pub fn true_positives(&self) -> usize {
        self.get(Label::Nsfw, Label::Nsfw)
    }

    pub fn true_negatives(&self) -> usize {
        self.get(Label::Normal, Label::Normal)
    }

    pub fn false_positives(&self) -> usize {
        self.get(Label::Normal, Label::Nsfw)
    }

    pub fn false_negatives(&self) -> usize {
        self.get(Label::Nsfw, Label::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_increments_exactly_one_cell() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record(Label::Normal, Label::Nsfw);

        assert_eq!(matrix.false_positives(), 1);
        assert_eq!(matrix.true_positives(), 0);
        assert_eq!(matrix.true_negatives(), 0);
        assert_eq!(matrix.false_negatives(), 0);
        assert_eq!(matrix.total(), 1);
    }

    #[test]
    fn test_cells_map_to_binary_outcomes() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record(Label::Nsfw, Label::Nsfw);
        matrix.record(Label::Nsfw, Label::Normal);
        matrix.record(Label::Nsfw, Label::Normal);
        matrix.record(Label::Normal, Label::Normal);

        assert_eq!(matrix.true_positives(), 1);
        assert_eq!(matrix.false_negatives(), 2);
        assert_eq!(matrix.true_negatives(), 1);
        assert_eq!(matrix.row_total(Label::Nsfw), 3);
        assert_eq!(matrix.row_total(Label::Normal), 1);
        assert_eq!(matrix.total(), 4);
    }

    #[test]
    fn test_row_ratio_skips_empty_rows() {
        let mut matrix = ConfusionMatrix::new();
        matrix.record(Label::Normal, Label::Normal);
        matrix.record(Label::Normal, Label::Normal);
        matrix.record(Label::Normal, Label::Normal);
        matrix.record(Label::Normal, Label::Nsfw);

        assert_eq!(matrix.row_ratio(Label::Normal, Label::Normal), Some(0.75));
        assert_eq!(matrix.row_ratio(Label::Normal, Label::Nsfw), Some(0.25));
        assert_eq!(matrix.row_ratio(Label::Nsfw, Label::Nsfw), None);
    }

    #[test]
    fn test_new_matrix_is_empty() {
        assert!(ConfusionMatrix::new().is_empty());
    }
}
