//! Correlation, reliability, and confusion statistics.
//!
//! Small-sample trials routinely produce degenerate inputs (constant
//! predictions, empty assess sets). Every statistic here answers those with
//! NaN instead of panicking, so a multi-trial run can record the undefined
//! value and continue.

use std::fmt;

use serde::Serialize;

/// Arithmetic mean; NaN for an empty sequence.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; NaN for an empty sequence.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let center = mean(values);
    values.iter().map(|v| (v - center).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation; NaN for an empty sequence.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Pearson's r between two equal-length sequences.
///
/// Undefined (NaN) when either sequence has zero variance or fewer than
/// two values.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);
    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    covariance / (var_x.sqrt() * var_y.sqrt())
}

/// Cronbach's alpha over k raters scoring the same item set.
///
/// Closed form `(k / (k - 1)) * (1 - sum of per-rater variances / variance
/// of summed ratings)`, with population variances. Undefined (NaN) when
/// there are fewer than two raters, the item set is empty, the raters
/// disagree on item count, or the summed ratings have zero variance.
pub fn cronbach_alpha(raters: &[Vec<f64>]) -> f64 {
    let k = raters.len();
    if k < 2 {
        return f64::NAN;
    }
    let items = raters[0].len();
    if items == 0 || raters.iter().any(|r| r.len() != items) {
        return f64::NAN;
    }

    let rater_variance_sum: f64 = raters.iter().map(|rater| variance(rater)).sum();
    let totals: Vec<f64> = (0..items)
        .map(|item| raters.iter().map(|rater| rater[item]).sum())
        .collect();
    let total_variance = variance(&totals);
    if total_variance == 0.0 {
        return f64::NAN;
    }

    (k as f64 / (k as f64 - 1.0)) * (1.0 - rater_variance_sum / total_variance)
}

/// Counts of (true, predicted) label pairs.
///
/// Rows are truth; columns are predictions. Labels are the sorted union of
/// both sequences, so every observed label gets a row and a column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfusionMatrix {
    labels: Vec<i64>,
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// An empty matrix with no labels, used before any trial has run.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs(truth: &[i64], predicted: &[i64]) -> Self {
        let mut labels: Vec<i64> = truth.iter().chain(predicted.iter()).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let position = |label: i64| labels.binary_search(&label).unwrap_or(0);
        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (&t, &p) in truth.iter().zip(predicted.iter()) {
            counts[position(t)][position(p)] += 1;
        }

        Self { labels, counts }
    }

    /// The labels indexing both axes, in sorted order.
    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Count of examples with the given true and predicted labels.
    pub fn count(&self, truth: i64, predicted: i64) -> usize {
        match (
            self.labels.binary_search(&truth),
            self.labels.binary_search(&predicted),
        ) {
            (Ok(row), Ok(column)) => self.counts[row][column],
            _ => 0,
        }
    }

    /// Total number of counted pairs.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows are truth; columns are predictions")?;
        write!(f, "{:>8}", "")?;
        for label in &self.labels {
            write!(f, "{:>8}", label)?;
        }
        writeln!(f)?;
        for (row, label) in self.labels.iter().enumerate() {
            write!(f, "{:>8}", label)?;
            for count in &self.counts[row] {
                write!(f, "{:>8}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_of_known_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(std_dev(&values), 2.0);
    }

    #[test]
    fn pearson_of_linear_sequences_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);

        let inverted = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &inverted) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_constant_sequence_is_nan() {
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_nan());
        assert!(pearson(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn pearson_of_mismatched_or_short_sequences_is_nan() {
        assert!(pearson(&[1.0], &[1.0]).is_nan());
        assert!(pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn alpha_of_identical_raters_is_one() {
        let raters = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]];
        assert!((cronbach_alpha(&raters) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn alpha_of_opposed_raters_is_nan() {
        // Summed ratings are constant, so the denominator vanishes.
        let raters = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
        assert!(cronbach_alpha(&raters).is_nan());
    }

    #[test]
    fn alpha_of_known_disagreement() {
        let raters = vec![vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0, 4.0, 3.0]];
        // Per-rater variances are both 1.25; totals [2, 4, 7, 7] have
        // variance 4.5. alpha = 2 * (1 - 2.5 / 4.5).
        let expected = 2.0 * (1.0 - 2.5 / 4.5);
        assert!((cronbach_alpha(&raters) - expected).abs() < 1e-12);
    }

    #[test]
    fn alpha_needs_two_raters_and_items() {
        assert!(cronbach_alpha(&[vec![1.0, 2.0]]).is_nan());
        assert!(cronbach_alpha(&[vec![], vec![]]).is_nan());
        assert!(cronbach_alpha(&[vec![1.0], vec![1.0, 2.0]]).is_nan());
    }

    #[test]
    fn confusion_matrix_counts_pairs() {
        let truth = [1, 1, 2, 3];
        let predicted = [1, 2, 2, 3];
        let matrix = ConfusionMatrix::from_pairs(&truth, &predicted);

        assert_eq!(matrix.labels(), [1, 2, 3]);
        assert_eq!(matrix.count(1, 1), 1);
        assert_eq!(matrix.count(1, 2), 1);
        assert_eq!(matrix.count(2, 2), 1);
        assert_eq!(matrix.count(3, 3), 1);
        assert_eq!(matrix.count(3, 1), 0);
        assert_eq!(matrix.total(), 4);
    }

    #[test]
    fn confusion_matrix_covers_prediction_only_labels() {
        let matrix = ConfusionMatrix::from_pairs(&[1, 1], &[1, 9]);
        assert_eq!(matrix.labels(), [1, 9]);
        assert_eq!(matrix.count(1, 9), 1);
    }
}
