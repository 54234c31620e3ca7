//! Scoring metrics for cross-validated model selection.

/// A scoring metric over true and predicted class labels. Higher is better.
pub type ScoreFn = fn(&[i64], &[i64]) -> f64;

/// Fraction of exact matches.
pub fn accuracy(truth: &[i64], predicted: &[i64]) -> f64 {
    if truth.is_empty() || truth.len() != predicted.len() {
        return f64::NAN;
    }
    let matched = truth
        .iter()
        .zip(predicted.iter())
        .filter(|(t, p)| t == p)
        .count();
    matched as f64 / truth.len() as f64
}

/// Unweighted mean of per-class F1 scores.
///
/// Classes are the union of labels observed in either sequence; a class
/// with no true or predicted members scores zero, pulling the mean down
/// rather than being skipped.
pub fn macro_f1(truth: &[i64], predicted: &[i64]) -> f64 {
    if truth.is_empty() || truth.len() != predicted.len() {
        return f64::NAN;
    }

    let mut classes: Vec<i64> = truth.iter().chain(predicted.iter()).copied().collect();
    classes.sort_unstable();
    classes.dedup();

    let mut total = 0.0;
    for &class in &classes {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        for (&t, &p) in truth.iter().zip(predicted.iter()) {
            match (t == class, p == class) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }
        let denominator = 2 * tp + fp + fn_;
        if denominator > 0 {
            total += 2.0 * tp as f64 / denominator as f64;
        }
    }
    total / classes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_exact_matches() {
        assert_eq!(accuracy(&[1, 2, 3, 4], &[1, 2, 0, 4]), 0.75);
        assert_eq!(accuracy(&[1, 1], &[1, 1]), 1.0);
    }

    #[test]
    fn accuracy_of_empty_sequences_is_nan() {
        assert!(accuracy(&[], &[]).is_nan());
    }

    #[test]
    fn perfect_predictions_score_unit_f1() {
        assert_eq!(macro_f1(&[0, 1, 2], &[0, 1, 2]), 1.0);
    }

    #[test]
    fn macro_f1_averages_over_classes() {
        // Class 0: tp=1, fp=1, fn=0 -> f1 = 2/3.
        // Class 1: tp=1, fp=0, fn=1 -> f1 = 2/3.
        let score = macro_f1(&[0, 1, 1], &[0, 1, 0]);
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn phantom_predicted_class_drags_the_mean() {
        // Class 3 never occurs in truth; its f1 is zero and still counts.
        let score = macro_f1(&[0, 0], &[0, 3]);
        // Class 0: tp=1, fp=0, fn=1 -> 2/3. Class 3: 0. Mean = 1/3.
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }
}
