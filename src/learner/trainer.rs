//! Hyperparameter search with k-fold cross-validation.
//!
//! The trainer enumerates the Cartesian product of a hyperparameter grid in
//! a fixed order (lexicographic over parameter names, then candidate
//! order), scores each candidate configuration by k-fold cross-validation,
//! and refits the winner on the full data. Ties are broken by the first
//! configuration enumerated, so a fixed grid and fold split always select
//! the same winner.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array2, Axis};
use serde_json::json;

use crate::logging::DiagnosticsLog;

use super::scoring::ScoreFn;

/// A fitted model: anything that can predict class labels for a feature
/// matrix.
pub trait Model {
    fn predict(&self, x: &Array2<f64>) -> Vec<i64>;
}

/// A base-model descriptor the trainer can reconfigure and fit.
pub trait Estimator: Clone {
    /// Returns a copy of this estimator with one hyperparameter replaced.
    fn with_param(&self, name: &str, value: &ParamValue) -> Result<Self, TrainError>;

    /// Fits on the full `(x, y)` and returns the trained model.
    fn fit(&self, x: &Array2<f64>, y: &[i64]) -> Result<Box<dyn Model>, TrainError>;
}

/// A candidate hyperparameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Hyperparameter name to candidate values.
///
/// Names are held in a `BTreeMap` so enumeration order over the grid's
/// Cartesian product is lexicographic by name regardless of insertion
/// order; candidate order within a name is preserved.
#[derive(Debug, Clone, Default)]
pub struct ParamGrid {
    candidates: BTreeMap<String, Vec<ParamValue>>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds candidate values for one hyperparameter.
    pub fn with(mut self, name: &str, values: Vec<ParamValue>) -> Self {
        self.candidates.insert(name.to_string(), values);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Every configuration in the Cartesian product, in enumeration order.
    /// An empty grid yields one empty configuration (the base model as-is).
    fn configurations(&self) -> Vec<Vec<(&String, &ParamValue)>> {
        let mut configs: Vec<Vec<(&String, &ParamValue)>> = vec![Vec::new()];
        for (name, pool) in &self.candidates {
            let mut extended = Vec::with_capacity(configs.len() * pool.len());
            for config in &configs {
                for value in pool {
                    let mut next = config.clone();
                    next.push((name, value));
                    extended.push(next);
                }
            }
            configs = extended;
        }
        configs
    }
}

/// Deterministic contiguous k-fold index splitter.
///
/// The first `len % folds` folds receive one extra example, matching the
/// usual convention, so fold sizes differ by at most one.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    pub folds: usize,
}

impl KFold {
    pub fn new(folds: usize) -> Self {
        Self { folds }
    }

    /// Returns `(train_indices, test_indices)` per fold.
    pub fn split(&self, len: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
        let base = len / self.folds;
        let extra = len % self.folds;

        let mut splits = Vec::with_capacity(self.folds);
        let mut start = 0;
        for fold in 0..self.folds {
            let stop = start + base + usize::from(fold < extra);
            let test: Vec<usize> = (start..stop).collect();
            let train: Vec<usize> = (0..start).chain(stop..len).collect();
            splits.push((train, test));
            start = stop;
        }
        splits
    }
}

fn gather(y: &[i64], indices: &[usize]) -> Vec<i64> {
    indices.iter().map(|&i| y[i]).collect()
}

fn distinct_count(y: &[i64]) -> usize {
    let mut sorted = y.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

/// Fits an estimator with hyperparameters chosen by cross-validated grid
/// search.
///
/// For each configuration in the grid's Cartesian product, performs
/// `folds`-way cross-validation on `(x, y)` under `scoring`, keeps the
/// configuration with the highest mean score (first enumerated wins ties),
/// and refits it on the full data. The winning parameters and score are
/// reported through the diagnostics log only.
pub fn fit_with_crossvalidation<E: Estimator>(
    x: &Array2<f64>,
    y: &[i64],
    base: E,
    folds: usize,
    grid: &ParamGrid,
    scoring: ScoreFn,
    log: &DiagnosticsLog,
) -> Result<Box<dyn Model>, TrainError> {
    let len = y.len();
    if x.nrows() != len {
        return Err(TrainError::ShapeMismatch {
            rows: x.nrows(),
            labels: len,
        });
    }
    if folds < 2 || folds > len {
        return Err(TrainError::InsufficientData(format!(
            "{} folds cannot partition {} examples",
            folds, len
        )));
    }

    let splits = KFold::new(folds).split(len);

    // Every training portion must keep the class diversity the scoring
    // metric needs. A single-class y is trainable as-is.
    if distinct_count(y) > 1 {
        for (train_idx, _) in &splits {
            if distinct_count(&gather(y, train_idx)) < 2 {
                return Err(TrainError::InsufficientData(
                    "a cross-validation fold left a single-class training portion".to_string(),
                ));
            }
        }
    }

    let mut best: Option<(f64, E, serde_json::Value)> = None;
    for config in grid.configurations() {
        let mut candidate = base.clone();
        for (name, value) in &config {
            candidate = candidate.with_param(name, value)?;
        }

        let mut total = 0.0;
        for (train_idx, test_idx) in &splits {
            let model = candidate.fit(&x.select(Axis(0), train_idx), &gather(y, train_idx))?;
            let predictions = model.predict(&x.select(Axis(0), test_idx));
            total += scoring(&gather(y, test_idx), &predictions);
        }
        let mean_score = total / splits.len() as f64;

        // Strictly-greater comparison keeps the first enumerated
        // configuration on ties and never lets a NaN score displace one.
        let better = match &best {
            None => true,
            Some((score, _, _)) => mean_score > *score,
        };
        if better {
            let params: serde_json::Map<String, serde_json::Value> = config
                .iter()
                .map(|(name, value)| (name.to_string(), json!(value.to_string())))
                .collect();
            best = Some((mean_score, candidate, serde_json::Value::Object(params)));
        }
    }

    let (best_score, best_estimator, best_params) = best.ok_or_else(|| {
        TrainError::InsufficientData("hyperparameter grid produced no configurations".to_string())
    })?;

    log.event(
        "grid_search",
        json!({ "best_score": best_score, "best_params": best_params }),
    );

    best_estimator.fit(x, y)
}

/// Logistic regression with the standard hyperparameter search.
///
/// Cross-validates `fit_intercept`, the regularization weight `c`, and the
/// penalty flavor over 5 folds under macro F1, then refits the winner.
pub fn fit_logistic_with_crossvalidation(
    x: &Array2<f64>,
    y: &[i64],
    log: &DiagnosticsLog,
) -> Result<Box<dyn Model>, TrainError> {
    let grid = ParamGrid::new()
        .with(
            "fit_intercept",
            vec![ParamValue::Bool(true), ParamValue::Bool(false)],
        )
        .with(
            "c",
            [0.4, 0.6, 0.8, 1.0, 2.0, 3.0]
                .into_iter()
                .map(ParamValue::Float)
                .collect(),
        )
        .with(
            "penalty",
            vec![
                ParamValue::Text("l1".to_string()),
                ParamValue::Text("l2".to_string()),
            ],
        );

    fit_with_crossvalidation(
        x,
        y,
        super::classifier::LogisticRegression::default(),
        5,
        &grid,
        super::scoring::macro_f1,
        log,
    )
}

#[derive(Debug)]
pub enum TrainError {
    /// Fold count exceeds the data, or a fold lacks class diversity
    InsufficientData(String),
    /// A grid names a hyperparameter the estimator does not have
    UnknownParam(String),
    /// A candidate value is outside a hyperparameter's domain
    InvalidParam { name: String, value: String },
    /// Feature matrix rows and label count disagree
    ShapeMismatch { rows: usize, labels: usize },
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::InsufficientData(detail) => {
                write!(f, "insufficient data for cross-validation: {}", detail)
            }
            TrainError::UnknownParam(name) => write!(f, "unknown hyperparameter {:?}", name),
            TrainError::InvalidParam { name, value } => {
                write!(f, "invalid value {:?} for hyperparameter {:?}", value, name)
            }
            TrainError::ShapeMismatch { rows, labels } => write!(
                f,
                "feature matrix has {} rows but {} labels were given",
                rows, labels
            ),
        }
    }
}

impl std::error::Error for TrainError {}
