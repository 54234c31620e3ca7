//! Multinomial logistic regression trained by batch gradient descent.

use std::collections::HashMap;

use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use super::trainer::{Estimator, Model, ParamValue, TrainError};

/// Regularization penalty applied to the weight matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Penalty {
    /// Subgradient shrinkage toward sparse weights
    L1,
    /// Weight decay toward a gaussian prior
    L2,
}

impl Penalty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "l1" => Some(Penalty::L1),
            "l2" => Some(Penalty::L2),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Penalty::L1 => "l1",
            Penalty::L2 => "l2",
        }
    }
}

/// Hyperparameters for [`LogisticRegression`].
#[derive(Debug, Clone, Serialize)]
pub struct LogisticConfig {
    /// Inverse regularization strength; smaller is more regularized
    pub c: f64,
    /// Penalty flavor
    pub penalty: Penalty,
    /// Whether to learn a per-class bias term
    pub fit_intercept: bool,
    /// Gradient descent epochs
    pub epochs: usize,
    /// Gradient descent step size
    pub learning_rate: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            penalty: Penalty::L2,
            fit_intercept: true,
            epochs: 200,
            learning_rate: 0.1,
        }
    }
}

/// Maximum-entropy classifier over integer class labels.
///
/// Classes are the sorted distinct labels of the training `y`; prediction
/// returns the argmax class for each row. Training is full-batch softmax
/// gradient descent from zero-initialized weights, so fitting is
/// deterministic for fixed inputs.
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: LogisticConfig,
}

impl LogisticRegression {
    pub fn new(config: LogisticConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LogisticConfig {
        &self.config
    }
}

impl Estimator for LogisticRegression {
    fn with_param(&self, name: &str, value: &ParamValue) -> Result<Self, TrainError> {
        let invalid = || TrainError::InvalidParam {
            name: name.to_string(),
            value: value.to_string(),
        };

        let mut next = self.clone();
        match (name, value) {
            ("c", ParamValue::Float(c)) if *c > 0.0 => next.config.c = *c,
            ("c", _) => return Err(invalid()),
            ("penalty", ParamValue::Text(text)) => {
                next.config.penalty = Penalty::from_name(text).ok_or_else(invalid)?;
            }
            ("penalty", _) => return Err(invalid()),
            ("fit_intercept", ParamValue::Bool(flag)) => next.config.fit_intercept = *flag,
            ("fit_intercept", _) => return Err(invalid()),
            ("epochs", ParamValue::Int(epochs)) if *epochs > 0 => {
                next.config.epochs = *epochs as usize;
            }
            ("epochs", _) => return Err(invalid()),
            ("learning_rate", ParamValue::Float(rate)) if *rate > 0.0 => {
                next.config.learning_rate = *rate;
            }
            ("learning_rate", _) => return Err(invalid()),
            (other, _) => return Err(TrainError::UnknownParam(other.to_string())),
        }
        Ok(next)
    }

    fn fit(&self, x: &Array2<f64>, y: &[i64]) -> Result<Box<dyn Model>, TrainError> {
        let n = y.len();
        if n == 0 {
            return Err(TrainError::InsufficientData(
                "cannot fit a classifier on zero examples".to_string(),
            ));
        }
        if x.nrows() != n {
            return Err(TrainError::ShapeMismatch {
                rows: x.nrows(),
                labels: n,
            });
        }
        if self.config.c <= 0.0 {
            return Err(TrainError::InvalidParam {
                name: "c".to_string(),
                value: self.config.c.to_string(),
            });
        }

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let class_index: HashMap<i64, usize> =
            classes.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        let targets: Vec<usize> = y.iter().map(|label| class_index[label]).collect();

        let k = classes.len();
        let d = x.ncols();
        let mut weights = Array2::<f64>::zeros((k, d));
        let mut intercept = Array1::<f64>::zeros(k);
        let strength = 1.0 / (self.config.c * n as f64);

        for _ in 0..self.config.epochs {
            let mut residual = x.dot(&weights.t());
            if self.config.fit_intercept {
                residual += &intercept;
            }

            // Row-wise softmax, stabilized against overflow.
            for mut row in residual.rows_mut() {
                let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
                row.mapv_inplace(|v| (v - max).exp());
                let sum = row.sum();
                row.mapv_inplace(|v| v / sum);
            }

            // probs - onehot
            for (row, &target) in targets.iter().enumerate() {
                residual[[row, target]] -= 1.0;
            }

            let mut grad_weights = residual.t().dot(x) / n as f64;
            match self.config.penalty {
                Penalty::L2 => grad_weights.scaled_add(strength, &weights),
                Penalty::L1 => {
                    let signs = weights.mapv(|w| if w == 0.0 { 0.0 } else { w.signum() });
                    grad_weights.scaled_add(strength, &signs);
                }
            }

            weights.scaled_add(-self.config.learning_rate, &grad_weights);
            if self.config.fit_intercept {
                let grad_intercept = residual.sum_axis(Axis(0)) / n as f64;
                intercept.scaled_add(-self.config.learning_rate, &grad_intercept);
            }
        }

        Ok(Box::new(FittedLogistic {
            weights,
            intercept,
            classes,
        }))
    }
}

/// A trained logistic model.
pub struct FittedLogistic {
    weights: Array2<f64>,
    intercept: Array1<f64>,
    classes: Vec<i64>,
}

impl FittedLogistic {
    /// Class labels in column order of the internal weight matrix.
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }
}

impl Model for FittedLogistic {
    fn predict(&self, x: &Array2<f64>) -> Vec<i64> {
        let mut logits = x.dot(&self.weights.t());
        logits += &self.intercept;

        logits
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (index, &value) in row.iter().enumerate() {
                    if value > row[best] {
                        best = index;
                    }
                }
                self.classes[best]
            })
            .collect()
    }
}
