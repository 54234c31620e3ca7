//! Model training with cross-validated hyperparameter selection.
//!
//! The trainer depends only on two capability seams:
//! - [`Estimator`]: a reconfigurable base-model descriptor
//! - [`Model`]: anything that can predict labels for a feature matrix
//!
//! [`LogisticRegression`] is the stock estimator; any classifier or
//! regressor implementing the seams can be substituted.

pub mod classifier;
pub mod scoring;
pub mod trainer;

pub use classifier::{FittedLogistic, LogisticConfig, LogisticRegression, Penalty};
pub use scoring::{accuracy, macro_f1, ScoreFn};
pub use trainer::{
    fit_logistic_with_crossvalidation, fit_with_crossvalidation, Estimator, KFold, Model,
    ParamGrid, ParamValue, TrainError,
};
