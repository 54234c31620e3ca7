//! Iterated statistical evaluation of feature-based models.

pub mod experiment;
pub mod stats;

pub use experiment::{
    AssociationFn, EvaluationOutcome, Experiment, ExperimentError, PredictionRecord, TrainFn,
    TrialResult,
};
pub use stats::{cronbach_alpha, mean, pearson, std_dev, variance, ConfusionMatrix};
