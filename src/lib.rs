//! # Complexity Gauge
//!
//! Evaluates how well hand-engineered text features predict an ordinal
//! human-assigned score. Raw `(text, label)` examples become a unified
//! feature matrix, a classifier is trained with cross-validated
//! hyperparameters, and repeated train/assess trials produce a mean-and-
//! spread estimate of predictive correlation and inter-rater reliability,
//! plus per-example prediction records for error analysis.
//!
//! ## Quick Start
//!
//! ```rust
//! use complexity_gauge::data::{Example, IdentityTransform, RawLabel, SliceCorpus};
//! use complexity_gauge::eval::Experiment;
//! use complexity_gauge::features::{Extractor, FeatureDict};
//! use complexity_gauge::learner::{Estimator, LogisticRegression};
//! use complexity_gauge::logging::DiagnosticsLog;
//! use ndarray::Array2;
//!
//! fn char_count(text: &str) -> FeatureDict {
//!     FeatureDict::from([("chars".to_string(), text.len() as f64)])
//! }
//!
//! let corpus = SliceCorpus::new(
//!     (0..12)
//!         .map(|i| Example::new("word ".repeat(i + 1), RawLabel::Scored(1 + (i as i64) % 7)))
//!         .collect(),
//! );
//! let log = DiagnosticsLog::disabled();
//! let extractors: &[Extractor] = &[char_count];
//! let train = |x: &Array2<f64>, y: &[i64]| LogisticRegression::default().fit(x, y);
//!
//! let outcome = Experiment::new(&corpus, extractors, &IdentityTransform, &train, &log)
//!     .with_iterations(2)
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(outcome.correlations.len(), 2);
//! assert_eq!(outcome.alphas.len(), 2);
//! ```
//!
//! ## Core Modules
//!
//! - [`config`] - Experiment configuration via TOML
//! - [`data`] - Corpus readers and label transforms
//! - [`features`] - Feature extraction, vectorization, and dataset construction
//! - [`learner`] - Cross-validated model training
//! - [`eval`] - Iterated statistical evaluation
//! - [`logging`] - JSON line-delimited diagnostics

pub mod config;
pub mod data;
pub mod eval;
pub mod features;
pub mod learner;
pub mod logging;

pub use config::ExperimentConfig;
pub use data::{CorpusReader, Example, IdentityTransform, JsonCorpus, RawLabel, TernaryTransform};
pub use eval::{EvaluationOutcome, Experiment, PredictionRecord};
pub use features::{build_dataset, Dataset, FeatureDict, FeatureVectorizer};
pub use learner::{
    fit_logistic_with_crossvalidation, fit_with_crossvalidation, Estimator, LogisticRegression,
    Model, ParamGrid, ParamValue,
};
pub use logging::DiagnosticsLog;
