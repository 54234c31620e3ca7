//! Iterated train/assess experiments over hand-engineered features.
//!
//! One trial is a full build -> split-or-reuse -> train -> predict -> score
//! cycle. The experiment repeats it `iterations` times and aggregates the
//! per-trial statistics. With no assessment corpus, every trial redraws an
//! unseeded random train/assess split; that randomness is the mechanism by
//! which sampling variance is estimated. With an assessment corpus, the
//! split is fixed and iteration measures training-procedure variance only.
//!
//! Inside every trial the assessment matrix is built under the training
//! vectorizer, so the two phases always share a feature column space.

use ndarray::Array2;
use rand::{thread_rng, Rng};
use serde::Serialize;
use serde_json::json;

use crate::data::{CorpusReader, LabelTransform};
use crate::features::{build_dataset, split_dataset, Dataset, DatasetError, Extractor};
use crate::learner::{Model, TrainError};
use crate::logging::DiagnosticsLog;

use super::stats::{cronbach_alpha, pearson, variance, ConfusionMatrix};

/// Trains a model on `(x, y)`; typically wraps the cross-validated trainer.
pub type TrainFn<'a> = dyn Fn(&Array2<f64>, &[i64]) -> Result<Box<dyn Model>, TrainError> + 'a;

/// Association statistic between true and predicted label sequences.
pub type AssociationFn = fn(&[f64], &[f64]) -> f64;

/// One assessed example, kept for error analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub text: String,
    pub truth: i64,
    pub predicted: i64,
}

/// Statistics from a single train+assess trial.
#[derive(Debug, Clone, Serialize)]
pub struct TrialResult {
    pub correlation: f64,
    pub alpha: f64,
    pub confusion: ConfusionMatrix,
    pub details: Vec<PredictionRecord>,
}

/// Aggregated statistics across every trial of one experiment run.
///
/// `correlations` and `alphas` hold one entry per trial (NaN for trials
/// where the statistic was undefined); `details` concatenates every trial's
/// prediction records; `confusion` is the final trial's matrix.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub correlations: Vec<f64>,
    pub alphas: Vec<f64>,
    pub confusion: ConfusionMatrix,
    pub details: Vec<PredictionRecord>,
}

/// An iterated feature-evaluation experiment.
///
/// Collaborators are borrowed: the experiment owns no corpus data and no
/// model state, only the recipe for a run.
pub struct Experiment<'a> {
    /// Training corpus; re-read at the start of every trial
    pub train_reader: &'a dyn CorpusReader,
    /// Fixed assessment corpus; `None` means split the training corpus
    pub assess_reader: Option<&'a dyn CorpusReader>,
    /// Fraction of the training corpus used for fitting when splitting
    pub train_fraction: f64,
    /// Feature extractors, applied in order
    pub extractors: &'a [Extractor],
    /// Label transform deciding class labels and drops
    pub transform: &'a dyn LabelTransform,
    /// Model training function
    pub train_fn: &'a TrainFn<'a>,
    /// Association statistic recorded as the trial correlation
    pub association: AssociationFn,
    /// Number of trials
    pub iterations: usize,
    /// Diagnostics sink
    pub log: &'a DiagnosticsLog,
}

impl<'a> Experiment<'a> {
    /// An experiment with the default split fraction (0.7), iteration count
    /// (10), and association statistic (Pearson's r).
    pub fn new(
        train_reader: &'a dyn CorpusReader,
        extractors: &'a [Extractor],
        transform: &'a dyn LabelTransform,
        train_fn: &'a TrainFn<'a>,
        log: &'a DiagnosticsLog,
    ) -> Self {
        Self {
            train_reader,
            assess_reader: None,
            train_fraction: 0.7,
            extractors,
            transform,
            train_fn,
            association: pearson,
            iterations: 10,
            log,
        }
    }

    /// Assess against a fixed corpus instead of a random split.
    pub fn with_assess_reader(mut self, reader: &'a dyn CorpusReader) -> Self {
        self.assess_reader = Some(reader);
        self
    }

    pub fn with_train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = fraction;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Runs every trial and aggregates the results.
    ///
    /// Construction and training errors abort the run: they indicate a data
    /// contract violation, not a statistical edge case. Undefined
    /// statistics (zero-variance trials) are recorded as NaN and the run
    /// continues, so the output sequences always hold `iterations` entries.
    pub fn run(&self) -> Result<EvaluationOutcome, ExperimentError> {
        if !(0.0..1.0).contains(&self.train_fraction) || self.train_fraction == 0.0 {
            return Err(ExperimentError::Config(format!(
                "train fraction {} is outside (0, 1)",
                self.train_fraction
            )));
        }
        if self.iterations == 0 {
            return Err(ExperimentError::Config(
                "at least one iteration is required".to_string(),
            ));
        }

        let mut correlations = Vec::with_capacity(self.iterations);
        let mut alphas = Vec::with_capacity(self.iterations);
        let mut details = Vec::new();
        let mut confusion = ConfusionMatrix::empty();

        let mut rng = thread_rng();
        for trial in 0..self.iterations {
            let result = self.run_trial(&mut rng)?;
            self.log.event(
                "trial",
                json!({
                    "trial": trial,
                    "correlation": result.correlation,
                    "alpha": result.alpha,
                    "assessed": result.details.len(),
                }),
            );

            correlations.push(result.correlation);
            alphas.push(result.alpha);
            confusion = result.confusion;
            details.extend(result.details);
        }

        Ok(EvaluationOutcome {
            correlations,
            alphas,
            confusion,
            details,
        })
    }

    fn run_trial(&self, rng: &mut impl Rng) -> Result<TrialResult, ExperimentError> {
        let train = build_dataset(
            self.train_reader,
            self.extractors,
            self.transform,
            None,
            self.log,
        )?;

        let (x_train, y_train, x_assess, y_assess, assess_examples) = match self.assess_reader {
            None => {
                let split = split_dataset(&train, self.train_fraction, rng).ok_or_else(|| {
                    ExperimentError::Train(TrainError::InsufficientData(format!(
                        "train fraction {} leaves an empty portion of {} examples",
                        self.train_fraction,
                        train.len()
                    )))
                })?;
                (
                    split.x_train,
                    split.y_train,
                    split.x_assess,
                    split.y_assess,
                    split.assess_examples,
                )
            }
            Some(reader) => {
                // Assessment features go through the training vectorizer so
                // the columns of both matrices line up.
                let assess = build_dataset(
                    reader,
                    self.extractors,
                    self.transform,
                    Some(&train.vectorizer),
                    self.log,
                )?;
                let Dataset {
                    x,
                    y,
                    raw_examples,
                    ..
                } = assess;
                (train.x, train.y, x, y, raw_examples)
            }
        };

        let model = (self.train_fn)(&x_train, &y_train)?;
        let predicted = model.predict(&x_assess);

        let truth: Vec<f64> = y_assess.iter().map(|&v| v as f64).collect();
        let guesses: Vec<f64> = predicted.iter().map(|&v| v as f64).collect();

        let correlation = (self.association)(&truth, &guesses);
        // A zero-variance rater makes agreement undefined, the same way
        // zero variance makes correlation undefined.
        let alpha = if variance(&truth) == 0.0 || variance(&guesses) == 0.0 {
            f64::NAN
        } else {
            cronbach_alpha(&[truth, guesses])
        };
        let confusion = ConfusionMatrix::from_pairs(&y_assess, &predicted);

        let details = assess_examples
            .into_iter()
            .zip(y_assess)
            .zip(predicted)
            .map(|((text, truth), predicted)| PredictionRecord {
                text,
                truth,
                predicted,
            })
            .collect();

        Ok(TrialResult {
            correlation,
            alpha,
            confusion,
            details,
        })
    }
}

#[derive(Debug)]
pub enum ExperimentError {
    Dataset(DatasetError),
    Train(TrainError),
    Config(String),
}

impl std::fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperimentError::Dataset(err) => write!(f, "{}", err),
            ExperimentError::Train(err) => write!(f, "{}", err),
            ExperimentError::Config(err) => write!(f, "invalid experiment: {}", err),
        }
    }
}

impl std::error::Error for ExperimentError {}

impl From<DatasetError> for ExperimentError {
    fn from(value: DatasetError) -> Self {
        ExperimentError::Dataset(value)
    }
}

impl From<TrainError> for ExperimentError {
    fn from(value: TrainError) -> Self {
        ExperimentError::Train(value)
    }
}
