//! Feature dataset construction from raw corpora.
//!
//! [`build_dataset`] is the single path from raw `(text, label)` examples to
//! an index-aligned feature matrix. Examples the label transform drops are
//! skipped before featurization; a transform error aborts the build.

use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::{CorpusReader, LabelError, LabelTransform, ReadError};
use crate::logging::DiagnosticsLog;

use super::extractors::{merge_features, Extractor, FeatureDict};
use super::vectorizer::FeatureVectorizer;

/// An index-aligned feature dataset.
///
/// Row `i` of `x` corresponds to `y[i]` and `raw_examples[i]`; the three are
/// always equal in length.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix, one example per row
    pub x: Array2<f64>,
    /// Transformed labels
    pub y: Vec<i64>,
    /// Schema the matrix was built under
    pub vectorizer: FeatureVectorizer,
    /// Original texts, kept for error analysis
    pub raw_examples: Vec<String>,
}

impl Dataset {
    /// Number of examples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Builds a dataset from a reader, extractor list, and label transform.
///
/// With `vectorizer = None` a fresh schema is fit from the accumulated
/// feature names (training mode). With an existing schema the accumulated
/// dicts are transformed under it (assessment mode): unseen feature names
/// are zero-filled and the matrix width matches the schema exactly.
pub fn build_dataset(
    reader: &dyn CorpusReader,
    extractors: &[Extractor],
    transform: &dyn LabelTransform,
    vectorizer: Option<&FeatureVectorizer>,
    log: &DiagnosticsLog,
) -> Result<Dataset, DatasetError> {
    let mut labels = Vec::new();
    let mut dicts: Vec<FeatureDict> = Vec::new();
    let mut raw_examples = Vec::new();

    for example in reader.read()? {
        let Some(label) = transform.apply(&example.label)? else {
            continue;
        };

        let mut features = FeatureDict::new();
        for extractor in extractors {
            merge_features(&mut features, extractor(&example.text), log);
        }

        labels.push(label);
        dicts.push(features);
        raw_examples.push(example.text);
    }

    let (vectorizer, x) = match vectorizer {
        None => FeatureVectorizer::fit_transform(&dicts),
        Some(existing) => (existing.clone(), existing.transform(&dicts)),
    };

    Ok(Dataset {
        x,
        y: labels,
        vectorizer,
        raw_examples,
    })
}

/// One random train/assess partition of a dataset.
#[derive(Debug, Clone)]
pub struct TrainAssessSplit {
    pub x_train: Array2<f64>,
    pub y_train: Vec<i64>,
    pub x_assess: Array2<f64>,
    pub y_assess: Vec<i64>,
    /// Raw texts of the assessment rows, index-aligned with `y_assess`
    pub assess_examples: Vec<String>,
}

/// Randomly partitions a dataset into train and assess portions.
///
/// The train portion gets `floor(len * train_fraction)` examples. Returns
/// `None` when either portion would be empty.
pub fn split_dataset(
    dataset: &Dataset,
    train_fraction: f64,
    rng: &mut impl Rng,
) -> Option<TrainAssessSplit> {
    let len = dataset.len();
    let cut = (len as f64 * train_fraction).floor() as usize;
    if cut == 0 || cut >= len {
        return None;
    }

    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    let (train_idx, assess_idx) = indices.split_at(cut);

    Some(TrainAssessSplit {
        x_train: dataset.x.select(Axis(0), train_idx),
        y_train: train_idx.iter().map(|&i| dataset.y[i]).collect(),
        x_assess: dataset.x.select(Axis(0), assess_idx),
        y_assess: assess_idx.iter().map(|&i| dataset.y[i]).collect(),
        assess_examples: assess_idx
            .iter()
            .map(|&i| dataset.raw_examples[i].clone())
            .collect(),
    })
}

#[derive(Debug)]
pub enum DatasetError {
    Read(ReadError),
    Label(LabelError),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Read(err) => write!(f, "{}", err),
            DatasetError::Label(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<ReadError> for DatasetError {
    fn from(value: ReadError) -> Self {
        DatasetError::Read(value)
    }
}

impl From<LabelError> for DatasetError {
    fn from(value: LabelError) -> Self {
        DatasetError::Label(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Example, IdentityTransform, RawLabel, SliceCorpus, TernaryTransform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn char_count(text: &str) -> FeatureDict {
        FeatureDict::from([("chars".to_string(), text.chars().count() as f64)])
    }

    fn word_count(text: &str) -> FeatureDict {
        FeatureDict::from([(
            "words".to_string(),
            text.split_whitespace().count() as f64,
        )])
    }

    fn corpus() -> SliceCorpus {
        SliceCorpus::new(vec![
            Example::new("one", RawLabel::Scored(1)),
            Example::new("two words", RawLabel::Unscoreable),
            Example::new("three words here", RawLabel::Scored(5)),
            Example::new("four", RawLabel::Unjudged),
            Example::new("five words in this one", RawLabel::Scored(7)),
        ])
    }

    #[test]
    fn dropped_examples_never_reach_the_matrix() {
        let log = DiagnosticsLog::disabled();
        let dataset = build_dataset(
            &corpus(),
            &[char_count, word_count],
            &IdentityTransform,
            None,
            &log,
        )
        .unwrap();

        // Two of five examples dropped; all three outputs stay aligned.
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.x.nrows(), 3);
        assert_eq!(dataset.raw_examples.len(), 3);
        assert_eq!(dataset.y, vec![1, 5, 7]);
        assert_eq!(dataset.raw_examples[1], "three words here");
    }

    #[test]
    fn training_mode_fits_a_lexicographic_schema() {
        let log = DiagnosticsLog::disabled();
        let dataset = build_dataset(
            &corpus(),
            &[char_count, word_count],
            &IdentityTransform,
            None,
            &log,
        )
        .unwrap();

        assert_eq!(dataset.vectorizer.feature_names(), ["chars", "words"]);
        assert_eq!(dataset.x[[0, 0]], 3.0);
        assert_eq!(dataset.x[[0, 1]], 1.0);
        assert_eq!(dataset.x[[2, 1]], 5.0);
    }

    #[test]
    fn assessment_mode_reuses_the_given_schema() {
        let log = DiagnosticsLog::disabled();
        let train = build_dataset(&corpus(), &[char_count], &IdentityTransform, None, &log).unwrap();

        // The assess-time extractor emits a name the schema never saw.
        let assess = build_dataset(
            &corpus(),
            &[char_count, word_count],
            &IdentityTransform,
            Some(&train.vectorizer),
            &log,
        )
        .unwrap();

        assert_eq!(assess.x.ncols(), train.x.ncols());
        assert_eq!(assess.vectorizer.feature_names(), ["chars"]);
    }

    #[test]
    fn invalid_label_aborts_the_build() {
        let log = DiagnosticsLog::disabled();
        let reader = SliceCorpus::new(vec![Example::new("bad", RawLabel::Scored(9))]);
        let result = build_dataset(&reader, &[char_count], &TernaryTransform, None, &log);
        assert!(matches!(result, Err(DatasetError::Label(_))));
    }

    #[test]
    fn split_sizes_follow_the_train_fraction() {
        let log = DiagnosticsLog::disabled();
        let reader = SliceCorpus::new(
            (0..10)
                .map(|i| Example::new(format!("text {}", i), RawLabel::Scored(1 + i % 7)))
                .collect(),
        );
        let dataset = build_dataset(&reader, &[char_count], &IdentityTransform, None, &log).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let split = split_dataset(&dataset, 0.7, &mut rng).unwrap();
        assert_eq!(split.y_train.len(), 7);
        assert_eq!(split.y_assess.len(), 3);
        assert_eq!(split.x_train.nrows(), 7);
        assert_eq!(split.x_assess.nrows(), 3);
        assert_eq!(split.assess_examples.len(), 3);
    }

    #[test]
    fn degenerate_split_returns_none() {
        let log = DiagnosticsLog::disabled();
        let reader = SliceCorpus::new(vec![Example::new("only", RawLabel::Scored(3))]);
        let dataset = build_dataset(&reader, &[char_count], &IdentityTransform, None, &log).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        assert!(split_dataset(&dataset, 0.7, &mut rng).is_none());
    }
}
