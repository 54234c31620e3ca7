//! Feature extraction, vectorization, and dataset construction.

pub mod dataset;
pub mod extractors;
pub mod vectorizer;

pub use dataset::{build_dataset, split_dataset, Dataset, DatasetError, TrainAssessSplit};
pub use extractors::{default_extractors, merge_features, Extractor, FeatureDict};
pub use vectorizer::FeatureVectorizer;
