//! Corpus access and label transformation for scored-paragraph data.

pub mod labels;
pub mod reader;

pub use labels::{IdentityTransform, LabelError, LabelTransform, TernaryTransform};
pub use reader::{CorpusReader, Example, JsonCorpus, RawLabel, ReadError, SliceCorpus};
