//! Corpus readers for scored-paragraph data.
//!
//! A corpus is a JSON array of objects carrying a `"paragraph"` string and an
//! optional `"score"`. Scores live on an ordinal 1..=7 scale; `"NA"` marks a
//! paragraph the raters could not score, and a missing field marks a
//! paragraph no rater has judged. Normalization happens here and nowhere
//! else: fractional scores round to the nearest integer, half-up.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

/// Raw human judgment attached to a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RawLabel {
    /// Ordinal score on the 1..=7 scale
    Scored(i64),
    /// Rated but found unscoreable (`"NA"` in the source data)
    Unscoreable,
    /// No human assessment exists for this paragraph
    Unjudged,
}

/// One raw example as produced by a reader.
#[derive(Debug, Clone)]
pub struct Example {
    pub text: String,
    pub label: RawLabel,
}

impl Example {
    pub fn new(text: impl Into<String>, label: RawLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Restartable producer of a finite example sequence.
///
/// Every call to [`read`](CorpusReader::read) yields the full corpus from the
/// start, so callers may consume it once per trial.
pub trait CorpusReader {
    fn read(&self) -> Result<Vec<Example>, ReadError>;
}

/// File-backed reader over the JSON corpus format.
///
/// Each item looks like `{"paragraph": "...", "score": 4}`. A `"parse"`
/// field may be present in older corpora and is ignored.
pub struct JsonCorpus {
    path: PathBuf,
}

impl JsonCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusReader for JsonCorpus {
    fn read(&self) -> Result<Vec<Example>, ReadError> {
        let contents = fs::read_to_string(&self.path)?;
        parse_corpus(&contents)
    }
}

/// In-memory reader, mainly for tests and demos.
pub struct SliceCorpus {
    examples: Vec<Example>,
}

impl SliceCorpus {
    pub fn new(examples: Vec<Example>) -> Self {
        Self { examples }
    }
}

impl CorpusReader for SliceCorpus {
    fn read(&self) -> Result<Vec<Example>, ReadError> {
        Ok(self.examples.clone())
    }
}

fn parse_corpus(contents: &str) -> Result<Vec<Example>, ReadError> {
    let value: Value =
        serde_json::from_str(contents).map_err(|err| ReadError::Parse(err.to_string()))?;
    let items = value
        .as_array()
        .ok_or_else(|| ReadError::Parse("corpus root must be a JSON array".to_string()))?;

    let mut examples = Vec::with_capacity(items.len());
    for item in items {
        let text = item
            .get("paragraph")
            .and_then(Value::as_str)
            .ok_or_else(|| ReadError::Parse("item is missing a \"paragraph\" string".to_string()))?;
        let label = match item.get("score") {
            None => RawLabel::Unjudged,
            Some(Value::String(s)) if s == "NA" => RawLabel::Unscoreable,
            Some(score) => RawLabel::Scored(normalize_score(score)?),
        };
        examples.push(Example::new(text, label));
    }
    Ok(examples)
}

/// Rounds a raw score to the nearest integer, half-up, and checks the scale.
fn normalize_score(value: &Value) -> Result<i64, ReadError> {
    let rounded = if let Some(int) = value.as_i64() {
        int
    } else if let Some(float) = value.as_f64() {
        (float + 0.5).floor() as i64
    } else {
        return Err(ReadError::Parse(format!("score {} is not numeric", value)));
    };

    if (1..=7).contains(&rounded) {
        Ok(rounded)
    } else {
        Err(ReadError::Parse(format!(
            "score {} is outside the 1..=7 scale",
            rounded
        )))
    }
}

#[derive(Debug)]
pub enum ReadError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Io(err) => write!(f, "IO error: {}", err),
            ReadError::Parse(err) => write!(f, "Corpus parse error: {}", err),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<std::io::Error> for ReadError {
    fn from(value: std::io::Error) -> Self {
        ReadError::Io(value)
    }
}
