//! Hand-engineered text feature extractors.
//!
//! Every extractor is a pure function from paragraph text to a named numeric
//! feature dict. Extractors are applied in order and their outputs merged;
//! when two extractors emit the same feature name the larger value wins:
//! the signals are indicator- or count-like, so the larger one is
//! authoritative.

use std::collections::BTreeMap;

use serde_json::json;

use crate::logging::DiagnosticsLog;

/// Named numeric features for one example.
pub type FeatureDict = BTreeMap<String, f64>;

/// A pure text-to-features function.
pub type Extractor = fn(&str) -> FeatureDict;

/// Merges `incoming` into `merged`, keeping the maximum value on name
/// collisions. Collisions are reported through the diagnostics log.
pub fn merge_features(merged: &mut FeatureDict, incoming: FeatureDict, log: &DiagnosticsLog) {
    for (name, value) in incoming {
        match merged.get_mut(&name) {
            Some(existing) => {
                if log.enabled() {
                    log.event("feature_overlap", json!({ "feature": name }));
                }
                if value > *existing {
                    *existing = value;
                }
            }
            None => {
                merged.insert(name, value);
            }
        }
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn count_wordlist(text: &str, prefix: &str, words: &[&str]) -> FeatureDict {
    let mut features = FeatureDict::new();
    for token in tokens(text) {
        if words.contains(&token.as_str()) {
            *features.entry(format!("{}:{}", prefix, token)).or_insert(0.0) += 1.0;
        }
    }
    features
}

/// Character and word counts.
pub fn text_length(text: &str) -> FeatureDict {
    let words = tokens(text);
    FeatureDict::from([
        ("length:chars".to_string(), text.chars().count() as f64),
        ("length:words".to_string(), words.len() as f64),
    ])
}

/// Mean and maximum word length plus a long-word count.
pub fn word_length_stats(text: &str) -> FeatureDict {
    let words = tokens(text);
    if words.is_empty() {
        return FeatureDict::new();
    }
    let lengths: Vec<usize> = words.iter().map(|w| w.chars().count()).collect();
    let total: usize = lengths.iter().sum();
    let max = lengths.iter().copied().max().unwrap_or(0);
    let long = lengths.iter().filter(|&&len| len >= 7).count();
    FeatureDict::from([
        (
            "word_length:mean".to_string(),
            total as f64 / words.len() as f64,
        ),
        ("word_length:max".to_string(), max as f64),
        ("word_length:long".to_string(), long as f64),
    ])
}

/// Counts of modal verbs, one feature per modal.
pub fn modal_presence(text: &str) -> FeatureDict {
    count_wordlist(
        text,
        "modal",
        &[
            "can", "could", "may", "might", "must", "shall", "should", "will", "would",
        ],
    )
}

/// Counts of hedging expressions.
pub fn hedge_presence(text: &str) -> FeatureDict {
    count_wordlist(
        text,
        "hedge",
        &[
            "apparently",
            "arguably",
            "likely",
            "perhaps",
            "possibly",
            "presumably",
            "probably",
            "seemingly",
            "seems",
            "somewhat",
            "suggests",
        ],
    )
}

/// Counts of comparative and superlative markers.
pub fn comparative_counts(text: &str) -> FeatureDict {
    count_wordlist(text, "comparative", &["more", "most", "less", "least"])
}

/// Counts of contrastive and integrative conjunctives.
pub fn conjunctive_presence(text: &str) -> FeatureDict {
    count_wordlist(
        text,
        "conjunctive",
        &[
            "alternatively",
            "although",
            "but",
            "conversely",
            "however",
            "meanwhile",
            "nevertheless",
            "nonetheless",
            "whereas",
            "while",
            "yet",
        ],
    )
}

/// Counts of structurally interesting punctuation.
pub fn punctuation_presence(text: &str) -> FeatureDict {
    let mut features = FeatureDict::new();
    for (mark, name) in [
        (';', "semicolon"),
        (':', "colon"),
        ('?', "question"),
        ('!', "exclamation"),
        (',', "comma"),
    ] {
        let count = text.chars().filter(|&c| c == mark).count();
        if count > 0 {
            features.insert(format!("punct:{}", name), count as f64);
        }
    }
    features
}

/// The full pure-text extractor catalogue, in application order.
pub fn default_extractors() -> Vec<Extractor> {
    vec![
        text_length,
        word_length_stats,
        modal_presence,
        hedge_presence,
        comparative_counts,
        conjunctive_presence,
        punctuation_presence,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_maximum_on_collision() {
        let log = DiagnosticsLog::disabled();
        let mut merged = FeatureDict::from([("x".to_string(), 1.0)]);
        merge_features(&mut merged, FeatureDict::from([("x".to_string(), 3.0)]), &log);
        assert_eq!(merged["x"], 3.0);

        // The larger value stays even when it arrives first.
        merge_features(&mut merged, FeatureDict::from([("x".to_string(), 2.0)]), &log);
        assert_eq!(merged["x"], 3.0);
    }

    #[test]
    fn collisions_are_reported_when_diagnostics_are_enabled() {
        use std::cell::RefCell;
        use std::io::{self, Write};
        use std::rc::Rc;

        #[derive(Clone, Default)]
        struct SharedBuf(Rc<RefCell<Vec<u8>>>);

        impl Write for SharedBuf {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let buf = SharedBuf::default();
        let log = DiagnosticsLog::to_writer(Box::new(buf.clone()));

        let mut merged = FeatureDict::from([("x".to_string(), 1.0)]);
        merge_features(&mut merged, FeatureDict::from([("x".to_string(), 3.0)]), &log);

        let contents = String::from_utf8(buf.0.borrow().clone()).unwrap();
        assert!(contents.contains("feature_overlap"));
        assert!(contents.contains("\"x\""));
    }

    #[test]
    fn merge_inserts_new_names() {
        let log = DiagnosticsLog::disabled();
        let mut merged = FeatureDict::from([("x".to_string(), 1.0)]);
        merge_features(&mut merged, FeatureDict::from([("y".to_string(), 5.0)]), &log);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["y"], 5.0);
    }

    #[test]
    fn text_length_counts_chars_and_words() {
        let features = text_length("one two three");
        assert_eq!(features["length:chars"], 13.0);
        assert_eq!(features["length:words"], 3.0);
    }

    #[test]
    fn modal_presence_counts_each_modal() {
        let features = modal_presence("It could work, and it could also fail; it must not.");
        assert_eq!(features["modal:could"], 2.0);
        assert_eq!(features["modal:must"], 1.0);
        assert!(!features.contains_key("modal:will"));
    }

    #[test]
    fn word_length_stats_on_empty_text_is_empty() {
        assert!(word_length_stats("   ").is_empty());
    }

    #[test]
    fn punctuation_emits_only_observed_marks() {
        let features = punctuation_presence("One; two; three?");
        assert_eq!(features["punct:semicolon"], 2.0);
        assert_eq!(features["punct:question"], 1.0);
        assert!(!features.contains_key("punct:comma"));
    }
}
