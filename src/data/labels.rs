//! Label transforms applied before dataset construction.
//!
//! A transform maps a raw human judgment to a usable class label, or to
//! `None` when the example should be excluded from the dataset. A scored
//! value outside the transform's accepted domain is a fatal
//! [`LabelError::InvalidLabel`]; labels are never silently coerced.

use super::reader::RawLabel;

/// Maps raw labels to experiment classes.
pub trait LabelTransform {
    /// Returns the transformed label, `None` to drop the example, or an
    /// error when the raw label is outside the accepted domain.
    fn apply(&self, label: &RawLabel) -> Result<Option<i64>, LabelError>;
}

/// Keeps ordinal scores as-is; unscoreable and unjudged paragraphs drop.
pub struct IdentityTransform;

impl LabelTransform for IdentityTransform {
    fn apply(&self, label: &RawLabel) -> Result<Option<i64>, LabelError> {
        Ok(match label {
            RawLabel::Scored(score) => Some(*score),
            RawLabel::Unscoreable | RawLabel::Unjudged => None,
        })
    }
}

/// Buckets the 1..=7 scale into low / medium / high classes.
pub struct TernaryTransform;

impl TernaryTransform {
    pub const LOW: i64 = 0;
    pub const MEDIUM: i64 = 1;
    pub const HIGH: i64 = 2;

    /// Display name for a bucket label, for reports.
    pub fn bucket_name(label: i64) -> Option<&'static str> {
        match label {
            Self::LOW => Some("low"),
            Self::MEDIUM => Some("medium"),
            Self::HIGH => Some("high"),
            _ => None,
        }
    }
}

impl LabelTransform for TernaryTransform {
    fn apply(&self, label: &RawLabel) -> Result<Option<i64>, LabelError> {
        match label {
            RawLabel::Scored(score) => match score {
                1 | 2 => Ok(Some(Self::LOW)),
                3..=5 => Ok(Some(Self::MEDIUM)),
                6 | 7 => Ok(Some(Self::HIGH)),
                other => Err(LabelError::InvalidLabel(*other)),
            },
            RawLabel::Unscoreable | RawLabel::Unjudged => Ok(None),
        }
    }
}

#[derive(Debug)]
pub enum LabelError {
    /// A scored value outside the transform's accepted domain
    InvalidLabel(i64),
}

impl std::fmt::Display for LabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelError::InvalidLabel(value) => {
                write!(f, "label {} is outside the transform's domain", value)
            }
        }
    }
}

impl std::error::Error for LabelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keeps_scores_and_drops_sentinels() {
        let transform = IdentityTransform;
        assert_eq!(transform.apply(&RawLabel::Scored(4)).unwrap(), Some(4));
        assert_eq!(transform.apply(&RawLabel::Unscoreable).unwrap(), None);
        assert_eq!(transform.apply(&RawLabel::Unjudged).unwrap(), None);
    }

    #[test]
    fn ternary_buckets_the_scale() {
        let transform = TernaryTransform;
        assert_eq!(
            transform.apply(&RawLabel::Scored(1)).unwrap(),
            Some(TernaryTransform::LOW)
        );
        assert_eq!(
            transform.apply(&RawLabel::Scored(4)).unwrap(),
            Some(TernaryTransform::MEDIUM)
        );
        assert_eq!(
            transform.apply(&RawLabel::Scored(7)).unwrap(),
            Some(TernaryTransform::HIGH)
        );
        assert_eq!(transform.apply(&RawLabel::Unjudged).unwrap(), None);
    }

    #[test]
    fn ternary_rejects_out_of_domain_scores() {
        let transform = TernaryTransform;
        assert!(transform.apply(&RawLabel::Scored(9)).is_err());
        assert!(transform.apply(&RawLabel::Scored(0)).is_err());
    }

    #[test]
    fn bucket_names_cover_all_classes() {
        assert_eq!(TernaryTransform::bucket_name(0), Some("low"));
        assert_eq!(TernaryTransform::bucket_name(2), Some("high"));
        assert_eq!(TernaryTransform::bucket_name(5), None);
    }
}
