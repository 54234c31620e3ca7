//! Feature-name to matrix-column mapping.

use std::collections::HashMap;

use ndarray::Array2;

use super::extractors::FeatureDict;

/// Fixed mapping between feature names and matrix columns.
///
/// The schema is established once by [`fit`](FeatureVectorizer::fit) from
/// every name observed in the training dicts, in lexicographic column
/// order, and is immutable afterward. Transforming against an existing
/// schema zero-fills names the schema has never seen; it never errors and
/// never grows the schema, so train and assessment matrices always share a
/// column space.
///
/// # Examples
///
/// ```
/// use complexity_gauge::features::{FeatureDict, FeatureVectorizer};
///
/// let dicts = vec![
///     FeatureDict::from([("b".to_string(), 2.0)]),
///     FeatureDict::from([("a".to_string(), 1.0)]),
/// ];
/// let (vectorizer, matrix) = FeatureVectorizer::fit_transform(&dicts);
/// assert_eq!(vectorizer.feature_names(), ["a", "b"]);
/// assert_eq!(matrix[[0, 1]], 2.0);
/// assert_eq!(matrix[[1, 0]], 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureVectorizer {
    names: Vec<String>,
    columns: HashMap<String, usize>,
}

impl FeatureVectorizer {
    /// Establishes the schema from every feature name in `dicts`.
    pub fn fit(dicts: &[FeatureDict]) -> Self {
        let mut names: Vec<String> = dicts
            .iter()
            .flat_map(|dict| dict.keys().cloned())
            .collect();
        names.sort();
        names.dedup();

        let columns = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();

        Self { names, columns }
    }

    /// Transforms dicts into a dense matrix under this schema.
    ///
    /// Names absent from the schema are silently dropped; columns with no
    /// value in a dict stay zero.
    pub fn transform(&self, dicts: &[FeatureDict]) -> Array2<f64> {
        let mut matrix = Array2::zeros((dicts.len(), self.names.len()));
        for (row, dict) in dicts.iter().enumerate() {
            for (name, value) in dict {
                if let Some(&column) = self.columns.get(name) {
                    matrix[[row, column]] = *value;
                }
            }
        }
        matrix
    }

    /// Fits a fresh schema and transforms in one step (training mode).
    pub fn fit_transform(dicts: &[FeatureDict]) -> (Self, Array2<f64>) {
        let vectorizer = Self::fit(dicts);
        let matrix = vectorizer.transform(dicts);
        (vectorizer, matrix)
    }

    /// Column names in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    /// Column index of a feature name, if the schema knows it.
    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Feature name of a column index.
    pub fn name_of(&self, column: usize) -> Option<&str> {
        self.names.get(column).map(String::as_str)
    }

    /// Number of columns in the schema.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, f64)]) -> FeatureDict {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn fit_orders_columns_lexicographically() {
        let dicts = vec![dict(&[("zeta", 1.0), ("alpha", 2.0)]), dict(&[("mid", 3.0)])];
        let vectorizer = FeatureVectorizer::fit(&dicts);
        assert_eq!(vectorizer.feature_names(), ["alpha", "mid", "zeta"]);
        assert_eq!(vectorizer.column_of("mid"), Some(1));
        assert_eq!(vectorizer.name_of(2), Some("zeta"));
    }

    #[test]
    fn two_independent_fits_agree() {
        let dicts = vec![
            dict(&[("b", 1.0), ("a", 2.0)]),
            dict(&[("c", 3.0), ("a", 4.0)]),
        ];
        let (first, matrix_a) = FeatureVectorizer::fit_transform(&dicts);
        let (second, matrix_b) = FeatureVectorizer::fit_transform(&dicts);
        assert_eq!(first.feature_names(), second.feature_names());
        assert_eq!(matrix_a, matrix_b);
    }

    #[test]
    fn transform_zero_fills_unseen_names() {
        let train = vec![dict(&[("a", 1.0), ("b", 2.0)])];
        let vectorizer = FeatureVectorizer::fit(&train);

        let assess = vec![dict(&[("a", 5.0), ("never_seen", 9.0)])];
        let matrix = vectorizer.transform(&assess);

        // Same column count as training; the unseen name contributes nothing.
        assert_eq!(matrix.ncols(), 2);
        assert_eq!(matrix[[0, 0]], 5.0);
        assert_eq!(matrix[[0, 1]], 0.0);
    }

    #[test]
    fn transform_of_empty_dicts_has_schema_width() {
        let vectorizer = FeatureVectorizer::fit(&[dict(&[("a", 1.0)])]);
        let matrix = vectorizer.transform(&[]);
        assert_eq!(matrix.nrows(), 0);
        assert_eq!(matrix.ncols(), 1);
    }
}
