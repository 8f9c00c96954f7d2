//! Sparse feature vectors produced by the vectorizer.

use serde::{Deserialize, Serialize};

use crate::error::{FlareError, Result};

/// A sparse numeric vector indexed by vocabulary positions.
///
/// Entries are kept sorted by index with no duplicates; indices are always
/// below `dimension`. Feature vectors are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FeatureVectorData")]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

/// Unchecked wire form; deserialization goes through [`FeatureVector::new`].
#[derive(Deserialize)]
struct FeatureVectorData {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl TryFrom<FeatureVectorData> for FeatureVector {
    type Error = FlareError;

    fn try_from(data: FeatureVectorData) -> Result<Self> {
        FeatureVector::new(data.dimension, data.entries)
    }
}

impl FeatureVector {
    /// Build a feature vector from `(index, value)` entries in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of range or appears twice.
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Result<Self> {
        entries.sort_by_key(|&(index, _)| index);
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(FlareError::invalid_argument(format!(
                    "duplicate feature index {}",
                    pair[0].0
                )));
            }
        }
        if let Some(&(index, _)) = entries.last()
            && index >= dimension
        {
            return Err(FlareError::invalid_argument(format!(
                "feature index {index} out of range for dimension {dimension}"
            )));
        }
        Ok(Self { dimension, entries })
    }

    /// Build from entries already sorted, unique and in range.
    pub(crate) fn from_sorted(dimension: usize, entries: Vec<(usize, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|p| p[0].0 < p[1].0));
        debug_assert!(entries.last().is_none_or(|&(i, _)| i < dimension));
        Self { dimension, entries }
    }

    /// An all-zero vector.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Build a sparse vector from a dense slice, dropping zeros.
    pub fn from_dense(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0.0)
            .map(|(i, &v)| (i, v))
            .collect();
        Self {
            dimension: values.len(),
            entries,
        }
    }

    /// Number of dimensions (the vocabulary size that produced it).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, v)| v == 0.0)
    }

    /// Value at `index` (zero when absent or out of range).
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Iterate over stored `(index, value)` entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Expand into a dense vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for &(index, value) in &self.entries {
            dense[index] = value;
        }
        dense
    }

    /// Dot product with a dense weight vector.
    ///
    /// # Errors
    ///
    /// Returns [`FlareError::DimensionMismatch`] when `weights.len()` differs
    /// from this vector's dimension.
    pub fn dot(&self, weights: &[f64]) -> Result<f64> {
        if weights.len() != self.dimension {
            return Err(FlareError::dimension_mismatch(weights.len(), self.dimension));
        }
        Ok(self.dot_unchecked(weights))
    }

    pub(crate) fn dot_unchecked(&self, weights: &[f64]) -> f64 {
        self.entries.iter().map(|&(i, v)| weights[i] * v).sum()
    }

    /// Squared Euclidean norm.
    pub fn squared_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_entries() {
        let vector = FeatureVector::new(5, vec![(3, 2.0), (0, 1.0)]).unwrap();
        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(0, 1.0), (3, 2.0)]);
        assert_eq!(vector.get(3), 2.0);
        assert_eq!(vector.get(1), 0.0);
        assert_eq!(vector.get(99), 0.0);
        assert_eq!(vector.to_dense(), vec![1.0, 0.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_new_rejects_bad_entries() {
        assert!(FeatureVector::new(2, vec![(2, 1.0)]).is_err());
        assert!(FeatureVector::new(4, vec![(1, 1.0), (1, 2.0)]).is_err());
    }

    #[test]
    fn test_deserialize_validates_entries() {
        let vector: FeatureVector =
            serde_json::from_str(r#"{"dimension":3,"entries":[[2,0.5],[0,1.0]]}"#).unwrap();
        assert_eq!(vector.iter().collect::<Vec<_>>(), vec![(0, 1.0), (2, 0.5)]);

        for json in [
            r#"{"dimension":2,"entries":[[5,1.0]]}"#,
            r#"{"dimension":4,"entries":[[1,1.0],[1,2.0]]}"#,
        ] {
            assert!(serde_json::from_str::<FeatureVector>(json).is_err(), "{json}");
        }
    }

    #[test]
    fn test_from_dense_and_zeros() {
        let vector = FeatureVector::from_dense(&[0.0, 1.5, 0.0]);
        assert_eq!(vector.dimension(), 3);
        assert_eq!(vector.nnz(), 1);
        assert!(!vector.is_zero());

        let zeros = FeatureVector::zeros(4);
        assert_eq!(zeros.dimension(), 4);
        assert!(zeros.is_zero());
    }

    #[test]
    fn test_dot_checks_dimension() {
        let vector = FeatureVector::from_dense(&[1.0, 2.0, 0.0]);
        assert_eq!(vector.dot(&[0.5, 0.25, 9.0]).unwrap(), 1.0);
        assert!(matches!(
            vector.dot(&[1.0, 1.0]),
            Err(FlareError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert_eq!(vector.squared_norm(), 5.0);
    }
}
