use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result, Stage};

/// Per-dimension min/max learned from training vectors
/// `max >= min` always holds. A dimension with `max == min` is constant
/// and normalizes to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl NormalizationStats {
    /// Learn min/max from training vectors
    ///
    /// # Errors
    /// * `DegenerateInput` for an empty set
    /// * `DimensionMismatch` if vector lengths differ
    pub fn fit<V>(vectors: &[V]) -> Result<Self>
    where
        V: AsRef<[f64]>,
    {
        let first = vectors.first().ok_or_else(|| {
            ClassifierError::degenerate(Stage::Normalize, "no training vectors")
        })?;
        let dim = first.as_ref().len();
        let mut min = vec![f64::INFINITY; dim];
        let mut max = vec![f64::NEG_INFINITY; dim];

        for v in vectors {
            let v = v.as_ref();
            if v.len() != dim {
                return Err(ClassifierError::dimension(Stage::Normalize, dim, v.len()));
            }
            for (i, &x) in v.iter().enumerate() {
                if x.is_nan() {
                    continue;
                }
                min[i] = min[i].min(x);
                max[i] = max[i].max(x);
            }
        }
        // all-NaN columns collapse to a constant 0 dimension
        for i in 0..dim {
            if !min[i].is_finite() || !max[i].is_finite() {
                min[i] = 0.0;
                max[i] = 0.0;
            }
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.min.len()
    }

    /// Consistency check used when an artifact is assembled or loaded
    pub fn validate(&self) -> Result<()> {
        if self.min.len() != self.max.len() {
            return Err(ClassifierError::dimension(
                Stage::Normalize,
                self.min.len(),
                self.max.len(),
            ));
        }
        if self.min.iter().zip(&self.max).any(|(lo, hi)| !(hi >= lo)) {
            return Err(ClassifierError::InvalidFormat(
                "normalization max < min".to_string(),
            ));
        }
        Ok(())
    }

    /// 0.0 - 1.0に正規化
    #[inline]
    pub fn normalize_value(x: f64, min: f64, max: f64) -> f64 {
        let range = max - min;
        if range <= 0.0 || x.is_nan() {
            return 0.0;
        }
        ((x - min) / range).clamp(0.0, 1.0)
    }

    /// Normalize with a length check
    pub fn transform(&self, vector: &[f64]) -> Result<Vec<f64>> {
        if vector.len() != self.dim() {
            return Err(ClassifierError::dimension(
                Stage::Normalize,
                self.dim(),
                vector.len(),
            ));
        }
        Ok(self.apply(vector))
    }

    /// Normalize a vector already known to have the right length
    #[inline]
    pub fn apply(&self, vector: &[f64]) -> Vec<f64> {
        debug_assert_eq!(vector.len(), self.dim());
        vector
            .iter()
            .zip(self.min.iter().zip(&self.max))
            .map(|(&x, (&lo, &hi))| Self::normalize_value(x, lo, hi))
            .collect()
    }

    /// Normalize many vectors on the rayon pool
    pub fn transform_batch(&self, vectors: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        vectors.par_iter().map(|v| self.transform(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_and_transform() {
        let stats =
            NormalizationStats::fit(&[vec![0.0, 1.0, 5.0], vec![2.0, 1.0, 10.0]]).unwrap();
        assert_eq!(stats.min, vec![0.0, 1.0, 5.0]);
        assert_eq!(stats.max, vec![2.0, 1.0, 10.0]);

        let out = stats.transform(&[1.0, 1.0, 20.0]).unwrap();
        // constant dimension maps to 0, out-of-range clamps
        assert_eq!(out, vec![0.5, 0.0, 1.0]);

        let out = stats.transform(&[-3.0, 7.0, 7.5]).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 0.5]);
    }

    #[test]
    fn output_is_bounded() {
        let stats = NormalizationStats::fit(&[vec![0.3, -1.0], vec![0.9, 4.0]]).unwrap();
        for v in [[0.0, 0.0], [100.0, -100.0], [f64::NAN, 2.0]] {
            for x in stats.transform(&v).unwrap() {
                assert!((0.0..=1.0).contains(&x));
            }
        }
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        let empty: [Vec<f64>; 0] = [];
        assert!(matches!(
            NormalizationStats::fit(&empty),
            Err(ClassifierError::DegenerateInput { .. })
        ));
        assert!(matches!(
            NormalizationStats::fit(&[vec![1.0, 2.0], vec![1.0]]),
            Err(ClassifierError::DimensionMismatch { .. })
        ));

        let stats = NormalizationStats::fit(&[vec![1.0, 2.0]]).unwrap();
        assert!(stats.transform(&[1.0]).is_err());
    }

    #[test]
    fn validate_catches_inverted_bounds() {
        let stats = NormalizationStats {
            min: vec![1.0],
            max: vec![0.0],
        };
        assert!(stats.validate().is_err());
    }
}
