use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result, Stage};
use crate::utils::math::dot;

/// Linear multiclass model
/// One weight vector and one bias per class id.
/// Immutable once handed out by the trainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl LinearModel {
    pub fn new(weights: Vec<Vec<f64>>, biases: Vec<f64>) -> Result<Self> {
        let model = Self { weights, biases };
        model.validate()?;
        Ok(model)
    }

    /// Every class has a bias and every weight vector has the same length
    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != self.biases.len() {
            return Err(ClassifierError::dimension(
                Stage::Train,
                self.weights.len(),
                self.biases.len(),
            ));
        }
        let dim = self.dim();
        if let Some(w) = self.weights.iter().find(|w| w.len() != dim) {
            return Err(ClassifierError::dimension(Stage::Train, dim, w.len()));
        }
        Ok(())
    }

    #[inline]
    pub fn num_classes(&self) -> usize {
        self.biases.len()
    }

    /// feature dimension
    #[inline]
    pub fn dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    /// `w_c · x + b_c` for every class
    pub fn scores(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(w, &b)| dot(w, x) + b)
            .collect()
    }
}
