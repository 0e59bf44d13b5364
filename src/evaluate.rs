//! Evaluation of a trained model on held-out documents.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::Document;
use crate::error::{ClassifierError, Result, Stage};
use crate::predict::PredictionEngine;
use crate::utils::math::log_sum_exp;

/// Probabilities are clamped to this before taking the log
pub const LOG_LOSS_EPSILON: f64 = 1e-15;

/// Confusion matrix, `counts[true][predicted]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    fn new(labels: Vec<String>) -> Self {
        let k = labels.len();
        Self {
            labels,
            counts: vec![vec![0; k]; k],
        }
    }

    /// documents whose true class is `class_id`
    pub fn support(&self, class_id: usize) -> u64 {
        self.counts.get(class_id).map_or(0, |row| row.iter().sum())
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> u64 {
        (0..self.counts.len()).map(|c| self.counts[c][c]).sum()
    }
}

/// Evaluation metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// overall fraction correct
    pub micro_accuracy: f64,
    /// unweighted mean of per-class accuracy over classes present in the test set
    pub macro_accuracy: f64,
    /// mean -ln p(true class)
    pub log_loss: f64,
    /// 1 - log_loss / (log loss of the test set's class prior)
    pub log_loss_reduction: f64,
    /// mean log loss per class id, `None` when the class has no test documents
    pub per_class_log_loss: Vec<Option<f64>>,
    pub confusion_matrix: ConfusionMatrix,
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Micro accuracy:     {:.2}%", self.micro_accuracy * 100.0)?;
        writeln!(f, "Macro accuracy:     {:.2}%", self.macro_accuracy * 100.0)?;
        writeln!(f, "Log loss:           {:.4}", self.log_loss)?;
        write!(f, "Log loss reduction: {:.4}", self.log_loss_reduction)
    }
}

pub struct Evaluator;

impl Evaluator {
    /// Score `engine` against labeled test documents
    ///
    /// # Errors
    /// * `DegenerateInput` for an empty test set
    /// * `UnknownLabel` if a test label was never seen in training
    pub fn evaluate(engine: &PredictionEngine, docs: &[Document]) -> Result<Metrics> {
        if docs.is_empty() {
            return Err(ClassifierError::degenerate(
                Stage::Evaluate,
                "no test documents",
            ));
        }
        let labels = engine.artifact().labels();
        let k = labels.len();

        let outcomes: Vec<(usize, usize, f64)> = docs
            .par_iter()
            .map(|doc| {
                let truth = labels.require_id(&doc.label, Stage::Evaluate)?;
                let prediction = engine.predict(&doc.text);
                Ok((truth, prediction.class_id, Self::nll(&prediction.scores, truth)))
            })
            .collect::<Result<_>>()?;

        let mut confusion = ConfusionMatrix::new(labels.labels().map(str::to_string).collect());
        let mut class_loss = vec![0.0; k];
        let mut total_loss = 0.0;
        for &(truth, predicted, loss) in &outcomes {
            confusion.counts[truth][predicted] += 1;
            class_loss[truth] += loss;
            total_loss += loss;
        }

        let n = outcomes.len() as f64;
        let micro_accuracy = confusion.correct() as f64 / n;

        let present: Vec<usize> = (0..k).filter(|&c| confusion.support(c) > 0).collect();
        let macro_accuracy = present
            .iter()
            .map(|&c| confusion.counts[c][c] as f64 / confusion.support(c) as f64)
            .sum::<f64>()
            / present.len() as f64;

        let log_loss = total_loss / n;
        let prior_log_loss: f64 = present
            .iter()
            .map(|&c| {
                let p = confusion.support(c) as f64 / n;
                -p * p.ln()
            })
            .sum();
        let log_loss_reduction = if prior_log_loss > 0.0 {
            1.0 - log_loss / prior_log_loss
        } else {
            0.0
        };

        let per_class_log_loss = (0..k)
            .map(|c| {
                let support = confusion.support(c);
                (support > 0).then(|| class_loss[c] / support as f64)
            })
            .collect();

        Ok(Metrics {
            micro_accuracy,
            macro_accuracy,
            log_loss,
            log_loss_reduction,
            per_class_log_loss,
            confusion_matrix: confusion,
        })
    }

    /// `-ln softmax(scores)[truth]`, clamped at `-ln(LOG_LOSS_EPSILON)`
    #[inline]
    pub fn nll(scores: &[f64], truth: usize) -> f64 {
        let loss = log_sum_exp(scores) - scores[truth];
        loss.clamp(0.0, -LOG_LOSS_EPSILON.ln())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nll_matches_softmax() {
        let scores = [2.0, 0.5, -1.0];
        let p = crate::utils::math::softmax(&scores);
        for c in 0..3 {
            assert!((Evaluator::nll(&scores, c) + p[c].ln()).abs() < 1e-12);
        }
    }

    #[test]
    fn nll_is_clamped() {
        let loss = Evaluator::nll(&[1000.0, -1000.0], 1);
        assert!((loss - 34.538776394910684).abs() < 1e-9);
        assert!(Evaluator::nll(&[1000.0, -1000.0], 0) >= 0.0);
    }

    #[test]
    fn confusion_counts() {
        let mut m = ConfusionMatrix::new(vec!["a".into(), "b".into()]);
        m.counts = vec![vec![3, 1], vec![0, 2]];
        assert_eq!(m.total(), 6);
        assert_eq!(m.correct(), 5);
        assert_eq!(m.support(0), 4);
        assert_eq!(m.support(7), 0);
    }
}
