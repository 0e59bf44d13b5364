//! Multiclass linear trainer based on stochastic dual coordinate ascent.
//!
//! The primal problem is L2-regularized multinomial logistic regression
//!
//! ```text
//! min_w  λ/2 Σ_c ‖w_c‖² + 1/n Σ_i (log Σ_c exp(s_c(x_i)) - s_{y_i}(x_i))
//! ```
//!
//! Each example owns a dual distribution `π_i` over the classes, starting at the one-hot
//! of its true class. The dual variable is `α_i = onehot(y_i) - π_i`, and the primal
//! weights are kept equal to `1/(λn) Σ_i α_ic x_i`. At the optimum `π_i` equals the
//! model's softmax for `x_i`.
//!
//! One coordinate step moves `π_i` toward `softmax(s(x_i))` by the step `t ∈ [0, 1]` that
//! maximizes the dual. The 1-D problem is concave; it is solved by Newton iterations kept
//! inside a bisection bracket. Bias terms use an implicit constant feature of 1.

pub mod model;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result, Stage};
use crate::trainer::model::LinearModel;
use crate::utils::math::{axpy, dot, norm_sq, softmax};

/// Trainer hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// λ, must be > 0
    pub l2_regularization: f64,
    /// upper bound on passes over the data
    pub max_epochs: usize,
    /// stop once the largest dual change of an epoch falls below this
    pub tolerance: f64,
    /// visit examples in a seeded random order each epoch
    pub shuffle: bool,
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            l2_regularization: 0.01,
            max_epochs: 200,
            tolerance: 1e-4,
            shuffle: true,
            seed: 42,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.l2_regularization > 0.0) || !self.l2_regularization.is_finite() {
            return Err(ClassifierError::config(format!(
                "l2_regularization must be a positive number, got {}",
                self.l2_regularization
            )));
        }
        if self.max_epochs == 0 {
            return Err(ClassifierError::config("max_epochs must be at least 1"));
        }
        if !(self.tolerance > 0.0) {
            return Err(ClassifierError::config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// How a training run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// tolerance reached before `max_epochs`
    pub converged: bool,
    /// epochs actually run
    pub epochs: usize,
    /// largest |Δα| seen in the last epoch
    pub max_dual_change: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: LinearModel,
    pub report: TrainingReport,
}

/// SDCA trainer
/// Every `fit` call starts from fresh state and returns a fresh model.
#[derive(Debug, Clone)]
pub struct SdcaTrainer {
    config: TrainerConfig,
}

impl SdcaTrainer {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Fit a linear model
    ///
    /// # Arguments
    /// * `features` - normalized training vectors, all of one length
    /// * `classes` - class id per vector
    /// * `num_classes` - size of the label space
    ///
    /// # Errors
    /// Preconditions are checked before any training work:
    /// * `DegenerateInput` for no examples, fewer than 2 classes or an out-of-range id
    /// * `DimensionMismatch` for ragged input
    pub fn fit<V>(&self, features: &[V], classes: &[usize], num_classes: usize) -> Result<TrainingOutcome>
    where
        V: AsRef<[f64]>,
    {
        let dim = Self::check_input(features, classes, num_classes)?;
        let n = features.len();
        let lambda_n = self.config.l2_regularization * n as f64;

        let mut state = SdcaState::new(classes, num_classes, dim);
        // ‖x‖² + 1 for the implicit bias feature
        let sq_norms: Vec<f64> = features.iter().map(|x| norm_sq(x.as_ref()) + 1.0).collect();
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let mut report = TrainingReport {
            converged: false,
            epochs: 0,
            max_dual_change: f64::INFINITY,
        };

        for epoch in 1..=self.config.max_epochs {
            if self.config.shuffle {
                order.shuffle(&mut rng);
            }
            let mut max_change: f64 = 0.0;
            for &i in &order {
                let delta = state.step(i, features[i].as_ref(), sq_norms[i], lambda_n);
                max_change = max_change.max(delta.abs());
            }
            report.epochs = epoch;
            report.max_dual_change = max_change;
            tracing::debug!(epoch, max_change, "sdca epoch");
            if max_change < self.config.tolerance {
                report.converged = true;
                break;
            }
        }

        if report.converged {
            tracing::info!(epochs = report.epochs, "training converged");
        } else {
            tracing::warn!(
                epochs = report.epochs,
                max_dual_change = report.max_dual_change,
                tolerance = self.config.tolerance,
                "training reached max_epochs without converging"
            );
        }

        let model = state.into_model()?;
        Ok(TrainingOutcome { model, report })
    }

    fn check_input<V>(features: &[V], classes: &[usize], num_classes: usize) -> Result<usize>
    where
        V: AsRef<[f64]>,
    {
        let first = features.first().ok_or_else(|| {
            ClassifierError::degenerate(Stage::Train, "no training documents")
        })?;
        if num_classes < 2 {
            return Err(ClassifierError::degenerate(
                Stage::Train,
                format!("need at least 2 classes, got {}", num_classes),
            ));
        }
        if classes.len() != features.len() {
            return Err(ClassifierError::dimension(
                Stage::Train,
                features.len(),
                classes.len(),
            ));
        }
        let dim = first.as_ref().len();
        if let Some(x) = features.iter().find(|x| x.as_ref().len() != dim) {
            return Err(ClassifierError::dimension(Stage::Train, dim, x.as_ref().len()));
        }
        if let Some(&c) = classes.iter().find(|&&c| c >= num_classes) {
            return Err(ClassifierError::degenerate(
                Stage::Train,
                format!("class id {} out of range for {} classes", c, num_classes),
            ));
        }
        let mut seen = vec![false; num_classes];
        for &c in classes {
            seen[c] = true;
        }
        if seen.iter().filter(|&&s| s).count() < 2 {
            return Err(ClassifierError::degenerate(
                Stage::Train,
                "training set contains fewer than 2 distinct classes",
            ));
        }
        Ok(dim)
    }
}

/// Smallest dual probability fed to `ln`
const MIN_PROB: f64 = 1e-300;
/// Newton iterations per coordinate step
const MAX_NEWTON_ITERS: usize = 30;

/// Mutable dual/primal state, private to one `fit` call
struct SdcaState {
    num_classes: usize,
    /// n × k dual distributions, row-major
    dual_probs: Vec<f64>,
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl SdcaState {
    fn new(classes: &[usize], num_classes: usize, dim: usize) -> Self {
        let mut dual_probs = vec![0.0; classes.len() * num_classes];
        for (i, &c) in classes.iter().enumerate() {
            dual_probs[i * num_classes + c] = 1.0;
        }
        Self {
            num_classes,
            dual_probs,
            weights: vec![vec![0.0; dim]; num_classes],
            biases: vec![0.0; num_classes],
        }
    }

    #[inline]
    fn scores(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(w, b)| dot(w, x) + b)
            .collect()
    }

    /// One coordinate step for example `i`, returns the largest |Δα_ic|
    fn step(&mut self, i: usize, x: &[f64], sq_norm: f64, lambda_n: f64) -> f64 {
        let scores = self.scores(x);
        let probs = softmax(&scores);
        let row = i * self.num_classes;
        let pi = &self.dual_probs[row..row + self.num_classes];
        let direction: Vec<f64> = probs.iter().zip(pi).map(|(p, q)| p - q).collect();

        let dir_sq = norm_sq(&direction);
        if dir_sq == 0.0 {
            return 0.0;
        }
        // curvature of the primal term along the direction, ‖x‖² + 1 included
        let quad = sq_norm * dir_sq / lambda_n;
        let t = Self::line_search(pi, &direction, &scores, quad);
        if t == 0.0 {
            return 0.0;
        }

        let mut max_change: f64 = 0.0;
        for (c, &d) in direction.iter().enumerate() {
            let change = t * d;
            if change == 0.0 {
                continue;
            }
            self.dual_probs[row + c] += change;
            // α = onehot - π, so α moves by -change
            let scale = -change / lambda_n;
            axpy(scale, x, &mut self.weights[c]);
            self.biases[c] += scale;
            max_change = max_change.max(change.abs());
        }
        max_change
    }

    /// Maximize the dual along `pi + t·direction` for `t ∈ [0, 1]`
    ///
    /// `gradient(t) = Σ_c d_c (s_c - ln π_c(t)) - t·quad` is strictly decreasing,
    /// so the maximizer is its root, or 1 when it stays non-negative.
    fn line_search(pi: &[f64], direction: &[f64], scores: &[f64], quad: f64) -> f64 {
        let at = |t: f64| -> (f64, f64) {
            let mut gradient = -t * quad;
            let mut curvature = -quad;
            for ((&q, &d), &s) in pi.iter().zip(direction).zip(scores) {
                if d == 0.0 {
                    continue;
                }
                let prob = (q + t * d).max(MIN_PROB);
                gradient += d * (s - prob.ln());
                curvature -= d * d / prob;
            }
            (gradient, curvature)
        };

        if at(1.0).0 >= 0.0 {
            return 1.0;
        }
        let (mut lo, mut hi) = (0.0, 1.0);
        let mut t = 0.5;
        for _ in 0..MAX_NEWTON_ITERS {
            let (gradient, curvature) = at(t);
            if gradient.abs() < 1e-12 {
                break;
            }
            if gradient > 0.0 {
                lo = t;
            } else {
                hi = t;
            }
            if hi - lo < 1e-12 {
                break;
            }
            let newton = t - gradient / curvature;
            t = if newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
        }
        t
    }

    fn into_model(self) -> Result<LinearModel> {
        LinearModel::new(self.weights, self.biases)
    }
}
