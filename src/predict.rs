use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::artifact::TrainedArtifact;
use crate::utils::math::{argmax, softmax};
use crate::vectorizer::{tfidf::DefaultTFIDFEngine, token::Tokenizer, TfIdfVectorizer};

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub class_id: usize,
    /// raw linear score per class id
    pub scores: Vec<f64>,
    /// softmax of `scores`
    pub probabilities: Vec<f64>,
    /// no in-vocabulary token was found, the majority class was returned
    pub fallback: bool,
}

impl Prediction {
    /// probability assigned to `class_id`
    #[inline]
    pub fn probability(&self, class_id: usize) -> Option<f64> {
        self.probabilities.get(class_id).copied()
    }
}

/// Prediction engine
/// Tokenize → TF-IDF → normalize → linear scores → argmax → label.
///
/// Holds the artifact behind an `Arc` and never mutates it, so clones are cheap
/// and the engine can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    artifact: Arc<TrainedArtifact>,
    tokenizer: Tokenizer,
}

impl PredictionEngine {
    pub fn new(artifact: TrainedArtifact) -> Self {
        Self::from_shared(Arc::new(artifact))
    }

    pub fn from_shared(artifact: Arc<TrainedArtifact>) -> Self {
        Self {
            artifact,
            tokenizer: Tokenizer::new(),
        }
    }

    pub fn artifact(&self) -> &TrainedArtifact {
        &self.artifact
    }

    /// Predict a document
    /// Empty or all out-of-vocabulary input is a normal case: the training
    /// majority class is returned with `fallback` set.
    pub fn predict(&self, text: &str) -> Prediction {
        let artifact = &*self.artifact;
        let raw = TfIdfVectorizer::<DefaultTFIDFEngine>::vectorize(
            &self.tokenizer,
            artifact.vocabulary(),
            artifact.idf(),
            text,
        );
        let fallback = raw.iter().all(|&x| x == 0.0);
        let features = artifact.normalization().apply(&raw);
        let scores = artifact.model().scores(&features);
        let probabilities = softmax(&scores);

        let class_id = if fallback {
            artifact.labels().majority_class()
        } else {
            argmax(&scores).unwrap_or_else(|| artifact.labels().majority_class())
        };
        let label = artifact
            .labels()
            .label_of(class_id)
            .unwrap_or_default()
            .to_string();

        Prediction {
            label,
            class_id,
            scores,
            probabilities,
            fallback,
        }
    }

    /// Predict and return only the label
    #[inline]
    pub fn predict_label(&self, text: &str) -> String {
        self.predict(text).label
    }
}
