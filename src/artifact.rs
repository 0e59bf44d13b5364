use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result, Stage};
use crate::label::LabelSpace;
use crate::trainer::model::LinearModel;
use crate::utils::normalizer::NormalizationStats;
use crate::vectorizer::{IdfTable, Vocabulary};

/// Everything needed to reproduce a prediction
/// Built once after training, then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedArtifact {
    vocabulary: Vocabulary,
    idf: IdfTable,
    normalization: NormalizationStats,
    labels: LabelSpace,
    model: LinearModel,
}

impl TrainedArtifact {
    /// Assemble and validate
    ///
    /// # Errors
    /// * `DegenerateInput` if the label space has fewer than 2 classes
    /// * `DimensionMismatch` if the vocabulary, IDF table, normalization
    ///   stats, label space and model disagree on their sizes
    pub fn new(
        vocabulary: Vocabulary,
        idf: IdfTable,
        normalization: NormalizationStats,
        labels: LabelSpace,
        model: LinearModel,
    ) -> Result<Self> {
        let artifact = Self {
            vocabulary,
            idf,
            normalization,
            labels,
            model,
        };
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<()> {
        if self.labels.len() < 2 {
            return Err(ClassifierError::degenerate(
                Stage::Train,
                format!("need at least 2 classes, found {}", self.labels.len()),
            ));
        }
        let dim = self.vocabulary.len();
        if self.idf.len() != dim {
            return Err(ClassifierError::dimension(Stage::Vectorize, dim, self.idf.len()));
        }
        self.normalization.validate()?;
        if self.normalization.dim() != dim {
            return Err(ClassifierError::dimension(
                Stage::Normalize,
                dim,
                self.normalization.dim(),
            ));
        }
        self.model.validate()?;
        if self.model.num_classes() != self.labels.len() {
            return Err(ClassifierError::dimension(
                Stage::Train,
                self.labels.len(),
                self.model.num_classes(),
            ));
        }
        // an empty vocabulary gives 0-length weight vectors
        if dim > 0 && self.model.dim() != dim {
            return Err(ClassifierError::dimension(Stage::Train, dim, self.model.dim()));
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }

    pub fn normalization(&self) -> &NormalizationStats {
        &self.normalization
    }

    pub fn labels(&self) -> &LabelSpace {
        &self.labels
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact_json(labels: &str, weights: &str, biases: &str) -> String {
        format!(
            r#"{{
                "vocabulary": {{ "tokens": ["hoax", "resmi"] }},
                "idf": {{ "idf_vec": [1.0, 1.5], "doc_num": 2 }},
                "normalization": {{ "min": [0.0, 0.0], "max": [0.5, 0.75] }},
                "labels": {{ "labels": {} }},
                "model": {{ "weights": {}, "biases": {} }}
            }}"#,
            labels, weights, biases
        )
    }

    #[test]
    fn consistent_artifact_validates() {
        let json = artifact_json(
            r#"[["hoax", 1], ["valid", 1]]"#,
            "[[1.0, -1.0], [-1.0, 1.0]]",
            "[0.0, 0.0]",
        );
        let artifact: TrainedArtifact = serde_json::from_str(&json).unwrap();
        assert!(artifact.validate().is_ok());
    }

    #[test]
    fn single_class_artifact_is_rejected() {
        let json = artifact_json(r#"[["hoax", 2]]"#, "[[1.0, -1.0]]", "[0.0]");
        let artifact: TrainedArtifact = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            artifact.validate(),
            Err(ClassifierError::DegenerateInput { .. })
        ));

        let json = artifact_json("[]", "[]", "[]");
        let artifact: TrainedArtifact = serde_json::from_str(&json).unwrap();
        assert!(artifact.validate().is_err());
    }
}
