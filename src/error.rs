//! Error types for the classifier.
//!
//! Every failure the library can report is a [`ClassifierError`]. Each variant carries (or
//! implies) the [`Stage`] it came from so user-visible messages always say where and why.

use std::{fmt, io};

use thiserror::Error;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// reading or validating configuration
    Config,
    Load,
    Vectorize,
    Normalize,
    Train,
    Evaluate,
    Save,
    Predict,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Load => "load",
            Stage::Vectorize => "vectorize",
            Stage::Normalize => "normalize",
            Stage::Train => "train",
            Stage::Evaluate => "evaluate",
            Stage::Save => "save",
            Stage::Predict => "predict",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Malformed input record (wrong column count, missing label or text, bad header)
    #[error("[load] malformed input at row {row}: {reason}")]
    Input { row: usize, reason: String },

    /// `transform` called on a vectorizer that has no vocabulary yet
    #[error("[vectorize] vocabulary has not been fitted")]
    VocabularyNotFitted,

    /// `fit` called on a vectorizer that already holds a vocabulary
    #[error("[vectorize] vocabulary is already fitted and cannot be rebuilt")]
    AlreadyFitted,

    #[error("[{stage}] dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        stage: Stage,
        expected: usize,
        found: usize,
    },

    /// Model file written by an incompatible schema
    #[error("[load] unsupported model schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    /// Model file is not a classifier artifact or is internally inconsistent
    #[error("[load] invalid model file: {0}")]
    InvalidFormat(String),

    /// Not enough data to do anything meaningful
    #[error("[{stage}] degenerate input: {reason}")]
    DegenerateInput { stage: Stage, reason: String },

    #[error("[{stage}] unknown label '{label}'")]
    UnknownLabel { stage: Stage, label: String },

    /// Invalid hyperparameters or configuration values
    #[error("[config] invalid configuration: {0}")]
    Config(String),

    #[error("[{stage}] I/O error: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },

    #[error("[load] CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("[{stage}] serialization error: {source}")]
    Serialization {
        stage: Stage,
        #[source]
        source: serde_cbor::Error,
    },

    #[error("[config] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for classifier operations.
pub type Result<T> = std::result::Result<T, ClassifierError>;

impl ClassifierError {
    pub fn input<S: Into<String>>(row: usize, reason: S) -> Self {
        ClassifierError::Input {
            row,
            reason: reason.into(),
        }
    }

    pub fn degenerate<S: Into<String>>(stage: Stage, reason: S) -> Self {
        ClassifierError::DegenerateInput {
            stage,
            reason: reason.into(),
        }
    }

    pub fn config<S: Into<String>>(reason: S) -> Self {
        ClassifierError::Config(reason.into())
    }

    pub fn io(stage: Stage, source: io::Error) -> Self {
        ClassifierError::Io { stage, source }
    }

    pub fn dimension(stage: Stage, expected: usize, found: usize) -> Self {
        ClassifierError::DimensionMismatch {
            stage,
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_stage() {
        let err = ClassifierError::degenerate(Stage::Train, "fewer than 2 classes");
        assert_eq!(
            err.to_string(),
            "[train] degenerate input: fewer than 2 classes"
        );

        let err = ClassifierError::SchemaVersion {
            found: 9,
            expected: 1,
        };
        assert!(err.to_string().starts_with("[load]"));

        let err = ClassifierError::dimension(Stage::Normalize, 3, 2);
        assert_eq!(
            err.to_string(),
            "[normalize] dimension mismatch: expected 3, found 2"
        );

        let err = ClassifierError::config("max_epochs must be at least 1");
        assert_eq!(
            err.to_string(),
            "[config] invalid configuration: max_epochs must be at least 1"
        );

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(ClassifierError::from(json).to_string().starts_with("[config]"));
    }
}
