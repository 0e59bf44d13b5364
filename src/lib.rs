/// This crate is a short-text classifier built on TF-IDF features and a
/// linear multiclass model trained with stochastic dual coordinate ascent.
pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod label;
pub mod model_store;
pub mod pipeline;
pub mod predict;
pub mod trainer;
pub mod utils;
pub mod vectorizer;

/// Tokenizer
/// Lowercases, strips punctuation and splits on whitespace.
/// Empty input yields no tokens, which is not an error.
pub use vectorizer::token::{TokenFrequency, Tokenizer};

/// TF-IDF Vectorizer
/// Fitted once on the training split. It holds:
/// - The vocabulary (token → dense index, first-seen order)
/// - The IDF table, indexed like the vocabulary
///
/// `TfIdfVectorizer<E>` takes the TF-IDF calculation engine as a parameter.
/// `DefaultTFIDFEngine` uses `tf = count / total` and
/// `idf = ln((N + 1) / (df + 1)) + 1`.
pub use vectorizer::{IdfTable, TfIdfVectorizer, Vocabulary};
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Min-max normalization stats
/// Learned from training vectors and applied unchanged everywhere else.
pub use utils::normalizer::NormalizationStats;

/// Label ↔ class id bijection
pub use label::LabelSpace;

/// SDCA trainer and the linear model it produces
/// Training returns a `TrainingReport`; hitting `max_epochs` is reported
/// through `converged == false`, not as an error.
pub use trainer::{model::LinearModel, SdcaTrainer, TrainerConfig, TrainingOutcome, TrainingReport};

/// Trained artifact and its versioned on-disk store
pub use artifact::TrainedArtifact;
pub use model_store::ModelStore;

/// Inference and evaluation
pub use evaluate::{ConfusionMatrix, Evaluator, Metrics};
pub use predict::{Prediction, PredictionEngine};

/// Records, splitting and the end-to-end pipeline
pub use config::PipelineConfig;
pub use dataset::{train_test_split, CsvConfig, CsvLoader, Document, LoadReport, MalformedRowPolicy};
pub use pipeline::{Pipeline, PipelineOutcome, TrainedModel};

pub use error::{ClassifierError, Result, Stage};
