use crate::artifact::TrainedArtifact;
use crate::config::PipelineConfig;
use crate::dataset::{train_test_split, Document};
use crate::error::{Result, Stage};
use crate::evaluate::{Evaluator, Metrics};
use crate::label::LabelSpace;
use crate::predict::PredictionEngine;
use crate::trainer::{SdcaTrainer, TrainingReport};
use crate::utils::normalizer::NormalizationStats;
use crate::vectorizer::TfIdfVectorizer;

/// Fitted artifact plus how training went
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub artifact: TrainedArtifact,
    pub report: TrainingReport,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub artifact: TrainedArtifact,
    pub report: TrainingReport,
    /// `None` when `test_fraction` left no test documents
    pub metrics: Option<Metrics>,
    pub train_size: usize,
    pub test_size: usize,
}

/// Label space → TF-IDF → min-max → SDCA, each stage fitted on training data only
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Fit every stage on `train`
    pub fn fit(&self, train: &[Document]) -> Result<TrainedModel> {
        // degenerate label sets fail here, before any vectorization work
        let labels = LabelSpace::fit(&train.iter().map(|d| d.label.as_str()).collect::<Vec<_>>())?;
        let classes = train
            .iter()
            .map(|d| labels.require_id(&d.label, Stage::Train))
            .collect::<Result<Vec<_>>>()?;
        let trainer = SdcaTrainer::new(self.config.trainer.clone())?;

        let mut vectorizer: TfIdfVectorizer = TfIdfVectorizer::new();
        vectorizer.fit(train)?;
        let raw = vectorizer.transform_batch(train)?;

        let normalization = NormalizationStats::fit(&raw)?;
        let features = normalization.transform_batch(&raw)?;

        tracing::info!(
            documents = train.len(),
            vocabulary = features.first().map_or(0, Vec::len),
            classes = labels.len(),
            "training"
        );
        let outcome = trainer.fit(&features, &classes, labels.len())?;

        let (vocabulary, idf) = vectorizer.into_parts()?;
        let artifact =
            TrainedArtifact::new(vocabulary, idf, normalization, labels, outcome.model)?;
        Ok(TrainedModel {
            artifact,
            report: outcome.report,
        })
    }

    /// Split, fit and evaluate
    pub fn run(&self, docs: &[Document]) -> Result<PipelineOutcome> {
        let (train, test) = train_test_split(docs, self.config.test_fraction, self.config.seed)?;
        tracing::info!(
            total = docs.len(),
            train = train.len(),
            test = test.len(),
            "dataset split"
        );

        let TrainedModel { artifact, report } = self.fit(&train)?;
        let (artifact, metrics) = if test.is_empty() {
            (artifact, None)
        } else {
            let engine = PredictionEngine::new(artifact);
            let metrics = Evaluator::evaluate(&engine, &test)?;
            (engine.artifact().clone(), Some(metrics))
        };

        Ok(PipelineOutcome {
            artifact,
            report,
            metrics,
            train_size: train.len(),
            test_size: test.len(),
        })
    }
}
