//! Persistence tests for the versioned model format.

mod common;

use news_classifier::error::Result;
use news_classifier::model_store::{MAGIC, SCHEMA_VERSION};
use news_classifier::{ClassifierError, ModelStore, PredictionEngine, Stage, TrainedArtifact};
use tempfile::tempdir;

fn trained_artifact() -> TrainedArtifact {
    common::pipeline().run(&common::corpus()).unwrap().artifact
}

#[test]
fn test_save_load_reproduces_predictions_exactly() -> Result<()> {
    let artifact = trained_artifact();
    let before = PredictionEngine::new(artifact.clone());
    let expected: Vec<_> = common::sample_texts()
        .iter()
        .map(|t| before.predict(t))
        .collect();

    let dir = tempdir().unwrap();
    let path = dir.path().join("model_hoax.cbor");
    ModelStore::save(&artifact, &path)?;
    let loaded = ModelStore::load(&path)?;
    assert_eq!(loaded, artifact);

    let after = PredictionEngine::new(loaded);
    let actual: Vec<_> = common::sample_texts()
        .iter()
        .map(|t| after.predict(t))
        .collect();
    assert_eq!(actual.len(), 10);
    for (a, e) in actual.iter().zip(&expected) {
        assert_eq!(a.label, e.label);
        // bit-identical scores, not just close
        let a_bits: Vec<u64> = a.scores.iter().map(|s| s.to_bits()).collect();
        let e_bits: Vec<u64> = e.scores.iter().map(|s| s.to_bits()).collect();
        assert_eq!(a_bits, e_bits);
    }
    Ok(())
}

#[test]
fn test_save_leaves_no_temp_file() -> Result<()> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model.cbor");
    ModelStore::save(&trained_artifact(), &path)?;
    // overwriting an existing model works too
    ModelStore::save(&trained_artifact(), &path)?;

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["model.cbor".to_string()]);
    Ok(())
}

#[test]
fn test_header_is_written_first() -> Result<()> {
    let mut bytes = Vec::new();
    ModelStore::to_writer(&trained_artifact(), &mut bytes)?;
    assert_eq!(&bytes[..8], &MAGIC);
    assert_eq!(&bytes[8..12], &SCHEMA_VERSION.to_le_bytes());
    assert_eq!(ModelStore::from_reader(bytes.as_slice())?, trained_artifact());
    Ok(())
}

#[test]
fn test_unknown_schema_version_is_rejected() -> Result<()> {
    let mut bytes = Vec::new();
    ModelStore::to_writer(&trained_artifact(), &mut bytes)?;
    bytes[8..12].copy_from_slice(&(SCHEMA_VERSION + 1).to_le_bytes());

    let err = ModelStore::from_reader(bytes.as_slice()).unwrap_err();
    match err {
        ClassifierError::SchemaVersion { found, expected } => {
            assert_eq!(found, SCHEMA_VERSION + 1);
            assert_eq!(expected, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn test_foreign_and_truncated_files_are_rejected() -> Result<()> {
    let err = ModelStore::from_reader(&b"PK\x03\x04 not a model"[..]).unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidFormat(_)));

    let err = ModelStore::from_reader(&MAGIC[..4]).unwrap_err();
    assert!(matches!(err, ClassifierError::InvalidFormat(_)));

    let mut bytes = Vec::new();
    ModelStore::to_writer(&trained_artifact(), &mut bytes)?;
    bytes.truncate(bytes.len() / 2);
    let err = ModelStore::from_reader(bytes.as_slice()).unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::Serialization {
            stage: Stage::Load,
            ..
        }
    ));
    Ok(())
}

#[test]
fn test_missing_file_reports_load_stage() {
    let dir = tempdir().unwrap();
    let err = ModelStore::load(dir.path().join("absent.cbor")).unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::Io {
            stage: Stage::Load,
            ..
        }
    ));
    assert!(err.to_string().starts_with("[load]"));
}
