//! Versioned persistence for [`TrainedArtifact`].
//!
//! Layout:
//!
//! ```text
//! +-----------------+-------------------+----------------------+
//! | magic (8 bytes) | version (u32, LE) | CBOR TrainedArtifact |
//! +-----------------+-------------------+----------------------+
//! ```
//!
//! The header is checked before the body is touched, so a file from another schema
//! version is rejected without any partial decoding.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::artifact::TrainedArtifact;
use crate::error::{ClassifierError, Result, Stage};

pub const MAGIC: [u8; 8] = *b"NEWSCLS\0";
pub const SCHEMA_VERSION: u32 = 1;

pub struct ModelStore;

impl ModelStore {
    /// Save to `path`
    /// Written to a sibling temp file first and renamed into place.
    pub fn save<P: AsRef<Path>>(artifact: &TrainedArtifact, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp = Self::tmp_path(path);
        let file = File::create(&tmp).map_err(|e| ClassifierError::io(Stage::Save, e))?;
        let mut writer = BufWriter::new(file);
        let written = Self::to_writer(artifact, &mut writer).and_then(|_| {
            writer
                .flush()
                .map_err(|e| ClassifierError::io(Stage::Save, e))
        });
        // close the handle before rename or cleanup
        drop(writer);
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, path).map_err(|e| ClassifierError::io(Stage::Save, e))?;
        tracing::info!(path = %path.display(), "model saved");
        Ok(())
    }

    /// Load from `path` and re-validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TrainedArtifact> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClassifierError::io(Stage::Load, e))?;
        let artifact = Self::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), "model loaded");
        Ok(artifact)
    }

    pub fn to_writer<W: Write>(artifact: &TrainedArtifact, mut writer: W) -> Result<()> {
        writer
            .write_all(&MAGIC)
            .and_then(|_| writer.write_all(&SCHEMA_VERSION.to_le_bytes()))
            .map_err(|e| ClassifierError::io(Stage::Save, e))?;
        serde_cbor::to_writer(&mut writer, artifact).map_err(|source| {
            ClassifierError::Serialization {
                stage: Stage::Save,
                source,
            }
        })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<TrainedArtifact> {
        let mut magic = [0u8; 8];
        reader
            .read_exact(&mut magic)
            .map_err(|_| ClassifierError::InvalidFormat("file too short for header".into()))?;
        if magic != MAGIC {
            return Err(ClassifierError::InvalidFormat(
                "not a news-classifier model file".into(),
            ));
        }
        let mut version = [0u8; 4];
        reader
            .read_exact(&mut version)
            .map_err(|_| ClassifierError::InvalidFormat("missing schema version".into()))?;
        let version = u32::from_le_bytes(version);
        if version != SCHEMA_VERSION {
            return Err(ClassifierError::SchemaVersion {
                found: version,
                expected: SCHEMA_VERSION,
            });
        }

        let artifact: TrainedArtifact =
            serde_cbor::from_reader(reader).map_err(|source| ClassifierError::Serialization {
                stage: Stage::Load,
                source,
            })?;
        artifact
            .validate()
            .map_err(|e| ClassifierError::InvalidFormat(e.to_string()))?;
        Ok(artifact)
    }

    fn tmp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}
