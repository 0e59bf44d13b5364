//! Labeled document source and train/test splitting.
//!
//! CSV input has a header row. The label and text columns are found by name,
//! case-insensitively:
//! ```csv
//! Label,Berita
//! hoax,"Semua warga wajib membayar denda 10 juta"
//! valid,"Pemerintah menyelesaikan pembangunan jalan tol"
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result, Stage};

/// One labeled text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub label: String,
    pub text: String,
}

impl Document {
    pub fn new<L: Into<String>, T: Into<String>>(label: L, text: T) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// What to do with a malformed row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// skip with a warning and count it
    #[default]
    Skip,
    /// stop at the first malformed row
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub label_column: String,
    pub text_column: String,
    pub delimiter: u8,
    pub malformed: MalformedRowPolicy,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            label_column: "Label".to_string(),
            text_column: "Berita".to_string(),
            delimiter: b',',
            malformed: MalformedRowPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub documents: Vec<Document>,
    /// rows rejected under `MalformedRowPolicy::Skip`
    pub skipped: usize,
}

pub struct CsvLoader {
    config: CsvConfig,
}

impl CsvLoader {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClassifierError::io(Stage::Load, e))?;
        let report = self.load_reader(file)?;
        tracing::info!(
            path = %path.display(),
            documents = report.documents.len(),
            skipped = report.skipped,
            "dataset loaded"
        );
        Ok(report)
    }

    /// Rows are numbered from 1 for the header, so the first data row is 2.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadReport> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.config.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    ClassifierError::input(1, format!("header has no '{}' column", name))
                })
        };
        let label_idx = find(&self.config.label_column)?;
        let text_idx = find(&self.config.text_column)?;
        let width = headers.len();

        let mut report = LoadReport::default();
        for (i, record) in reader.byte_records().enumerate() {
            let row = i + 2;
            let record = record?;
            let problem = if record.len() != width {
                Some(format!("expected {} columns, found {}", width, record.len()))
            } else {
                match (
                    Self::field(&record, label_idx, &self.config.label_column),
                    Self::field(&record, text_idx, &self.config.text_column),
                ) {
                    (Err(reason), _) | (_, Err(reason)) => Some(reason),
                    (Ok(""), _) => Some("missing label".to_string()),
                    (_, Ok("")) => Some("missing text".to_string()),
                    (Ok(label), Ok(text)) => {
                        report.documents.push(Document::new(label, text));
                        None
                    }
                }
            };

            if let Some(reason) = problem {
                match self.config.malformed {
                    MalformedRowPolicy::Fail => return Err(ClassifierError::input(row, reason)),
                    MalformedRowPolicy::Skip => {
                        tracing::warn!(row, %reason, "skipping malformed row");
                        report.skipped += 1;
                    }
                }
            }
        }
        Ok(report)
    }

    /// Trimmed UTF-8 field, or the reason it cannot be decoded
    fn field<'r>(
        record: &'r ByteRecord,
        index: usize,
        column: &str,
    ) -> std::result::Result<&'r str, String> {
        let bytes = record.get(index).unwrap_or_default();
        std::str::from_utf8(bytes)
            .map(str::trim)
            .map_err(|e| format!("invalid UTF-8 in column '{}': {}", column, e))
    }
}

/// Shuffle with a seeded ChaCha8 and cut off `round(n * test_fraction)` test documents
///
/// # Returns
/// * `(train, test)`
pub fn train_test_split(
    docs: &[Document],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<Document>, Vec<Document>)> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(ClassifierError::config(format!(
            "test_fraction must be in [0, 1), got {}",
            test_fraction
        )));
    }
    let mut order: Vec<usize> = (0..docs.len()).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    order.shuffle(&mut rng);

    let test_len = (docs.len() as f64 * test_fraction).round() as usize;
    let (test_idx, train_idx) = order.split_at(test_len);
    let pick = |idx: &[usize]| idx.iter().map(|&i| docs[i].clone()).collect::<Vec<_>>();
    Ok((pick(train_idx), pick(test_idx)))
}
