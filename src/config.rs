use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::CsvConfig;
use crate::error::{ClassifierError, Result, Stage};
use crate::trainer::TrainerConfig;

/// End-to-end configuration
/// Every field has a default, so a JSON file only needs the values it changes:
/// ```json
/// { "test_fraction": 0.25, "trainer": { "max_epochs": 500 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// share of documents held out for evaluation
    pub test_fraction: f64,
    /// seed for the train/test split
    pub seed: u64,
    pub csv: CsvConfig,
    pub trainer: TrainerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            csv: CsvConfig::default(),
            trainer: TrainerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| ClassifierError::io(Stage::Config, e))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(ClassifierError::config(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        self.trainer.validate()
    }
}
