use std::fs;
use std::path::{Path,PathBuf};
use serde::{Serialize, Deserialize};

use crate::{BenchError,Result};
use crate::algorithms::{AlgorithmConfig,AlgorithmKind};

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct BenchmarkConfig {
    pub parts_dir: PathBuf,
    pub originals_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_include_part")]
    pub include_part: bool,
    /// JSON file with the true part locations
    #[serde(default)]
    pub annotations: Option<PathBuf>,
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<AlgorithmConfig>
}

fn default_iterations() -> usize { 10 }
fn default_include_part() -> bool { true }
fn default_algorithms() -> Vec<AlgorithmConfig> {
    AlgorithmKind::ALL.iter().map(|k| k.default_config()).collect()
}

impl BenchmarkConfig {
    pub fn load(path: &Path) -> Result<BenchmarkConfig> {
        let config: BenchmarkConfig = serde_yaml::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BenchError::Config("iterations must be at least 1".to_string()));
        }
        if self.algorithms.is_empty() {
            return Err(BenchError::Config("no algorithms configured".to_string()));
        }
        self.algorithms.iter().try_for_each(|a| a.validate())
    }
}
