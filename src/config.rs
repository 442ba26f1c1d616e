use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ant::DEFAULT_MAX_STEPS;
use crate::error::ConfigError;

/// Parameters of one colony run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    pub ants_per_generation: usize,
    pub generations: usize,
    /// Deposit normalisation: each route adds `q / length` per cell.
    pub q: f64,
    /// Fraction of pheromone kept after each generation.
    pub evaporation: f64,
    pub max_steps: usize,
    pub seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            ants_per_generation: 20,
            generations: 10,
            q: 1000.0,
            evaporation: 0.5,
            max_steps: DEFAULT_MAX_STEPS,
            seed: None,
        }
    }
}

impl ColonyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.q.is_finite() || self.q <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "q",
                reason: format!("must be a positive number, got {}", self.q),
            });
        }
        if !(0.0..=1.0).contains(&self.evaporation) {
            return Err(ConfigError::Invalid {
                field: "evaporation",
                reason: format!("must lie in [0, 1], got {}", self.evaporation),
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "max_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Where the CLI writes its results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub route_file: Option<PathBuf>,
    pub snapshot_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    /// Pixels per maze cell in snapshots.
    pub cell_size: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            route_file: None,
            snapshot_file: None,
            report_file: None,
            cell_size: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub colony: ColonyConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.colony.validate()?;
        Ok(config)
    }
}
