//! TOML run configuration.
//!
//! ```toml
//! [simulation]
//! threshold = 0.55
//! allow_shorting = true
//! transaction_cost = 0.001
//!
//! [sweep]
//! start = 0.30
//! end = 0.70
//! step = 0.05
//! rank_by = "sharpe"
//! ```
//!
//! Every key is optional; missing keys take the dashboard defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use problab_core::SimulationConfig;

use crate::sweep::{GridError, RankingMetric, ThresholdGrid};

/// Errors from loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid simulation parameters: {0}")]
    Simulation(#[from] problab_core::ConfigError),
    #[error("invalid sweep grid: {0}")]
    Grid(#[from] GridError),
}

/// Sweep section: the grid plus the statistic used to rank it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    #[serde(flatten)]
    pub grid: ThresholdGrid,
    pub rank_by: RankingMetric,
}

/// Top-level file layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub simulation: SimulationConfig,
    pub sweep: SweepConfig,
}

impl RunnerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.sweep.grid.validate()?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
