//! Run orchestration — validates parameters at the boundary, then simulates.
//!
//! The core simulator never fails and never validates. This layer is where
//! invalid configuration is rejected and where each run is logged and
//! fingerprinted.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use problab_core::{
    fingerprint, simulate, ConfigError, DailyObservation, RunId, SimulationConfig,
    SimulationResult, USABLE_THRESHOLD_RANGE,
};

use crate::sweep::GridError;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("sweep grid error: {0}")]
    Grid(#[from] GridError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete record of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub config: SimulationConfig,
    pub observation_count: usize,
    pub result: SimulationResult,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Validate `config`, then simulate `series` under it.
pub fn run_simulation(
    series: &[DailyObservation],
    config: &SimulationConfig,
) -> Result<RunReport, RunError> {
    config.validate()?;
    if !config.within_usable_range() {
        warn!(
            threshold = config.threshold,
            low = *USABLE_THRESHOLD_RANGE.start(),
            high = *USABLE_THRESHOLD_RANGE.end(),
            "threshold outside the usable band; running anyway"
        );
    }

    let run_id = fingerprint(series, config);
    debug!(run_id = %run_id.short(), observations = series.len(), "simulating");

    let result = simulate(series, config);
    let s = &result.summary;
    info!(
        run_id = %run_id.short(),
        threshold = config.threshold,
        allow_shorting = config.allow_shorting,
        transaction_cost = config.transaction_cost,
        trades = s.trade_count,
        total_return = s.total_return,
        sharpe = s.sharpe_ratio,
        max_drawdown = s.max_drawdown,
        "run complete"
    );

    Ok(RunReport {
        schema_version: SCHEMA_VERSION,
        run_id,
        config: *config,
        observation_count: series.len(),
        result,
    })
}
