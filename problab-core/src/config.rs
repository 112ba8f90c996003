//! Simulation parameters and the constants the simulator is built around.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Notional capital every run starts from.
pub const STARTING_CAPITAL: f64 = 10_000.0;

/// Annualization factor for the Sharpe ratio.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Threshold band offered by the dashboard slider. Advisory only: the
/// simulator accepts any threshold in `[0, 1]`.
pub const USABLE_THRESHOLD_RANGE: RangeInclusive<f64> = 0.30..=0.90;

/// Per-trade cost used when none is supplied (0.1%).
pub const DEFAULT_TRANSACTION_COST: f64 = 0.001;

/// Invalid simulation parameters, rejected before a run starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),
    #[error("transaction cost must be non-negative, got {0}")]
    NegativeTransactionCost(f64),
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
}

/// User-chosen decision-rule parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Go long when the predicted probability is strictly above this value.
    pub threshold: f64,
    /// Go short when the probability is strictly below `1 - threshold`.
    pub allow_shorting: bool,
    /// Flat fraction subtracted from the gross return of every trade.
    pub transaction_cost: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            allow_shorting: false,
            transaction_cost: DEFAULT_TRANSACTION_COST,
        }
    }
}

impl SimulationConfig {
    pub fn new(threshold: f64, allow_shorting: bool, transaction_cost: f64) -> Self {
        Self {
            threshold,
            allow_shorting,
            transaction_cost,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_shorting(mut self, allow_shorting: bool) -> Self {
        self.allow_shorting = allow_shorting;
        self
    }

    pub fn with_transaction_cost(mut self, transaction_cost: f64) -> Self {
        self.transaction_cost = transaction_cost;
        self
    }

    /// Boundary check for callers. `simulate` itself never calls this.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::NonFinite { field: "threshold" });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        if !self.transaction_cost.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "transaction_cost",
            });
        }
        if self.transaction_cost < 0.0 {
            return Err(ConfigError::NegativeTransactionCost(self.transaction_cost));
        }
        Ok(())
    }

    /// Whether the threshold sits inside the dashboard's slider band.
    pub fn within_usable_range(&self) -> bool {
        USABLE_THRESHOLD_RANGE.contains(&self.threshold)
    }
}
