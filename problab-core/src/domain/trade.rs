//! TradeRecord — one executed day-trade in the per-trade return log.

use crate::signal::Signal;
use serde::{Deserialize, Serialize};

/// A single trade: opened and closed within one observation.
///
/// Flat days never produce a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Position of the observation in the input series.
    pub index: usize,
    pub date: String,
    pub signal: Signal,
    /// `direction * market_return`.
    pub gross_return: f64,
    /// `gross_return - transaction_cost`.
    pub net_return: f64,
    /// Equity after this trade was applied.
    pub equity_after: f64,
}

impl TradeRecord {
    /// Exactly zero net return counts as a loss.
    pub fn is_winner(&self) -> bool {
        self.net_return > 0.0
    }

    /// Cost deducted from the gross return.
    pub fn cost(&self) -> f64 {
        self.gross_return - self.net_return
    }
}
