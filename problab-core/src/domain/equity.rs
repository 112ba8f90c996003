//! EquityPoint — one sample of the simulated equity curve.

use serde::{Deserialize, Serialize};

/// `(date, equity)` pair.
///
/// The seed point of a curve built from an empty series has no date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: Option<String>,
    pub equity: f64,
}

impl EquityPoint {
    pub fn new(date: Option<String>, equity: f64) -> Self {
        Self { date, equity }
    }

    /// Date label, or an empty string for an undated seed point.
    pub fn date_label(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }
}

/// Equity values of a curve, in order.
pub fn equity_values(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.equity).collect()
}
