//! DailyObservation — one historical trading day as supplied by the prediction source.

use serde::{Deserialize, Serialize};

/// One trading day: the model's up-probability and the return that actually happened.
///
/// `date` is a label only. Series order is the input order; nothing in the
/// simulator sorts, deduplicates or parses dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: String,
    /// Probability in `[0, 1]` that the market closes up on `date`.
    #[serde(alias = "prob")]
    pub predicted_probability: f64,
    /// Realized fractional return for `date` (`0.012` = +1.2%).
    pub market_return: f64,
}

impl DailyObservation {
    pub fn new(date: impl Into<String>, predicted_probability: f64, market_return: f64) -> Self {
        Self {
            date: date.into(),
            predicted_probability,
            market_return,
        }
    }
}
