//! Run fingerprinting — a deterministic identity for `(series, config)`.
//!
//! The simulator keeps no cache. Callers that want to memoize results key
//! them by [`RunId`]: equal inputs, bit for bit, always produce the same id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SimulationConfig;
use crate::domain::DailyObservation;

/// BLAKE3 hex digest of a run's full input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// First 12 hex characters, for log lines and directory names.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash every input value by its exact bit pattern.
///
/// Dates are length-prefixed so that `["ab", "c"]` and `["a", "bc"]` differ.
pub fn fingerprint(series: &[DailyObservation], config: &SimulationConfig) -> RunId {
    let mut hasher = blake3::Hasher::new();

    hasher.update(&config.threshold.to_bits().to_le_bytes());
    hasher.update(&[u8::from(config.allow_shorting)]);
    hasher.update(&config.transaction_cost.to_bits().to_le_bytes());

    hasher.update(&(series.len() as u64).to_le_bytes());
    for obs in series {
        hasher.update(&(obs.date.len() as u64).to_le_bytes());
        hasher.update(obs.date.as_bytes());
        hasher.update(&obs.predicted_probability.to_bits().to_le_bytes());
        hasher.update(&obs.market_return.to_bits().to_le_bytes());
    }

    RunId(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Vec<DailyObservation> {
        vec![
            DailyObservation::new("2024-01-02", 0.7, 0.01),
            DailyObservation::new("2024-01-03", 0.3, -0.02),
        ]
    }

    #[test]
    fn same_inputs_same_id() {
        let config = SimulationConfig::default();
        assert_eq!(fingerprint(&series(), &config), fingerprint(&series(), &config));
    }

    #[test]
    fn config_changes_change_id() {
        let base = SimulationConfig::default();
        let a = fingerprint(&series(), &base);
        assert_ne!(a, fingerprint(&series(), &base.with_threshold(0.55)));
        assert_ne!(a, fingerprint(&series(), &base.with_shorting(true)));
        assert_ne!(a, fingerprint(&series(), &base.with_transaction_cost(0.0)));
    }

    #[test]
    fn series_changes_change_id() {
        let config = SimulationConfig::default();
        let a = fingerprint(&series(), &config);

        let mut reordered = series();
        reordered.reverse();
        assert_ne!(a, fingerprint(&reordered, &config));

        let mut tweaked = series();
        tweaked[1].market_return = -0.0200001;
        assert_ne!(a, fingerprint(&tweaked, &config));
    }

    #[test]
    fn date_boundaries_are_unambiguous() {
        let config = SimulationConfig::default();
        let a = vec![
            DailyObservation::new("ab", 0.5, 0.0),
            DailyObservation::new("c", 0.5, 0.0),
        ];
        let b = vec![
            DailyObservation::new("a", 0.5, 0.0),
            DailyObservation::new("bc", 0.5, 0.0),
        ];
        assert_ne!(fingerprint(&a, &config), fingerprint(&b, &config));
    }

    #[test]
    fn short_form_is_prefix() {
        let id = fingerprint(&series(), &SimulationConfig::default());
        assert_eq!(id.0.len(), 64);
        assert!(id.0.starts_with(id.short()));
        assert_eq!(id.short().len(), 12);
    }
}
