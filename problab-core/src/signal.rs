//! Daily decision rule: long, short, or flat from a predicted probability.
//!
//! The short-entry bound mirrors the long-entry bound around the threshold
//! (`p < 1 - threshold`), not around 0.5. With `threshold > 0.5` this leaves a
//! dead zone between the two bounds; with `threshold < 0.5` the bands overlap
//! and the long test, evaluated first, wins.

use crate::config::SimulationConfig;
use serde::{Deserialize, Serialize};

/// One day's trading decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Long,
    Short,
    Flat,
}

impl Signal {
    /// `+1` long, `-1` short, `0` flat.
    pub fn direction(self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Short => -1.0,
            Signal::Flat => 0.0,
        }
    }

    pub fn is_trade(self) -> bool {
        self != Signal::Flat
    }
}

/// Apply the decision rule to a single probability.
pub fn decide(probability: f64, config: &SimulationConfig) -> Signal {
    if probability > config.threshold {
        Signal::Long
    } else if config.allow_shorting && probability < 1.0 - config.threshold {
        Signal::Short
    } else {
        Signal::Flat
    }
}
