//! ProbLab Core — replays predicted up-probabilities against realized returns.
//!
//! This crate is pure: no I/O, no logging, no state between calls.
//! - Domain types (observations, equity points, trade records)
//! - The mirrored-threshold decision rule
//! - The simulator producing an equity curve and trade log
//! - Summary statistics (total return, win rate, Sharpe, max drawdown)
//! - Input fingerprinting for caller-side memoization
//! - Seeded synthetic series

pub mod config;
pub mod domain;
pub mod fingerprint;
pub mod metrics;
pub mod signal;
pub mod simulator;
pub mod synthetic;

pub use config::{
    ConfigError, SimulationConfig, DEFAULT_TRANSACTION_COST, STARTING_CAPITAL,
    TRADING_DAYS_PER_YEAR, USABLE_THRESHOLD_RANGE,
};
pub use domain::{equity_values, DailyObservation, EquityPoint, TradeRecord};
pub use fingerprint::{fingerprint, RunId};
pub use metrics::SummaryStatistics;
pub use signal::{decide, Signal};
pub use simulator::{simulate, SimulationResult};
pub use synthetic::SyntheticSeries;
