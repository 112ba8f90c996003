//! ProbLab Runner — run orchestration on top of the pure simulator.
//!
//! This crate builds on `problab-core` to provide:
//! - TOML run configuration with boundary validation
//! - Observation loading from CSV and JSON (including the prediction API format)
//! - Validated, logged, fingerprinted single runs
//! - Parallel threshold sweeps with ranking
//! - JSON / CSV export and artifact bundles

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod sweep;

pub use config::{ConfigError, RunnerConfig, SweepConfig};
pub use data_loader::{load_observations, parse_csv, parse_json, LoadError};
pub use export::{
    export_equity_csv, export_json, export_series_csv, export_sweep_csv, export_trades_csv,
    import_json, load_artifacts, save_artifacts,
};
pub use runner::{run_simulation, RunError, RunReport, SCHEMA_VERSION};
pub use sweep::{
    GridError, RankingMetric, SweepEntry, SweepResults, ThresholdGrid, ThresholdSweep,
    MAX_GRID_POINTS,
};
