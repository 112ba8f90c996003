//! Threshold sweep — evaluate one series under a grid of thresholds.
//!
//! Every grid point is an independent simulation, so the sweep fans out over
//! rayon with no coordination. Results always come back in grid order.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use problab_core::{
    fingerprint, simulate, DailyObservation, RunId, SimulationConfig, SummaryStatistics,
};

use crate::runner::RunError;

/// Invalid sweep grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid bounds must be finite")]
    NonFinite,
    #[error("grid step must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("grid start {start} is above end {end}")]
    Inverted { start: f64, end: f64 },
    #[error("grid bounds must lie within [0, 1], got [{start}, {end}]")]
    OutOfRange { start: f64, end: f64 },
    #[error("grid has {count} points, more than the limit of {max}")]
    TooManyPoints { count: u64, max: usize },
}

/// Upper bound on the number of thresholds a single sweep may evaluate.
pub const MAX_GRID_POINTS: usize = 10_000;

/// Evenly spaced thresholds from `start` to `end`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdGrid {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for ThresholdGrid {
    fn default() -> Self {
        Self {
            start: 0.30,
            end: 0.70,
            step: 0.05,
        }
    }
}

impl ThresholdGrid {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if !self.start.is_finite() || !self.end.is_finite() || !self.step.is_finite() {
            return Err(GridError::NonFinite);
        }
        if self.step <= 0.0 {
            return Err(GridError::NonPositiveStep(self.step));
        }
        if self.start > self.end {
            return Err(GridError::Inverted {
                start: self.start,
                end: self.end,
            });
        }
        if self.start < 0.0 || self.end > 1.0 {
            return Err(GridError::OutOfRange {
                start: self.start,
                end: self.end,
            });
        }
        let count = self.point_count();
        if count > MAX_GRID_POINTS as u64 {
            return Err(GridError::TooManyPoints {
                count,
                max: MAX_GRID_POINTS,
            });
        }
        Ok(())
    }

    /// Number of grid points, saturating for degenerate steps.
    fn point_count(&self) -> u64 {
        let intervals = ((self.end - self.start) / self.step + 1e-9).floor();
        (intervals as u64).saturating_add(1)
    }

    /// Grid points, computed as `start + i * step`, rounded to 10 decimals and
    /// clamped to the bounds so float error never pushes a point past `end`.
    pub fn thresholds(&self) -> Vec<f64> {
        if self.validate().is_err() {
            return Vec::new();
        }
        (0..self.point_count())
            .map(|i| {
                let t = ((self.start + i as f64 * self.step) * 1e10).round() / 1e10;
                t.clamp(self.start, self.end)
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.thresholds().len()
    }
}

/// Statistic used to pick the best threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    #[default]
    Sharpe,
    #[serde(alias = "return", alias = "profit")]
    TotalReturn,
    #[serde(alias = "winrate")]
    WinRate,
}

impl RankingMetric {
    pub fn value(self, summary: &SummaryStatistics) -> f64 {
        match self {
            RankingMetric::Sharpe => summary.sharpe_ratio,
            RankingMetric::TotalReturn => summary.total_return,
            RankingMetric::WinRate => summary.win_rate,
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankingMetric::Sharpe => "sharpe",
            RankingMetric::TotalReturn => "total_return",
            RankingMetric::WinRate => "win_rate",
        };
        f.write_str(name)
    }
}

impl FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sharpe" => Ok(RankingMetric::Sharpe),
            "total_return" | "return" | "profit" => Ok(RankingMetric::TotalReturn),
            "win_rate" | "winrate" => Ok(RankingMetric::WinRate),
            other => Err(format!(
                "unknown ranking metric '{other}'. Valid: sharpe, total_return, win_rate"
            )),
        }
    }
}

/// Outcome of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub threshold: f64,
    pub run_id: RunId,
    pub summary: SummaryStatistics,
}

/// Sweep executor over a fixed base configuration.
///
/// The base config's `allow_shorting` and `transaction_cost` apply to every
/// grid point; its threshold is replaced.
#[derive(Debug, Clone)]
pub struct ThresholdSweep {
    base: SimulationConfig,
    parallel: bool,
}

impl ThresholdSweep {
    pub fn new(base: SimulationConfig) -> Self {
        Self {
            base,
            parallel: true,
        }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn sweep(
        &self,
        series: &[DailyObservation],
        grid: &ThresholdGrid,
    ) -> Result<SweepResults, RunError> {
        self.sweep_with_progress(series, grid, |_, _, _| {})
    }

    /// Executes a sweep, invoking the callback after each grid point with
    /// the point's index, the grid size and its entry.
    pub fn sweep_with_progress<F>(
        &self,
        series: &[DailyObservation],
        grid: &ThresholdGrid,
        progress_callback: F,
    ) -> Result<SweepResults, RunError>
    where
        F: Fn(usize, usize, &SweepEntry) + Send + Sync,
    {
        grid.validate()?;
        let thresholds = grid.thresholds();
        let configs: Vec<SimulationConfig> = thresholds
            .iter()
            .map(|&t| self.base.with_threshold(t))
            .collect();
        for config in &configs {
            config.validate()?;
        }

        let total = configs.len();
        info!(
            points = total,
            observations = series.len(),
            parallel = self.parallel,
            "starting threshold sweep"
        );

        let evaluate = |(idx, config): (usize, &SimulationConfig)| {
            let result = simulate(series, config);
            let entry = SweepEntry {
                threshold: config.threshold,
                run_id: fingerprint(series, config),
                summary: result.summary,
            };
            debug!(
                threshold = entry.threshold,
                sharpe = entry.summary.sharpe_ratio,
                trades = entry.summary.trade_count,
                "grid point done"
            );
            progress_callback(idx, total, &entry);
            entry
        };

        let entries: Vec<SweepEntry> = if self.parallel {
            configs.par_iter().enumerate().map(evaluate).collect()
        } else {
            configs.iter().enumerate().map(evaluate).collect()
        };

        Ok(SweepResults { entries })
    }
}

/// Results from a threshold sweep, in grid order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    entries: Vec<SweepEntry>,
}

impl SweepResults {
    pub fn all(&self) -> &[SweepEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-ranked entry. Ties go to the lowest threshold.
    pub fn best_by(&self, metric: RankingMetric) -> Option<&SweepEntry> {
        let mut best: Option<&SweepEntry> = None;
        for entry in &self.entries {
            match best {
                Some(current) if metric.value(&entry.summary) <= metric.value(&current.summary) => {}
                _ => best = Some(entry),
            }
        }
        best
    }

    /// Entries ordered best first; equal values keep grid order.
    pub fn sorted_by(&self, metric: RankingMetric) -> Vec<&SweepEntry> {
        let mut sorted: Vec<&SweepEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            metric
                .value(&b.summary)
                .partial_cmp(&metric.value(&a.summary))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }
}
