//! Summary statistics — pure functions over the equity curve and trade log.
//!
//! Every statistic is recomputed from the finished trace of a run. None of
//! them can produce NaN or infinity from a degenerate trace: empty logs and
//! zero variance map to `0.0`.

use serde::{Deserialize, Serialize};

use crate::config::TRADING_DAYS_PER_YEAR;
use crate::domain::{EquityPoint, TradeRecord};

/// Headline figures for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub final_equity: f64,
    pub total_return: f64,
    pub trade_count: usize,
    pub win_rate: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

impl SummaryStatistics {
    /// Compute all statistics from a finished run.
    pub fn compute(
        equity_curve: &[EquityPoint],
        trades: &[TradeRecord],
        starting_capital: f64,
    ) -> Self {
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(starting_capital);
        let net_returns: Vec<f64> = trades.iter().map(|t| t.net_return).collect();

        Self {
            final_equity,
            total_return: total_return(final_equity, starting_capital),
            trade_count: trades.len(),
            win_rate: win_rate(trades),
            sharpe_ratio: sharpe_ratio(&net_returns),
            max_drawdown: max_drawdown(equity_curve, starting_capital),
        }
    }
}

// ─── Individual statistics ──────────────────────────────────────────

/// `(final - start) / start`.
pub fn total_return(final_equity: f64, starting_capital: f64) -> f64 {
    if starting_capital == 0.0 {
        return 0.0;
    }
    (final_equity - starting_capital) / starting_capital
}

/// Fraction of trades with a strictly positive net return; 0.0 with no trades.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades.iter().filter(|t| t.is_winner()).count();
    wins as f64 / trades.len() as f64
}

/// Annualized Sharpe ratio of per-trade net returns.
///
/// `mean / population_std * sqrt(252)`. Returns 0.0 for an empty log, for a
/// constant log, or when the standard deviation is exactly zero.
pub fn sharpe_ratio(returns: &[f64]) -> f64 {
    let Some(first) = returns.first() else {
        return 0.0;
    };
    // The summed mean of a constant log is inexact, leaving a residual std
    // near 1e-19 that would blow the ratio up.
    if returns.iter().all(|r| r.to_bits() == first.to_bits()) {
        return 0.0;
    }
    let std = population_std_dev(returns);
    if std == 0.0 {
        return 0.0;
    }
    (mean(returns) / std) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest fractional decline from the running peak, as a non-negative number.
///
/// The peak starts at `starting_capital` and the pass covers the whole curve,
/// seed point included.
pub fn max_drawdown(equity_curve: &[EquityPoint], starting_capital: f64) -> f64 {
    let mut running_max = starting_capital;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > running_max {
            running_max = point.equity;
        }
        if running_max > 0.0 {
            let dd = (running_max - point.equity) / running_max;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

// ─── Helpers ────────────────────────────────────────────────────────

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation dividing by `n`, not `n - 1`.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
