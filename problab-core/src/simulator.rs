//! Backtest simulator — replays a probability series under one decision rule.
//!
//! `simulate` is total: every input, including an empty series, degenerate
//! returns or a cost larger than any return, yields a well-formed result.
//! Configuration is not validated here; see [`SimulationConfig::validate`].

use serde::{Deserialize, Serialize};

use crate::config::{SimulationConfig, STARTING_CAPITAL};
use crate::domain::{DailyObservation, EquityPoint, TradeRecord};
use crate::metrics::SummaryStatistics;
use crate::signal::{decide, Signal};

/// Everything a single run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Seed point followed by one point per observation.
    pub equity_curve: Vec<EquityPoint>,
    /// Per-trade return log, in execution order.
    pub trades: Vec<TradeRecord>,
    pub summary: SummaryStatistics,
}

/// Run the decision rule over `series` in input order.
///
/// Each observation is an independent one-day position: it opens and closes
/// on the same day, so there is never any carry-over between days.
pub fn simulate(series: &[DailyObservation], config: &SimulationConfig) -> SimulationResult {
    let mut equity = STARTING_CAPITAL;
    let mut equity_curve = Vec::with_capacity(series.len() + 1);
    let mut trades = Vec::new();

    equity_curve.push(EquityPoint::new(
        series.first().map(|obs| obs.date.clone()),
        equity,
    ));

    for (index, obs) in series.iter().enumerate() {
        let signal = decide(obs.predicted_probability, config);

        if signal != Signal::Flat {
            let gross_return = signal.direction() * obs.market_return;
            let net_return = gross_return - config.transaction_cost;
            equity *= 1.0 + net_return;

            trades.push(TradeRecord {
                index,
                date: obs.date.clone(),
                signal,
                gross_return,
                net_return,
                equity_after: equity,
            });
        }

        equity_curve.push(EquityPoint::new(Some(obs.date.clone()), equity));
    }

    let summary = SummaryStatistics::compute(&equity_curve, &trades, STARTING_CAPITAL);

    SimulationResult {
        equity_curve,
        trades,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, p: f64, r: f64) -> DailyObservation {
        DailyObservation::new(date, p, r)
    }

    #[test]
    fn flat_day_carries_equity_without_cost() {
        let series = vec![obs("d1", 0.5, 0.05)];
        let config = SimulationConfig::new(0.6, true, 0.01);
        let result = simulate(&series, &config);
        assert_eq!(result.equity_curve.len(), 2);
        assert_eq!(result.equity_curve[1].equity, STARTING_CAPITAL);
        assert!(result.trades.is_empty());
    }

    #[test]
    fn cost_is_subtracted_not_multiplied() {
        let series = vec![obs("d1", 0.9, 0.01)];
        let config = SimulationConfig::new(0.5, false, 0.002);
        let result = simulate(&series, &config);
        let expected = STARTING_CAPITAL * (1.0 + (0.01 - 0.002));
        assert!((result.summary.final_equity - expected).abs() < 1e-9);
        assert!((result.trades[0].net_return - 0.008).abs() < 1e-12);
    }

    #[test]
    fn cost_can_turn_a_gain_into_a_loss() {
        let series = vec![obs("d1", 0.9, 0.0005)];
        let config = SimulationConfig::new(0.5, false, 0.001);
        let result = simulate(&series, &config);
        assert!(result.trades[0].gross_return > 0.0);
        assert!(!result.trades[0].is_winner());
        assert_eq!(result.summary.win_rate, 0.0);
        assert!(result.summary.total_return < 0.0);
    }

    #[test]
    fn seed_point_takes_first_date() {
        let series = vec![obs("2024-01-02", 0.9, 0.01), obs("2024-01-03", 0.9, 0.01)];
        let result = simulate(&series, &SimulationConfig::default());
        assert_eq!(result.equity_curve[0].date.as_deref(), Some("2024-01-02"));
        assert_eq!(result.equity_curve[0].equity, STARTING_CAPITAL);
        assert_eq!(result.equity_curve[1].date.as_deref(), Some("2024-01-02"));
        assert_eq!(result.equity_curve[2].date.as_deref(), Some("2024-01-03"));
    }

    #[test]
    fn empty_series_yields_undated_seed() {
        let result = simulate(&[], &SimulationConfig::default());
        assert_eq!(result.equity_curve, vec![EquityPoint::new(None, STARTING_CAPITAL)]);
        assert_eq!(result.summary.trade_count, 0);
        assert_eq!(result.summary.total_return, 0.0);
    }

    #[test]
    fn trade_records_point_back_to_observations() {
        let series = vec![
            obs("d1", 0.9, 0.01),
            obs("d2", 0.5, 0.01),
            obs("d3", 0.1, -0.02),
        ];
        let config = SimulationConfig::new(0.6, true, 0.0);
        let result = simulate(&series, &config);
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].index, 0);
        assert_eq!(result.trades[0].signal, Signal::Long);
        assert_eq!(result.trades[1].index, 2);
        assert_eq!(result.trades[1].signal, Signal::Short);
        assert!((result.trades[1].gross_return - 0.02).abs() < 1e-12);
        assert_eq!(
            result.trades[1].equity_after,
            result.equity_curve[3].equity
        );
    }

    #[test]
    fn duplicate_dates_are_kept_in_order() {
        let series = vec![obs("d1", 0.9, 0.01), obs("d1", 0.9, -0.01)];
        let result = simulate(&series, &SimulationConfig::new(0.5, false, 0.0));
        assert_eq!(result.equity_curve.len(), 3);
        assert_eq!(result.trades.len(), 2);
    }
}
