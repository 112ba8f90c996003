//! Integration tests for threshold sweeps.

use problab_core::{simulate, DailyObservation, SimulationConfig, SyntheticSeries};
use problab_runner::{
    export_sweep_csv, GridError, RankingMetric, RunError, ThresholdGrid, ThresholdSweep,
};
use std::sync::atomic::{AtomicUsize, Ordering};

fn series() -> Vec<DailyObservation> {
    SyntheticSeries::new(300, 11).with_skill(0.4).generate()
}

#[test]
fn serial_and_parallel_sweeps_are_identical() {
    let base = SimulationConfig::new(0.5, true, 0.001);
    let grid = ThresholdGrid::new(0.3, 0.9, 0.01);
    let data = series();

    let serial = ThresholdSweep::new(base)
        .with_parallelism(false)
        .sweep(&data, &grid)
        .unwrap();
    let parallel = ThresholdSweep::new(base)
        .with_parallelism(true)
        .sweep(&data, &grid)
        .unwrap();

    assert_eq!(serial.len(), 61);
    assert_eq!(serial, parallel);
}

#[test]
fn entries_follow_grid_order_and_match_direct_runs() {
    let base = SimulationConfig::new(0.5, false, 0.0005);
    let grid = ThresholdGrid::default();
    let data = series();

    let results = ThresholdSweep::new(base).sweep(&data, &grid).unwrap();
    let thresholds: Vec<f64> = results.all().iter().map(|e| e.threshold).collect();
    assert_eq!(thresholds, grid.thresholds());

    for entry in results.all() {
        let direct = simulate(&data, &base.with_threshold(entry.threshold));
        assert_eq!(entry.summary, direct.summary);
    }
}

#[test]
fn trade_count_shrinks_as_long_only_threshold_rises() {
    let base = SimulationConfig::new(0.5, false, 0.001);
    let results = ThresholdSweep::new(base)
        .sweep(&series(), &ThresholdGrid::new(0.3, 0.9, 0.05))
        .unwrap();
    let counts: Vec<usize> = results.all().iter().map(|e| e.summary.trade_count).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
}

#[test]
fn best_by_picks_maximum() {
    let results = ThresholdSweep::new(SimulationConfig::default())
        .sweep(&series(), &ThresholdGrid::default())
        .unwrap();
    for metric in [
        RankingMetric::Sharpe,
        RankingMetric::TotalReturn,
        RankingMetric::WinRate,
    ] {
        let best = results.best_by(metric).unwrap();
        assert!(results
            .all()
            .iter()
            .all(|e| metric.value(&e.summary) <= metric.value(&best.summary)));
    }
}

#[test]
fn progress_callback_fires_once_per_point() {
    let calls = AtomicUsize::new(0);
    let grid = ThresholdGrid::default();
    ThresholdSweep::new(SimulationConfig::default())
        .sweep_with_progress(&series(), &grid, |_, total, _| {
            assert_eq!(total, 9);
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), grid.size());
}

#[test]
fn invalid_grid_is_an_error() {
    let err = ThresholdSweep::new(SimulationConfig::default())
        .sweep(&series(), &ThresholdGrid::new(0.5, 0.4, 0.05))
        .unwrap_err();
    assert!(matches!(err, RunError::Grid(_)));
}

#[test]
fn vanishing_step_is_an_error_before_any_simulation() {
    let calls = AtomicUsize::new(0);
    let sweep = ThresholdSweep::new(SimulationConfig::default());
    for step in [1e-300, 1e-9] {
        let err = sweep
            .sweep_with_progress(&series(), &ThresholdGrid::new(0.0, 1.0, step), |_, _, _| {
                calls.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap_err();
        assert!(matches!(err, RunError::Grid(GridError::TooManyPoints { .. })));
    }
    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
fn negative_cost_base_is_an_error() {
    let err = ThresholdSweep::new(SimulationConfig::new(0.5, false, -0.001))
        .sweep(&series(), &ThresholdGrid::default())
        .unwrap_err();
    assert!(matches!(err, RunError::Config(_)));
}

#[test]
fn empty_series_sweeps_to_zero_rows() {
    let results = ThresholdSweep::new(SimulationConfig::default())
        .sweep(&[], &ThresholdGrid::default())
        .unwrap();
    assert_eq!(results.len(), 9);
    assert!(results.all().iter().all(|e| e.summary.trade_count == 0));
}

#[test]
fn sweep_csv_has_one_row_per_threshold() {
    let results = ThresholdSweep::new(SimulationConfig::default())
        .sweep(&series(), &ThresholdGrid::default())
        .unwrap();
    let csv = export_sweep_csv(&results).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("threshold,total_return,sharpe_ratio"));
    assert!(lines[1].starts_with("0.3000,"));
    assert!(lines[9].starts_with("0.7000,"));
}
