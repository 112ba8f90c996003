//! Integration tests: file → load → run → artifacts → reload.

use std::path::Path;

use problab_core::{SimulationConfig, SyntheticSeries, STARTING_CAPITAL};
use problab_runner::{
    load_artifacts, load_observations, run_simulation, save_artifacts, LoadError, RunnerConfig,
};

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn csv_file_to_artifacts_and_back() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write(
        temp_dir.path(),
        "series.csv",
        "date,predicted_probability,market_return\n\
         2024-01-02,0.9,0.02\n\
         2024-01-03,0.9,-0.01\n",
    );

    let series = load_observations(&input).unwrap();
    let report = run_simulation(&series, &SimulationConfig::new(0.5, false, 0.0)).unwrap();
    assert!((report.result.summary.final_equity - 10_098.0).abs() < 1e-9);

    let out = temp_dir.path().join("results");
    let run_dir = save_artifacts(&report, &out).unwrap();
    assert!(run_dir.join("manifest.json").exists());
    assert!(run_dir.join("equity.csv").exists());
    assert!(run_dir.join("trades.csv").exists());

    let restored = load_artifacts(&run_dir).unwrap();
    assert_eq!(restored.run_id, report.run_id);
    assert_eq!(restored.result.summary.trade_count, 2);

    let equity = std::fs::read_to_string(run_dir.join("equity.csv")).unwrap();
    assert_eq!(equity.lines().count(), 4);
}

#[test]
fn api_response_json_file_loads() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write(
        temp_dir.path(),
        "aapl.json",
        r#"{"ticker":"AAPL","prediction":1,"backtest_data":[
            {"date":"2024-01-02","prob":0.1,"market_return":0.02}
        ]}"#,
    );

    let series = load_observations(&input).unwrap();
    let report = run_simulation(&series, &SimulationConfig::new(0.5, true, 0.0)).unwrap();
    assert!((report.result.summary.final_equity - 9_800.0).abs() < 1e-9);
    assert_eq!(report.result.summary.win_rate, 0.0);
}

#[test]
fn empty_json_array_runs_as_no_trade() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write(temp_dir.path(), "empty.json", "[]");

    let series = load_observations(&input).unwrap();
    let report = run_simulation(&series, &SimulationConfig::default()).unwrap();
    assert_eq!(report.result.equity_curve.len(), 1);
    assert_eq!(report.result.summary.final_equity, STARTING_CAPITAL);
}

#[test]
fn missing_file_is_a_read_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let err = load_observations(&temp_dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
}

#[test]
fn config_file_drives_a_run() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = write(
        temp_dir.path(),
        "problab.toml",
        "[simulation]\nthreshold = 0.55\nallow_shorting = true\ntransaction_cost = 0.0\n",
    );
    let config = RunnerConfig::from_file(&config_path).unwrap();

    let series = SyntheticSeries::new(100, 5).with_skill(1.0).generate();
    let report = run_simulation(&series, &config.simulation).unwrap();

    // Perfect foresight with no cost: every trade with a non-zero return wins.
    assert_eq!(report.result.summary.trade_count, 100);
    assert!(report.result.summary.total_return > 0.0);
    assert_eq!(report.result.summary.max_drawdown, 0.0);
}
