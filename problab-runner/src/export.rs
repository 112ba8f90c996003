//! Reporting and export — JSON and CSV artifacts for runs and sweeps.
//!
//! - **JSON**: full round-trip serialization of a `RunReport` with schema versioning
//! - **CSV**: equity curve, trade log and sweep table for external tools
//!
//! The simulator never persists anything; these functions are for callers
//! that explicitly ask for files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use problab_core::{DailyObservation, EquityPoint, TradeRecord};

use crate::runner::{RunReport, SCHEMA_VERSION};
use crate::sweep::SweepResults;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `RunReport` to pretty JSON.
pub fn export_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize RunReport to JSON")
}

/// Deserialize a `RunReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RunReport> {
    let report: RunReport =
        serde_json::from_str(json).context("failed to deserialize RunReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Equity curve as `date,equity`. The undated seed of an empty run has an empty date.
pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "equity"])?;
    for point in equity_curve {
        wtr.write_record([point.date_label(), &format!("{:.4}", point.equity)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Trade log with one row per executed trade.
///
/// Columns: index, date, signal, gross_return, net_return, equity_after, cost
pub fn export_trades_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "index",
        "date",
        "signal",
        "gross_return",
        "net_return",
        "equity_after",
        "cost",
    ])?;
    for t in trades {
        wtr.write_record([
            &t.index.to_string(),
            &t.date,
            &format!("{:?}", t.signal),
            &format!("{:.6}", t.gross_return),
            &format!("{:.6}", t.net_return),
            &format!("{:.4}", t.equity_after),
            &format!("{:.6}", t.cost()),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Sweep table, one row per threshold, in grid order.
pub fn export_sweep_csv(results: &SweepResults) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "threshold",
        "total_return",
        "sharpe_ratio",
        "trade_count",
        "win_rate",
        "max_drawdown",
        "final_equity",
    ])?;
    for entry in results.all() {
        let s = &entry.summary;
        wtr.write_record([
            &format!("{:.4}", entry.threshold),
            &format!("{:.6}", s.total_return),
            &format!("{:.4}", s.sharpe_ratio),
            &s.trade_count.to_string(),
            &format!("{:.4}", s.win_rate),
            &format!("{:.6}", s.max_drawdown),
            &format!("{:.2}", s.final_equity),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Observation series in the loader's CSV layout.
pub fn export_series_csv(series: &[DailyObservation]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "predicted_probability", "market_return"])?;
    for obs in series {
        wtr.write_record([
            obs.date.as_str(),
            &format!("{:.6}", obs.predicted_probability),
            &format!("{:.6}", obs.market_return),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single run.
///
/// Creates a directory named `run_{short_id}_{timestamp}/` under `output_dir`,
/// with a `_{n}` suffix when a run with the same id landed in the same
/// millisecond. It contains:
/// - `manifest.json` — the full `RunReport`
/// - `equity.csv` — the equity curve
/// - `trades.csv` — the trade log
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &RunReport, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;
    let base = format!(
        "run_{}_{}",
        report.run_id.short(),
        chrono::Local::now().format("%Y%m%d_%H%M%S_%3f")
    );
    let run_dir = create_unique_dir(output_dir, &base)?;

    let json = export_json(report)?;
    write_artifact(&run_dir.join("manifest.json"), &json)?;

    let equity_csv = export_equity_csv(&report.result.equity_curve)?;
    write_artifact(&run_dir.join("equity.csv"), &equity_csv)?;

    let trades_csv = export_trades_csv(&report.result.trades)?;
    write_artifact(&run_dir.join("trades.csv"), &trades_csv)?;

    Ok(run_dir)
}

/// Create `parent/base`, or the first free `parent/base_{n}`.
fn create_unique_dir(parent: &Path, base: &str) -> Result<PathBuf> {
    let mut suffix = 0u32;
    loop {
        let name = if suffix == 0 {
            base.to_string()
        } else {
            format!("{base}_{suffix}")
        };
        let dir = parent.join(name);
        match std::fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => suffix += 1,
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to create artifact dir: {}", dir.display())
                })
            }
        }
    }
}

fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a `RunReport` from an artifact directory's manifest.json.
pub fn load_artifacts(run_dir: &Path) -> Result<RunReport> {
    let path = run_dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
