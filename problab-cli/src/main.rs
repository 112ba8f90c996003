//! ProbLab CLI — run, sweep and synth commands.
//!
//! Commands:
//! - `run` — simulate one decision rule over a prediction series and save artifacts
//! - `sweep` — evaluate a grid of thresholds and report the best one
//! - `synth` — write a reproducible synthetic prediction series as CSV
//! - `config` — print the effective configuration as TOML

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use problab_core::{SummaryStatistics, SyntheticSeries};
use problab_runner::{
    export_series_csv, export_sweep_csv, load_observations, run_simulation, save_artifacts,
    RankingMetric, RunReport, RunnerConfig, SweepResults, ThresholdGrid, ThresholdSweep,
};

#[derive(Parser)]
#[command(
    name = "problab",
    version,
    about = "ProbLab CLI — backtest predicted up-probabilities against realized returns"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Decision-rule flags shared by `run` and `sweep`. Flags override the config file.
#[derive(clap::Args)]
struct RuleArgs {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Allow short positions.
    #[arg(long, default_value_t = false, conflicts_with = "no_shorts")]
    shorts: bool,

    /// Disallow short positions, even if the config file enables them.
    #[arg(long, default_value_t = false)]
    no_shorts: bool,

    /// Flat per-trade cost as a fraction (0.001 = 0.1%).
    #[arg(long)]
    cost: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one threshold over a series (CSV or JSON).
    Run {
        /// Input series (.csv or .json).
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        rule: RuleArgs,

        /// Long-entry threshold in [0, 1].
        #[arg(long)]
        threshold: Option<f64>,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print the summary only; write no artifacts.
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Evaluate a grid of thresholds and rank them.
    Sweep {
        /// Input series (.csv or .json).
        #[arg(long)]
        input: PathBuf,

        #[command(flatten)]
        rule: RuleArgs,

        /// First threshold of the grid.
        #[arg(long)]
        start: Option<f64>,

        /// Last threshold of the grid (inclusive).
        #[arg(long)]
        end: Option<f64>,

        /// Grid spacing.
        #[arg(long)]
        step: Option<f64>,

        /// Ranking statistic: sharpe, total_return, win_rate.
        #[arg(long)]
        rank_by: Option<RankingMetric>,

        /// Run grid points sequentially.
        #[arg(long, default_value_t = false)]
        serial: bool,

        /// Write the sweep table to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a synthetic prediction series as CSV.
    Synth {
        /// Number of trading days.
        #[arg(long, default_value_t = 252)]
        days: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Predictive skill in [0, 1].
        #[arg(long, default_value_t = 0.3)]
        skill: f64,

        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,
    },
    /// Print the configuration a run would use, after applying flags.
    Config {
        #[command(flatten)]
        rule: RuleArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("problab=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            rule,
            threshold,
            output_dir,
            no_save,
        } => run_cmd(&input, rule, threshold, &output_dir, no_save),
        Commands::Sweep {
            input,
            rule,
            start,
            end,
            step,
            rank_by,
            serial,
            output,
        } => sweep_cmd(
            &input,
            rule,
            GridOverrides { start, end, step },
            rank_by,
            serial,
            output.as_deref(),
        ),
        Commands::Synth {
            days,
            seed,
            skill,
            output,
        } => synth_cmd(days, seed, skill, &output),
        Commands::Config { rule } => {
            print!("{}", effective_config_toml(&rule)?);
            Ok(())
        }
    }
}

fn load_config(rule: &RuleArgs) -> Result<RunnerConfig> {
    let mut config = match &rule.config {
        Some(path) => RunnerConfig::from_file(path)?,
        None => RunnerConfig::default(),
    };
    if rule.shorts {
        config.simulation.allow_shorting = true;
    }
    if rule.no_shorts {
        config.simulation.allow_shorting = false;
    }
    if let Some(cost) = rule.cost {
        config.simulation.transaction_cost = cost;
    }
    Ok(config)
}

fn effective_config_toml(rule: &RuleArgs) -> Result<String> {
    let config = load_config(rule)?;
    config.validate()?;
    config
        .to_toml()
        .context("failed to serialize configuration as TOML")
}

fn run_cmd(
    input: &Path,
    rule: RuleArgs,
    threshold: Option<f64>,
    output_dir: &Path,
    no_save: bool,
) -> Result<()> {
    let mut config = load_config(&rule)?;
    if let Some(t) = threshold {
        config.simulation.threshold = t;
    }

    let series = load_observations(input)
        .with_context(|| format!("failed to load series from {}", input.display()))?;
    let report = run_simulation(&series, &config.simulation)?;

    print_summary(&report);

    if !no_save {
        let run_dir = save_artifacts(&report, output_dir)?;
        info!(dir = %run_dir.display(), "artifacts saved");
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

struct GridOverrides {
    start: Option<f64>,
    end: Option<f64>,
    step: Option<f64>,
}

fn sweep_cmd(
    input: &Path,
    rule: RuleArgs,
    overrides: GridOverrides,
    rank_by: Option<RankingMetric>,
    serial: bool,
    output: Option<&Path>,
) -> Result<()> {
    let config = load_config(&rule)?;
    let defaults = config.sweep.grid;
    let grid = ThresholdGrid::new(
        overrides.start.unwrap_or(defaults.start),
        overrides.end.unwrap_or(defaults.end),
        overrides.step.unwrap_or(defaults.step),
    );
    let metric = rank_by.unwrap_or(config.sweep.rank_by);

    let series = load_observations(input)
        .with_context(|| format!("failed to load series from {}", input.display()))?;
    let results = ThresholdSweep::new(config.simulation)
        .with_parallelism(!serial)
        .sweep(&series, &grid)?;

    print_sweep(&results, metric);

    if let Some(path) = output {
        let csv = export_sweep_csv(&results)?;
        std::fs::write(path, csv)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Sweep table saved to: {}", path.display());
    }
    Ok(())
}

fn synth_cmd(days: usize, seed: u64, skill: f64, output: &Path) -> Result<()> {
    let series = SyntheticSeries::new(days, seed).with_skill(skill).generate();

    let csv = export_series_csv(&series)?;
    std::fs::write(output, csv).with_context(|| format!("failed to write {}", output.display()))?;

    info!(days, seed, skill, path = %output.display(), "synthetic series written");
    println!("Wrote {} observations to {}", series.len(), output.display());
    Ok(())
}

fn print_summary(report: &RunReport) {
    let c = &report.config;
    println!();
    println!("═══ Simulation {} ═══", report.run_id.short());
    println!(
        "Threshold: {:.2}   Shorting: {}   Cost: {:.2}%   Observations: {}",
        c.threshold,
        if c.allow_shorting { "enabled" } else { "disabled" },
        c.transaction_cost * 100.0,
        report.observation_count
    );
    print_stats(&report.result.summary);
    println!();
}

fn print_stats(s: &SummaryStatistics) {
    println!("Final equity:    {:.2}", s.final_equity);
    println!("Total return:    {:.1}%", s.total_return * 100.0);
    println!("Sharpe ratio:    {:.2}", s.sharpe_ratio);
    println!("Win rate:        {:.1}%", s.win_rate * 100.0);
    println!("Max drawdown:    {:.1}%", s.max_drawdown * 100.0);
    println!("Trades executed: {}", s.trade_count);
}

fn print_sweep(results: &SweepResults, metric: RankingMetric) {
    println!();
    println!(
        "{:>9}  {:>10}  {:>7}  {:>6}  {:>8}  {:>8}",
        "Threshold", "Return %", "Sharpe", "Trades", "Win %", "MaxDD %"
    );
    for e in results.all() {
        let s = &e.summary;
        println!(
            "{:>9.2}  {:>10.2}  {:>7.2}  {:>6}  {:>8.2}  {:>8.2}",
            e.threshold,
            s.total_return * 100.0,
            s.sharpe_ratio,
            s.trade_count,
            s.win_rate * 100.0,
            s.max_drawdown * 100.0
        );
    }
    println!();

    match results.best_by(metric) {
        Some(best) => println!("Best threshold ({metric}): {:.2}", best.threshold),
        None => println!("Grid was empty; no best threshold."),
    }
    let ranking = top_thresholds(results, metric, 3);
    if ranking.len() > 1 {
        let labels: Vec<String> = ranking.iter().map(|t| format!("{t:.2}")).collect();
        println!("Top {} by {metric}: {}", labels.len(), labels.join(", "));
    }
    if metric != RankingMetric::TotalReturn {
        if let Some(best) = results.best_by(RankingMetric::TotalReturn) {
            println!("Best threshold (total_return): {:.2}", best.threshold);
        }
    }
}

/// The `n` best thresholds under `metric`, best first.
fn top_thresholds(results: &SweepResults, metric: RankingMetric, n: usize) -> Vec<f64> {
    results
        .sorted_by(metric)
        .into_iter()
        .take(n)
        .map(|e| e.threshold)
        .collect()
}
