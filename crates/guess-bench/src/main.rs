#![deny(warnings)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use guess_bench::config::{BenchmarkConfig, ResolvedOutputs};
use guess_bench::logging::init_logging;
use guess_bench::simulation::SimulationRunner;

/// Self-play harness for the guessing engine.
#[derive(Debug, Parser)]
#[command(
    name = "guess-bench",
    author,
    version,
    about = "Deterministic self-play harness for the guessing engine"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games; 0 plays every entity once.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for secret selection and oracle noise.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration and dataset (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let noise = config.games.noise;
    let dataset = config.dataset.path.clone();

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SimulationRunner::new(config, outputs).context("preparing self-play run")?;

    println!(
        "Loaded configuration '{run_id}': {} candidate(s) from {} ({} game(s), noise {noise:.2})",
        runner.store().len(),
        dataset.display(),
        runner.games()
    );

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Self-play complete for '{run_id}': {} games, {} solved, {} correct → {} rows at {}",
        summary.games_played,
        summary.solved,
        summary.correct,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
