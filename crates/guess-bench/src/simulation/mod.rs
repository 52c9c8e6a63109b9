mod oracle;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use guess_core::dataset::{DatasetError, load_csv};
use guess_core::game::{GameReport, Session, SessionError, Termination};
use guess_core::model::{EntityId, EntityStore};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_dir;

pub use oracle::OracleAnswerer;

/// Plays one game per secret entity against an [`OracleAnswerer`].
pub struct SimulationRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    store: EntityStore,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub solved: usize,
    pub correct: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

/// Everything the harness keeps about a finished game.
#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub secret: String,
    pub report: GameReport,
    /// Attribute names in the order they were asked.
    pub questions: Vec<String>,
    pub lies: usize,
}

impl GameOutcome {
    /// The engine's final guess: its leading candidate, unless nothing matched.
    pub fn guess(&self) -> Option<&str> {
        match self.report.outcome {
            Termination::NoCandidates => None,
            _ => self.report.best().map(|best| best.name.as_str()),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.guess() == Some(self.secret.as_str())
    }
}

impl SimulationRunner {
    /// Loads the dataset named by a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let store = load_csv(
            &config.dataset.path,
            config.dataset.schema(),
            &config.dataset.id_column,
        )
        .map_err(|source| RunnerError::Dataset {
            path: config.dataset.path.clone(),
            source,
        })?;

        // Surface engine problems before any output is created.
        Session::new(&store, config.engine)?;

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            store,
        })
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Number of games `run` will play.
    pub fn games(&self) -> usize {
        match self.config.games.count {
            0 => self.store.len(),
            count => count,
        }
    }

    /// Execute every game, streaming one JSONL row per game to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let ids: Vec<EntityId> = self.store.ids().collect();
        let mut analytics = AnalyticsCollector::new(&self.config);
        let mut rows_written = 0usize;

        for game_index in 0..self.games() {
            let secret = match self.config.games.count {
                0 => ids[game_index],
                _ => ids[rng.gen_range(0..ids.len())],
            };
            let game_seed = rng.next_u64();

            let outcome = self.play_game(secret, game_seed)?;
            analytics.record_game(&outcome);
            write_game_row(&mut writer, &self.config, game_index, game_seed, &outcome)?;
            rows_written += 1;

            if self.logging_enabled {
                event!(
                    target: "guess_bench::game",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u64,
                    secret = %outcome.secret,
                    outcome = %outcome.report.outcome,
                    questions = outcome.report.questions_asked as u64,
                    correct = outcome.is_correct(),
                    lies = outcome.lies as u64,
                    "game finished"
                );
            }
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_dir(&self.outputs).join(crate::logging::TELEMETRY_FILE));

        Ok(RunSummary {
            games_played: summary.games,
            solved: summary.solved,
            correct: summary.correct,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    /// Plays a single game for `secret` with its own oracle seed.
    pub fn play_game(&self, secret: EntityId, seed: u64) -> Result<GameOutcome, RunnerError> {
        let mut session = Session::new(&self.store, self.config.engine)?;
        let mut oracle = OracleAnswerer::new(&self.store, secret, self.config.games.noise, seed);
        let Ok(report) = session.play(&mut oracle);

        Ok(GameOutcome {
            secret: self.store.entity(secret).name().to_string(),
            report,
            questions: session
                .history()
                .iter()
                .map(|turn| turn.attribute.clone())
                .collect(),
            lies: oracle.lies(),
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<(), RunnerError> {
    let best = outcome.guess().and_then(|_| outcome.report.best());
    let row = GameLogRow {
        run_id: &config.run_id,
        game_id: format!("G{game_index:05}"),
        game_index,
        game_seed,
        secret: &outcome.secret,
        outcome: outcome.report.outcome,
        questions_asked: outcome.report.questions_asked,
        guess: best.map(|best| best.name.as_str()),
        guess_probability: best.map(|best| best.probability),
        correct: outcome.is_correct(),
        remaining: outcome.report.candidates.len(),
        lies: outcome.lies,
        questions: &outcome.questions,
    };
    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    secret: &'a str,
    outcome: Termination,
    questions_asked: usize,
    guess: Option<&'a str>,
    guess_probability: Option<f64>,
    correct: bool,
    remaining: usize,
    lies: usize,
    questions: &'a [String],
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to load dataset {path:?}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
    #[error("cannot start game: {0}")]
    Session(#[from] SessionError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
