use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use guess_core::dataset::{DEFAULT_ID_COLUMN, load_csv};
use guess_core::game::{EngineConfig, Session};
use guess_core::model::AttributeSchema;
use tracing::{Level, event};

use crate::console::ConsoleGame;

/// Interactive guessing game over a tabular dataset.
#[derive(Debug, Parser)]
#[command(
    name = "guess",
    author,
    version,
    about = "Guesses the entity you are thinking of by asking the most informative questions"
)]
pub struct Cli {
    /// CSV dataset with a header row.
    #[arg(short, long, value_name = "FILE", default_value = "data/players.csv")]
    pub dataset: PathBuf,

    /// YAML attribute schema; defaults to the built-in football players schema.
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Column holding the unique entity identifier.
    #[arg(long, value_name = "COLUMN", default_value = DEFAULT_ID_COLUMN)]
    pub id_column: String,

    /// Probability at which the leading candidate is accepted.
    #[arg(long, value_name = "P")]
    pub confidence: Option<f64>,

    /// Maximum number of questions before giving a best guess.
    #[arg(long, value_name = "N")]
    pub max_questions: Option<usize>,

    /// Print the final report as JSON after the game.
    #[arg(long)]
    pub json: bool,

    /// Emit debug diagnostics on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(confidence) = self.confidence {
            config.confidence_threshold = confidence;
        }
        if let Some(max_questions) = self.max_questions {
            config.max_questions = max_questions;
        }
        config
    }
}

pub fn load_schema(path: &Path) -> Result<AttributeSchema> {
    let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))
}

/// Plays one game on stdin/stdout.
pub fn run(cli: Cli) -> Result<()> {
    let schema = match cli.schema.as_deref() {
        Some(path) => load_schema(path)?,
        None => AttributeSchema::players(),
    };
    let store = load_csv(&cli.dataset, schema, &cli.id_column)
        .with_context(|| format!("loading dataset {}", cli.dataset.display()))?;
    event!(
        target: "guess_app::cli",
        Level::INFO,
        dataset = %cli.dataset.display(),
        candidates = store.len(),
        attributes = store.schema().len(),
        "dataset loaded"
    );
    let config = cli.engine_config();
    let mut session = Session::new(&store, config).context("starting game")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut game = ConsoleGame::new(stdin.lock(), stdout.lock());
    game.welcome(&store)?;
    let end = game.play(&mut session)?;

    if cli.json {
        let mut out = game.into_output();
        writeln!(out, "{}", end.report().to_json()?)?;
    }
    Ok(())
}
