use guess_core::dataset::DEFAULT_ID_COLUMN;
use guess_core::game::{ConfigError as EngineConfigError, EngineConfig};
use guess_core::model::AttributeSchema;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root self-play configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub games: GamesConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.dataset.validate()?;
        self.games.validate()?;
        self.engine.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (`{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Where the entities come from and how their columns are read.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatasetConfig {
    pub path: PathBuf,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Inline schema; the built-in players schema when absent.
    #[serde(default)]
    pub schema: Option<AttributeSchema>,
}

impl DatasetConfig {
    pub fn schema(&self) -> AttributeSchema {
        self.schema
            .clone()
            .unwrap_or_else(AttributeSchema::players)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "dataset.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        if self.id_column.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "dataset.id_column".to_string(),
                message: "identifier column must not be empty".to_string(),
            });
        }

        if self.schema.as_ref().is_some_and(AttributeSchema::is_empty) {
            return Err(ValidationError::InvalidField {
                field: "dataset.schema".to_string(),
                message: "schema must declare at least one attribute".to_string(),
            });
        }

        Ok(())
    }
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

/// Which secrets are played and how reliably the oracle answers.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    /// Games to play; `0` plays every entity once, in store order.
    #[serde(default)]
    pub count: usize,
    /// Probability that the oracle gives a wrong answer to a question.
    #[serde(default)]
    pub noise: f64,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.noise.is_finite() || !(0.0..=1.0).contains(&self.noise) {
            return Err(ValidationError::InvalidField {
                field: "games.noise".to_string(),
                message: format!("noise must be within [0, 1], got {}", self.noise),
            });
        }
        Ok(())
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }

        if self.jsonl == self.summary_md {
            return Err(ValidationError::InvalidField {
                field: "outputs.summary_md".to_string(),
                message: "summary must not overwrite the JSONL log".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl From<EngineConfigError> for ValidationError {
    fn from(err: EngineConfigError) -> Self {
        match err {
            EngineConfigError::InvalidField { field, message } => {
                ValidationError::InvalidField { field, message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guess_core::model::AttributeKind;

    const BASIC_YAML: &str = r#"
run_id: "players_smoke"
dataset:
  path: "data/players.csv"
games:
  seed: 7
  count: 12
  noise: 0.1
engine:
  confidence_threshold: 0.9
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> BenchmarkConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn field_of(err: ValidationError) -> String {
        let ValidationError::InvalidField { field, .. } = err;
        field
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.dataset.id_column, DEFAULT_ID_COLUMN);
        assert_eq!(cfg.dataset.schema(), AttributeSchema::players());
        assert_eq!(cfg.games.count, 12);
        assert_eq!(cfg.engine.confidence_threshold, 0.9);
        assert_eq!(cfg.engine.max_questions, 20);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/players_smoke/games.jsonl")
        );
        assert_eq!(
            outputs.summary_md,
            PathBuf::from("bench/out/players_smoke/summary.md")
        );
    }

    #[test]
    fn optional_blocks_fall_back_to_defaults() {
        let mut cfg = parse(
            r#"
run_id: "minimal"
dataset:
  path: "roster.csv"
outputs:
  jsonl: "games.jsonl"
  summary_md: "summary.md"
"#,
        );
        cfg.validate().expect("validate");
        assert_eq!(cfg.games, GamesConfig::default());
        assert_eq!(cfg.engine, EngineConfig::default());
        assert!(!cfg.logging.enable_structured);
        assert_eq!(cfg.logging.tracing_level, "info");
    }

    #[test]
    fn inline_schema_is_parsed() {
        let yaml = BASIC_YAML.replace(
            "  path: \"data/players.csv\"\n",
            "  path: \"heroes.csv\"\n  id_column: \"hero\"\n  schema:\n    attributes:\n      - name: active\n        kind: boolean\n",
        );
        let mut cfg = parse(&yaml);
        cfg.validate().expect("validate");
        let schema = cfg.dataset.schema();
        assert_eq!(schema.len(), 1);
        let (_, attribute) = schema.iter().next().expect("one attribute");
        assert_eq!(attribute.name, "active");
        assert_eq!(attribute.kind, AttributeKind::Boolean);
        assert_eq!(cfg.dataset.id_column, "hero");
    }

    #[test]
    fn rejects_bad_run_id() {
        let yaml = BASIC_YAML.replace("players_smoke", "players smoke!");
        let err = parse(&yaml).validate().expect_err("should fail");
        assert_eq!(field_of(err), "run_id");
    }

    #[test]
    fn rejects_noise_out_of_range() {
        let yaml = BASIC_YAML.replace("noise: 0.1", "noise: 1.5");
        let err = parse(&yaml).validate().expect_err("should fail");
        assert_eq!(field_of(err), "games.noise");
    }

    #[test]
    fn engine_errors_keep_their_field() {
        let yaml = BASIC_YAML.replace("confidence_threshold: 0.9", "confidence_threshold: 0.0");
        let err = parse(&yaml).validate().expect_err("should fail");
        assert_eq!(field_of(err), "engine.confidence_threshold");
    }

    #[test]
    fn rejects_colliding_outputs() {
        let yaml = BASIC_YAML.replace("summary.md", "games.jsonl");
        let err = parse(&yaml).validate().expect_err("should fail");
        assert_eq!(field_of(err), "outputs.summary_md");
    }

    #[test]
    fn duplicate_schema_attributes_fail_to_parse() {
        let yaml = BASIC_YAML.replace(
            "  path: \"data/players.csv\"\n",
            "  path: \"x.csv\"\n  schema:\n    attributes:\n      - name: club\n        kind: categorical\n      - name: club\n        kind: boolean\n",
        );
        assert!(serde_yaml::from_str::<BenchmarkConfig>(&yaml).is_err());
    }
}
