use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.95;
const DEFAULT_MAX_QUESTIONS: usize = 20;

/// Tunables for the termination policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Probability at which the leading candidate is accepted as the answer.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_questions: DEFAULT_MAX_QUESTIONS,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.confidence_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(ConfigError::InvalidField {
                field: "engine.confidence_threshold".to_string(),
                message: format!("must be within (0, 1], got {threshold}"),
            });
        }
        if self.max_questions == 0 {
            return Err(ConfigError::InvalidField {
                field: "engine.max_questions".to_string(),
                message: "must allow at least one question".to_string(),
            });
        }
        Ok(())
    }
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_max_questions() -> usize {
    DEFAULT_MAX_QUESTIONS
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
