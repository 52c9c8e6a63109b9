use super::config::EngineConfig;
use crate::belief::CandidateDistribution;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Game status evaluated after every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Continue,
    /// One candidate left, or the leader reached the confidence threshold.
    Solved,
    /// The answers ruled out every entity.
    NoCandidates,
    /// Question budget or askable attributes ran out first.
    Exhausted,
}

impl Termination {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Termination::Continue)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Termination::Continue => "continue",
            Termination::Solved => "solved",
            Termination::NoCandidates => "no_candidates",
            Termination::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminationPolicy {
    confidence_threshold: f64,
    max_questions: usize,
}

impl TerminationPolicy {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            max_questions: config.max_questions,
        }
    }

    pub fn max_questions(&self) -> usize {
        self.max_questions
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Priority: `NoCandidates`, then `Solved`, then `Exhausted`, else `Continue`.
    pub fn evaluate(
        &self,
        dist: &CandidateDistribution,
        questions_asked: usize,
        attributes_exhausted: bool,
    ) -> Termination {
        if dist.is_empty() {
            return Termination::NoCandidates;
        }

        if dist.len() == 1 {
            return Termination::Solved;
        }

        let confident = dist
            .leader()
            .is_some_and(|(_, weight)| weight >= self.confidence_threshold);
        if confident && questions_asked > 0 {
            return Termination::Solved;
        }

        if questions_asked >= self.max_questions || attributes_exhausted {
            return Termination::Exhausted;
        }

        Termination::Continue
    }
}
