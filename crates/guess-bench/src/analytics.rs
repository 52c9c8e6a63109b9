use std::collections::HashMap;
use std::fs;
use std::path::Path;

use guess_core::game::Termination;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;
use thiserror::Error;

use crate::config::BenchmarkConfig;
use crate::simulation::GameOutcome;

const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("no games were recorded")]
    Empty,
    #[error("invalid sampling distribution: {0}")]
    Distribution(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-game results into run-level statistics.
pub struct AnalyticsCollector {
    run_id: String,
    noise: f64,
    outcomes: HashMap<Termination, usize>,
    correct: usize,
    lies: usize,
    questions: Vec<f64>,
    solved_questions: Vec<f64>,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Self {
        Self {
            run_id: config.run_id.clone(),
            noise: config.games.noise,
            outcomes: HashMap::new(),
            correct: 0,
            lies: 0,
            questions: Vec::new(),
            solved_questions: Vec::new(),
        }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) {
        *self.outcomes.entry(outcome.report.outcome).or_default() += 1;
        if outcome.is_correct() {
            self.correct += 1;
        }
        self.lies += outcome.lies;

        let asked = outcome.report.questions_asked as f64;
        self.questions.push(asked);
        if outcome.report.outcome == Termination::Solved {
            self.solved_questions.push(asked);
        }
    }

    pub fn finalize(self) -> Result<AnalyticsSummary, AnalyticsError> {
        if self.questions.is_empty() {
            return Err(AnalyticsError::Empty);
        }
        let games = self.questions.len();
        let count = |outcome: Termination| self.outcomes.get(&outcome).copied().unwrap_or(0);

        let mean = self.questions.iter().mean();
        let std_dev = if games > 1 {
            self.questions.iter().std_dev()
        } else {
            0.0
        };
        let z = Normal::new(0.0, 1.0)
            .map_err(|err| AnalyticsError::Distribution(err.to_string()))?
            .inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0);
        let margin = z * std_dev / (games as f64).sqrt();

        Ok(AnalyticsSummary {
            run_id: self.run_id,
            noise: self.noise,
            games,
            solved: count(Termination::Solved),
            exhausted: count(Termination::Exhausted),
            no_candidates: count(Termination::NoCandidates),
            correct: self.correct,
            lies: self.lies,
            questions: QuestionStats {
                mean,
                std_dev,
                ci95: (mean - margin, mean + margin),
                min: Statistics::min(self.questions.iter()),
                max: Statistics::max(self.questions.iter()),
                mean_when_solved: (!self.solved_questions.is_empty())
                    .then(|| self.solved_questions.iter().mean()),
            },
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionStats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci95: (f64, f64),
    pub min: f64,
    pub max: f64,
    pub mean_when_solved: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub run_id: String,
    pub noise: f64,
    pub games: usize,
    pub solved: usize,
    pub exhausted: usize,
    pub no_candidates: usize,
    pub correct: usize,
    pub lies: usize,
    pub questions: QuestionStats,
}

impl AnalyticsSummary {
    pub fn correct_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.correct as f64 / self.games as f64
        }
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let rate = |n: usize| n as f64 * 100.0 / self.games.max(1) as f64;
        let stats = &self.questions;

        let mut rows = String::new();
        rows.push_str(&format!("# Self-play Summary: {}\n\n", self.run_id));
        rows.push_str(&format!(
            "{} games, oracle noise {:.2}, {} wrong answer(s) given\n\n",
            self.games, self.noise, self.lies
        ));
        rows.push_str("| Outcome | Games | Share |\n");
        rows.push_str("|---------|-------|-------|\n");
        for (label, n) in [
            ("Solved", self.solved),
            ("Exhausted", self.exhausted),
            ("No candidates", self.no_candidates),
        ] {
            rows.push_str(&format!("| {label} | {n} | {:.1}% |\n", rate(n)));
        }
        rows.push_str(&format!(
            "\nCorrect guesses: {} ({:.1}%)\n\n",
            self.correct,
            self.correct_rate() * 100.0
        ));

        rows.push_str("| Questions | Mean | Std dev | 95% CI | Min | Max | Mean when solved |\n");
        rows.push_str("|-----------|------|---------|--------|-----|-----|------------------|\n");
        rows.push_str(&format!(
            "| all games | {mean:.3} | {std:.3} | [{lo:.3}, {hi:.3}] | {min} | {max} | {solved} |\n",
            mean = stats.mean,
            std = stats.std_dev,
            lo = stats.ci95.0,
            hi = stats.ci95.1,
            min = stats.min,
            max = stats.max,
            solved = stats
                .mean_when_solved
                .map(|mean| format!("{mean:.3}"))
                .unwrap_or_else(|| "-".to_string()),
        ));

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}
