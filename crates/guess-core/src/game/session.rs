use super::config::{ConfigError, EngineConfig};
use super::report::GameReport;
use super::state::GameState;
use super::termination::{Termination, TerminationPolicy};
use crate::belief::{InvalidAnswer, entropy};
use crate::model::{AttrValue, EntityStore, InvalidDataset};
use crate::question::{GAIN_TOLERANCE, Question, SelectError, select_question};
use thiserror::Error;
use tracing::{Level, event};

/// One answered question, kept for the lifetime of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub number: usize,
    pub attribute: String,
    pub answer: AttrValue,
    pub gain: f64,
    pub entropy_before: f64,
    pub entropy_after: f64,
    pub remaining: usize,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    Ask(Question),
    Finished(GameReport),
}

/// External collaborator that turns a question into a raw answer.
pub trait AnswerSource {
    type Error;

    fn answer(&mut self, question: &Question) -> Result<String, Self::Error>;

    /// Called when the previous answer was rejected, before the question is asked again.
    fn rejected(&mut self, _question: &Question, _error: &InvalidAnswer) {}
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(#[from] InvalidDataset),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("invalid answer: {0}")]
    InvalidAnswer(#[from] InvalidAnswer),
    #[error("no question is awaiting an answer")]
    NoPendingQuestion,
}

/// Drives one game over a borrowed store. Owns the game state exclusively.
pub struct Session<'a> {
    store: &'a EntityStore,
    policy: TerminationPolicy,
    state: GameState,
    status: Termination,
    pending: Option<Question>,
    history: Vec<TurnRecord>,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a EntityStore, config: EngineConfig) -> Result<Self, SessionError> {
        config.validate()?;
        if store.is_empty() {
            return Err(InvalidDataset::Empty.into());
        }
        if store.schema().is_empty() {
            return Err(InvalidDataset::EmptySchema.into());
        }

        let policy = TerminationPolicy::new(&config);
        let state = GameState::new(store);
        let status = policy.evaluate(state.distribution(), 0, false);

        event!(
            target: "guess_core::session",
            Level::INFO,
            candidates = store.len(),
            attributes = store.schema().len(),
            confidence_threshold = config.confidence_threshold,
            max_questions = config.max_questions,
            status = %status,
            "session started"
        );

        Ok(Self {
            store,
            policy,
            state,
            status,
            pending: None,
            history: Vec::new(),
        })
    }

    pub fn store(&self) -> &'a EntityStore {
        self.store
    }

    pub fn status(&self) -> Termination {
        self.status
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn pending_question(&self) -> Option<&Question> {
        self.pending.as_ref()
    }

    /// Returns the question awaiting an answer, selecting a new one if needed, or
    /// the final report once the game has stopped.
    pub fn next_turn(&mut self) -> Turn {
        if self.status.is_terminal() {
            return Turn::Finished(self.report());
        }
        if let Some(question) = &self.pending {
            return Turn::Ask(question.clone());
        }

        match select_question(self.store, self.state.distribution(), self.state.asked()) {
            Ok(question) if question.gain > GAIN_TOLERANCE => {
                event!(
                    target: "guess_core::session",
                    Level::DEBUG,
                    number = self.state.questions_asked() + 1,
                    attribute = %question.name,
                    gain = question.gain,
                    options = question.options.len(),
                    "question selected"
                );
                self.pending = Some(question.clone());
                Turn::Ask(question)
            }
            // Nothing left can split the remaining candidates.
            Ok(_) | Err(SelectError::AttributesExhausted) => {
                self.status = self.policy.evaluate(
                    self.state.distribution(),
                    self.state.questions_asked(),
                    true,
                );
                self.log_finish("attributes exhausted");
                Turn::Finished(self.report())
            }
        }
    }

    /// Applies a raw answer to the pending question.
    ///
    /// An invalid answer is reported once and leaves the state and the pending
    /// question untouched.
    pub fn submit(&mut self, raw: &str) -> Result<Termination, SessionError> {
        let Some(question) = self.pending.as_ref() else {
            return Err(SessionError::NoPendingQuestion);
        };

        let (mut next, answer) = match self.state.answered(self.store, question.attribute, raw) {
            Ok(result) => result,
            Err(err) => {
                event!(
                    target: "guess_core::session",
                    Level::WARN,
                    attribute = %question.name,
                    input = raw,
                    error = %err,
                    "answer rejected"
                );
                return Err(err.into());
            }
        };
        next.count_question();

        let record = TurnRecord {
            number: next.questions_asked(),
            attribute: question.name.clone(),
            answer,
            gain: question.gain,
            entropy_before: entropy(self.state.distribution()),
            entropy_after: entropy(next.distribution()),
            remaining: next.distribution().len(),
        };

        event!(
            target: "guess_core::session",
            Level::INFO,
            number = record.number,
            attribute = %record.attribute,
            answer = %record.answer,
            gain = record.gain,
            entropy_before = record.entropy_before,
            entropy_after = record.entropy_after,
            remaining = record.remaining,
            "answer applied"
        );

        self.history.push(record);
        self.state = next;
        self.pending = None;
        self.status = self.policy.evaluate(
            self.state.distribution(),
            self.state.questions_asked(),
            false,
        );
        if self.status.is_terminal() {
            self.log_finish("policy");
        }
        Ok(self.status)
    }

    /// Runs the loop to completion against `source`, asking again after every
    /// rejected answer.
    pub fn play<S: AnswerSource>(&mut self, source: &mut S) -> Result<GameReport, S::Error> {
        loop {
            let question = match self.next_turn() {
                Turn::Finished(report) => return Ok(report),
                Turn::Ask(question) => question,
            };
            let raw = source.answer(&question)?;
            if let Err(SessionError::InvalidAnswer(err)) = self.submit(&raw) {
                source.rejected(&question, &err);
            }
        }
    }

    /// Snapshot of the current standing; final once `status()` is terminal.
    pub fn report(&self) -> GameReport {
        GameReport::new(
            self.store,
            self.status,
            self.state.questions_asked(),
            self.state.distribution(),
        )
    }

    fn log_finish(&self, reason: &'static str) {
        let leader = self
            .state
            .distribution()
            .leader()
            .map(|(id, weight)| (self.store.entity(id).name().to_string(), weight));
        event!(
            target: "guess_core::session",
            Level::INFO,
            outcome = %self.status,
            reason,
            questions = self.state.questions_asked(),
            remaining = self.state.distribution().len(),
            leader = ?leader,
            "session finished"
        );
    }
}
