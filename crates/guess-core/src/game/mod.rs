pub mod config;
pub mod report;
pub mod session;
pub mod state;
pub mod termination;

pub use config::{ConfigError, EngineConfig};
pub use report::{GameReport, RankedCandidate};
pub use session::{AnswerSource, Session, SessionError, Turn, TurnRecord};
pub use state::GameState;
pub use termination::{Termination, TerminationPolicy};
