//! Candidate distribution tracking.
//!
//! This module is composed of:
//! - `distribution`: the eliminative probability mapping over remaining entities.
//! - `entropy`: Shannon entropy of a distribution, in bits.
//! - `answer`: the yes/no normalization table and answer validation.
//! - `update`: filtering a distribution by an answer.

pub mod answer;
mod distribution;
mod entropy;
mod update;

pub use answer::{InvalidAnswer, normalize_answer, parse_flag};
pub use distribution::CandidateDistribution;
pub use entropy::{entropy, entropy_of};
pub use update::apply_answer;
