//! Normalization of free-text answers.

use crate::model::{AttrValue, AttributeKind};
use thiserror::Error;

/// Inputs read as "yes" after trimming and case folding.
pub const YES_WORDS: [&str; 3] = ["yes", "y", "true"];
/// Inputs read as "no" after trimming and case folding.
pub const NO_WORDS: [&str; 3] = ["no", "n", "false"];

/// Maps a recognized yes/no synonym to a flag.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let folded = raw.trim().to_lowercase();
    if YES_WORDS.contains(&folded.as_str()) {
        Some(true)
    } else if NO_WORDS.contains(&folded.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Validates a raw answer for an attribute of `kind`.
///
/// Boolean answers must hit the synonym table. Categorical answers only need to be
/// non-blank; a value nobody holds simply eliminates every candidate.
pub fn normalize_answer(kind: AttributeKind, raw: &str) -> Result<AttrValue, InvalidAnswer> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidAnswer::Empty);
    }
    match kind {
        AttributeKind::Boolean => {
            parse_flag(trimmed)
                .map(AttrValue::Flag)
                .ok_or_else(|| InvalidAnswer::NotYesNo {
                    input: trimmed.to_string(),
                })
        }
        AttributeKind::Categorical => Ok(AttrValue::text(trimmed)),
    }
}

/// Answer rejected for one attempt; the game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAnswer {
    #[error("answer must not be empty")]
    Empty,
    #[error("'{input}' is not a yes/no answer")]
    NotYesNo { input: String },
}
