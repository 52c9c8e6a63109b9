use core::fmt;
use serde::{Deserialize, Serialize};

/// A single attribute value held by an entity or given as an answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Flag(bool),
    Text(String),
}

impl AttrValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttrValue::Text(value.into())
    }

    /// Comparison key: trimmed and case-folded for text, the flag itself otherwise.
    pub fn key(&self) -> ValueKey {
        match self {
            AttrValue::Flag(flag) => ValueKey::Flag(*flag),
            AttrValue::Text(text) => ValueKey::Text(text.trim().to_lowercase()),
        }
    }

    pub fn matches(&self, other: &AttrValue) -> bool {
        self.key() == other.key()
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AttrValue::Flag(flag) => Some(*flag),
            AttrValue::Text(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Flag(true) => f.write_str("yes"),
            AttrValue::Flag(false) => f.write_str("no"),
            AttrValue::Text(text) => f.write_str(text),
        }
    }
}

/// Normalized form used to group and match values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueKey {
    Flag(bool),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_keys_fold_case_and_whitespace() {
        let a = AttrValue::text("  Real Madrid ");
        let b = AttrValue::text("real madrid");
        assert_eq!(a.key(), b.key());
        assert!(a.matches(&b));
    }

    #[test]
    fn flags_never_match_text() {
        assert!(!AttrValue::Flag(true).matches(&AttrValue::text("true")));
    }

    #[test]
    fn flags_display_as_yes_no() {
        assert_eq!(AttrValue::Flag(true).to_string(), "yes");
        assert_eq!(AttrValue::Flag(false).to_string(), "no");
        assert_eq!(AttrValue::text("Barcelona").to_string(), "Barcelona");
    }
}
