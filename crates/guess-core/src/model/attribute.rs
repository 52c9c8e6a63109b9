use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Position of an attribute inside its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrId(usize);

impl AttrId {
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Finite set of string values; one question partitions candidates by value.
    Categorical,
    /// Yes/no; one question partitions candidates into two groups.
    Boolean,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Categorical => f.write_str("categorical"),
            AttributeKind::Boolean => f.write_str("boolean"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl Attribute {
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Categorical,
            prompt: None,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Boolean,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Text shown to the answering party.
    pub fn question_text(&self) -> String {
        match (&self.prompt, self.kind) {
            (Some(prompt), _) => prompt.clone(),
            (None, AttributeKind::Boolean) => format!("Is '{}' true for your pick?", self.name),
            (None, AttributeKind::Categorical) => format!("What is the {}?", self.name),
        }
    }
}

/// Ordered list of askable attributes. Declared order doubles as tie-break priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
}

#[derive(Deserialize)]
struct RawSchema {
    attributes: Vec<Attribute>,
}

impl TryFrom<RawSchema> for AttributeSchema {
    type Error = SchemaError;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        Self::new(raw.attributes)
    }
}

impl AttributeSchema {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(attributes.len());
        for mut attribute in attributes {
            let name = attribute.name.trim().to_string();
            if name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !seen.insert(name.clone()) {
                return Err(SchemaError::Duplicate { name });
            }
            attribute.name = name;
            normalized.push(attribute);
        }
        Ok(Self {
            attributes: normalized,
        })
    }

    /// Built-in football schema matching the bundled `players.csv` layout.
    pub fn players() -> Self {
        Self {
            attributes: vec![
                Attribute::categorical("club").with_prompt("Does the player play for club"),
                Attribute::categorical("position").with_prompt("Does the player play in position"),
                Attribute::categorical("nationality").with_prompt("Is the player's nationality"),
                Attribute::boolean("retired").with_prompt("Is the player retired?"),
                Attribute::boolean("ballon_dor").with_prompt("Has the player won Ballon d'Or?"),
                Attribute::boolean("champions_league")
                    .with_prompt("Has the player won Champions League?"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get(&self, id: AttrId) -> &Attribute {
        &self.attributes[id.0]
    }

    pub fn find(&self, name: &str) -> Option<AttrId> {
        let name = name.trim();
        self.attributes
            .iter()
            .position(|attribute| attribute.name == name)
            .map(AttrId)
    }

    /// Attribute ids in declared order.
    pub fn ids(&self) -> impl Iterator<Item = AttrId> + '_ {
        (0..self.attributes.len()).map(AttrId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttrId, &Attribute)> {
        self.attributes
            .iter()
            .enumerate()
            .map(|(index, attribute)| (AttrId(index), attribute))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("attribute name must not be empty")]
    EmptyName,
    #[error("attribute '{name}' declared more than once")]
    Duplicate { name: String },
}
