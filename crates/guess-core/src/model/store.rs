use super::attribute::{AttrId, AttributeKind, AttributeSchema};
use super::entity::{Entity, EntityId};
use super::value::AttrValue;
use crate::belief::answer::parse_flag;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Value assumed for a categorical attribute an entity does not provide.
pub const UNKNOWN_VALUE: &str = "Unknown";

/// Raw entity description handed over by the loading collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityRecord {
    pub name: String,
    pub values: BTreeMap<String, String>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(attribute.into(), value.into());
        self
    }
}

/// Immutable in-memory table of entities.
#[derive(Debug, Clone)]
pub struct EntityStore {
    schema: AttributeSchema,
    entities: Vec<Entity>,
}

impl EntityStore {
    /// Validates raw records against `schema` and builds the store.
    pub fn from_records<I>(schema: AttributeSchema, records: I) -> Result<Self, InvalidDataset>
    where
        I: IntoIterator<Item = EntityRecord>,
    {
        let records: Vec<EntityRecord> = records.into_iter().collect();
        if records.is_empty() {
            return Err(InvalidDataset::Empty);
        }
        if schema.is_empty() {
            return Err(InvalidDataset::EmptySchema);
        }

        for (_, attribute) in schema.iter() {
            if !records
                .iter()
                .any(|record| record.values.contains_key(&attribute.name))
            {
                return Err(InvalidDataset::MissingAttribute {
                    attribute: attribute.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut entities = Vec::with_capacity(records.len());
        for (row, record) in records.into_iter().enumerate() {
            let name = record.name.trim().to_string();
            if name.is_empty() {
                return Err(InvalidDataset::EmptyIdentifier { row: row + 1 });
            }
            if !seen.insert(name.clone()) {
                return Err(InvalidDataset::DuplicateIdentifier { name });
            }

            let mut values = Vec::with_capacity(schema.len());
            for (_, attribute) in schema.iter() {
                let raw = record
                    .values
                    .get(&attribute.name)
                    .map(|value| value.trim())
                    .unwrap_or_default();
                let value = match attribute.kind {
                    AttributeKind::Boolean if raw.is_empty() => AttrValue::Flag(false),
                    AttributeKind::Boolean => match parse_flag(raw) {
                        Some(flag) => AttrValue::Flag(flag),
                        None => {
                            return Err(InvalidDataset::InvalidFlag {
                                entity: name,
                                attribute: attribute.name.clone(),
                                value: raw.to_string(),
                            });
                        }
                    },
                    AttributeKind::Categorical if raw.is_empty() => AttrValue::text(UNKNOWN_VALUE),
                    AttributeKind::Categorical => AttrValue::text(raw),
                };
                values.push(value);
            }
            entities.push(Entity::new(name, values));
        }

        Ok(Self { schema, entities })
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn value(&self, id: EntityId, attribute: AttrId) -> &AttrValue {
        self.entity(id).value(attribute)
    }

    pub fn find(&self, name: &str) -> Option<EntityId> {
        let name = name.trim();
        self.entities
            .iter()
            .position(|entity| entity.name() == name)
            .map(EntityId::new)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.entities.len()).map(EntityId::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (EntityId::new(index), entity))
    }
}

/// Dataset rejected before a session can start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDataset {
    #[error("dataset contains no entities")]
    Empty,
    #[error("schema declares no attributes")]
    EmptySchema,
    #[error("entity #{row} has an empty identifier")]
    EmptyIdentifier { row: usize },
    #[error("entity '{name}' is defined more than once")]
    DuplicateIdentifier { name: String },
    #[error("attribute '{attribute}' is missing from every entity")]
    MissingAttribute { attribute: String },
    #[error("entity '{entity}' has unrecognized boolean '{value}' for '{attribute}'")]
    InvalidFlag {
        entity: String,
        attribute: String,
        value: String,
    },
}
