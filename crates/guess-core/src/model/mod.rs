//! Immutable description of the guessing universe.
//!
//! - `attribute`: the ordered schema of askable attributes.
//! - `value`: categorical and boolean attribute values plus their comparison keys.
//! - `entity`: a single candidate and its attribute values.
//! - `store`: the validated, immutable entity table.

pub mod attribute;
pub mod entity;
pub mod store;
pub mod value;

pub use attribute::{AttrId, Attribute, AttributeKind, AttributeSchema, SchemaError};
pub use entity::{Entity, EntityId};
pub use store::{EntityRecord, EntityStore, InvalidDataset};
pub use value::{AttrValue, ValueKey};
