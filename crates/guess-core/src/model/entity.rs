use super::attribute::AttrId;
use super::value::AttrValue;

/// Position of an entity inside its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(usize);

impl EntityId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// One candidate. Values are stored in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    name: String,
    values: Vec<AttrValue>,
}

impl Entity {
    pub(crate) fn new(name: String, values: Vec<AttrValue>) -> Self {
        Self { name, values }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self, attribute: AttrId) -> &AttrValue {
        &self.values[attribute.index()]
    }

    pub fn values(&self) -> &[AttrValue] {
        &self.values
    }
}
