use crate::belief::{CandidateDistribution, entropy, entropy_of};
use crate::model::{AttrId, AttrValue, EntityId, EntityStore, ValueKey};
use std::collections::BTreeMap;

/// Candidates sharing one value of the partitioning attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionGroup {
    /// Spelling of the value as first seen in store order.
    pub value: AttrValue,
    pub mass: f64,
    pub members: Vec<(EntityId, f64)>,
}

/// Remaining candidates grouped by their value for one attribute. Only values
/// actually held by a remaining candidate appear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition {
    groups: BTreeMap<ValueKey, PartitionGroup>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups ordered by value key.
    pub fn groups(&self) -> impl Iterator<Item = &PartitionGroup> {
        self.groups.values()
    }

    pub fn get(&self, value: &AttrValue) -> Option<&PartitionGroup> {
        self.groups.get(&value.key())
    }
}

pub fn partition(
    store: &EntityStore,
    dist: &CandidateDistribution,
    attribute: AttrId,
) -> Partition {
    let mut groups: BTreeMap<ValueKey, PartitionGroup> = BTreeMap::new();
    for (id, weight) in dist.iter() {
        let value = store.value(id, attribute);
        let group = groups.entry(value.key()).or_insert_with(|| PartitionGroup {
            value: value.clone(),
            mass: 0.0,
            members: Vec::new(),
        });
        group.mass += weight;
        group.members.push((id, weight));
    }
    Partition { groups }
}

/// Expected entropy reduction, in bits, from asking about `attribute`.
///
/// The result is clamped to `[0, H(before)]`; an attribute holding a single
/// value across the remaining candidates scores zero.
pub fn information_gain(
    store: &EntityStore,
    dist: &CandidateDistribution,
    attribute: AttrId,
) -> f64 {
    let before = entropy(dist);
    let total = dist.total();
    if before <= 0.0 || total <= 0.0 {
        return 0.0;
    }

    let partition = partition(store, dist, attribute);
    if partition.len() <= 1 {
        return 0.0;
    }

    let expected_after: f64 = partition
        .groups()
        .map(|group| {
            let p = group.mass / total;
            p * entropy_of(group.members.iter().map(|(_, weight)| *weight))
        })
        .sum();

    (before - expected_after).clamp(0.0, before)
}
