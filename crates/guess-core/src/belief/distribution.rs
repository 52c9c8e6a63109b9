use crate::model::{EntityId, EntityStore};
use std::collections::BTreeMap;

/// Probability weights over the entities still consistent with every answer.
///
/// Eliminated entities are dropped from the mapping rather than kept at zero, so
/// every stored weight is strictly positive and the weights sum to one unless the
/// distribution is empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CandidateDistribution {
    weights: BTreeMap<EntityId, f64>,
}

impl CandidateDistribution {
    /// Uniform prior over every entity in the store.
    pub fn uniform(store: &EntityStore) -> Self {
        let count = store.len();
        if count == 0 {
            return Self::default();
        }
        let weight = 1.0 / count as f64;
        Self {
            weights: store.ids().map(|id| (id, weight)).collect(),
        }
    }

    /// Builds a distribution from arbitrary non-negative weights, dropping zeros and
    /// rescaling the rest so their ratios are preserved.
    pub fn from_weights<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = (EntityId, f64)>,
    {
        let mut dist = Self {
            weights: weights
                .into_iter()
                .filter(|(_, weight)| weight.is_finite() && *weight > 0.0)
                .collect(),
        };
        dist.renormalize();
        dist
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of `id`; zero once eliminated.
    pub fn weight(&self, id: EntityId) -> f64 {
        self.weights.get(&id).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.weights.contains_key(&id)
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, f64)> + '_ {
        self.weights.iter().map(|(id, weight)| (*id, *weight))
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.weights.keys().copied()
    }

    /// Keeps the entities accepted by `keep`, renormalizing the survivors.
    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(EntityId) -> bool,
    {
        Self::from_weights(self.iter().filter(|(id, _)| keep(*id)))
    }

    /// Highest-weight entity; ties go to the earliest entity in store order.
    pub fn leader(&self) -> Option<(EntityId, f64)> {
        self.ranked().into_iter().next()
    }

    /// Entities sorted by descending weight, then store order.
    pub fn ranked(&self) -> Vec<(EntityId, f64)> {
        let mut ranked: Vec<(EntityId, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    fn renormalize(&mut self) {
        let total = self.total();
        if total == 0.0 {
            return;
        }
        for weight in self.weights.values_mut() {
            *weight /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeSchema, EntityRecord};

    fn store(count: usize) -> EntityStore {
        let schema = AttributeSchema::new(vec![Attribute::categorical("club")]).unwrap();
        EntityStore::from_records(
            schema,
            (0..count).map(|i| EntityRecord::new(format!("P{i}")).with("club", "X")),
        )
        .unwrap()
    }

    #[test]
    fn uniform_prior_sums_to_one() {
        let store = store(7);
        let dist = CandidateDistribution::uniform(&store);
        assert_eq!(dist.len(), 7);
        assert!((dist.total() - 1.0).abs() < 1e-12);
        for (_, weight) in dist.iter() {
            assert!((weight - 1.0 / 7.0).abs() < 1e-12);
        }
    }

    #[test]
    fn retain_preserves_relative_ratios() {
        let store = store(3);
        let ids: Vec<EntityId> = store.ids().collect();
        let dist = CandidateDistribution::from_weights([(ids[0], 1.0), (ids[1], 3.0), (ids[2], 4.0)]);
        let filtered = dist.retain(|id| id != ids[2]);
        assert_eq!(filtered.len(), 2);
        assert!((filtered.weight(ids[0]) - 0.25).abs() < 1e-12);
        assert!((filtered.weight(ids[1]) - 0.75).abs() < 1e-12);
        assert_eq!(filtered.weight(ids[2]), 0.0);
        assert!(!filtered.contains(ids[2]));
    }

    #[test]
    fn retain_everything_out_yields_empty() {
        let store = store(2);
        let dist = CandidateDistribution::uniform(&store).retain(|_| false);
        assert!(dist.is_empty());
        assert_eq!(dist.total(), 0.0);
        assert!(dist.leader().is_none());
    }

    #[test]
    fn ranked_breaks_ties_by_store_order() {
        let store = store(3);
        let ids: Vec<EntityId> = store.ids().collect();
        let dist = CandidateDistribution::from_weights([(ids[2], 2.0), (ids[0], 1.0), (ids[1], 2.0)]);
        let order: Vec<EntityId> = dist.ranked().into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
        assert_eq!(dist.leader().map(|(id, _)| id), Some(ids[1]));
    }
}
