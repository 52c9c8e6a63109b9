use crate::belief::{CandidateDistribution, InvalidAnswer, apply_answer, normalize_answer};
use crate::model::{AttrId, AttrValue, EntityStore};
use std::collections::BTreeSet;

/// Per-game mutable state, owned by a single [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    distribution: CandidateDistribution,
    asked: BTreeSet<AttrId>,
    questions_asked: usize,
}

impl GameState {
    /// Uniform prior over the whole store with nothing asked yet.
    pub fn new(store: &EntityStore) -> Self {
        Self {
            distribution: CandidateDistribution::uniform(store),
            asked: BTreeSet::new(),
            questions_asked: 0,
        }
    }

    pub fn distribution(&self) -> &CandidateDistribution {
        &self.distribution
    }

    pub fn asked(&self) -> &BTreeSet<AttrId> {
        &self.asked
    }

    pub fn questions_asked(&self) -> usize {
        self.questions_asked
    }

    /// Returns the state after answering `raw` to `attribute`.
    ///
    /// The attribute is marked as asked even when no candidate survives. An
    /// invalid answer leaves `self` untouched and yields no new state.
    pub fn answered(
        &self,
        store: &EntityStore,
        attribute: AttrId,
        raw: &str,
    ) -> Result<(GameState, AttrValue), InvalidAnswer> {
        let kind = store.schema().get(attribute).kind;
        let value = normalize_answer(kind, raw)?;
        let mut asked = self.asked.clone();
        asked.insert(attribute);
        let next = GameState {
            distribution: apply_answer(store, &self.distribution, attribute, &value),
            asked,
            questions_asked: self.questions_asked,
        };
        Ok((next, value))
    }

    pub(crate) fn count_question(&mut self) {
        self.questions_asked += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeSchema, EntityRecord};

    fn store() -> EntityStore {
        let schema = AttributeSchema::new(vec![
            Attribute::categorical("club"),
            Attribute::boolean("retired"),
        ])
        .unwrap();
        EntityStore::from_records(
            schema,
            vec![
                EntityRecord::new("A").with("club", "X").with("retired", "yes"),
                EntityRecord::new("B").with("club", "Y").with("retired", "no"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn answering_marks_attribute_even_when_empty() {
        let store = store();
        let state = GameState::new(&store);
        let club = store.schema().find("club").unwrap();
        let (next, value) = state.answered(&store, club, "Z").unwrap();
        assert_eq!(value, AttrValue::text("Z"));
        assert!(next.distribution().is_empty());
        assert!(next.asked().contains(&club));
        assert_eq!(next.questions_asked(), 0);
    }

    #[test]
    fn invalid_answer_produces_no_state() {
        let store = store();
        let state = GameState::new(&store);
        let retired = store.schema().find("retired").unwrap();
        let err = state.answered(&store, retired, "dunno").unwrap_err();
        assert!(matches!(err, InvalidAnswer::NotYesNo { .. }));
        assert!(state.asked().is_empty());
        assert_eq!(state.distribution().len(), 2);
    }
}
