use super::CandidateDistribution;
use crate::model::{AttrId, AttrValue, EntityStore};

/// Keeps the candidates whose value for `attribute` matches `answer`, renormalized.
pub fn apply_answer(
    store: &EntityStore,
    dist: &CandidateDistribution,
    attribute: AttrId,
    answer: &AttrValue,
) -> CandidateDistribution {
    let expected = answer.key();
    dist.retain(|id| store.value(id, attribute).key() == expected)
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
                EntityRecord::new("A").with("club", "X").with("retired", "true"),
                EntityRecord::new("B").with("club", "X").with("retired", "false"),
                EntityRecord::new("C").with("club", "Y").with("retired", "false"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn survivors_match_answer_and_sum_to_one() {
        let store = store();
        let club = store.schema().find("club").unwrap();
        let dist = CandidateDistribution::uniform(&store);
        let next = apply_answer(&store, &dist, club, &AttrValue::text(" x "));

        assert_eq!(next.len(), 2);
        for (id, _) in next.iter() {
            assert!(store.value(id, club).matches(&AttrValue::text("X")));
        }
        assert!((next.total() - 1.0).abs() < 1e-12);
        assert!((next.weight(store.find("A").unwrap()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn boolean_answers_filter_flags() {
        let store = store();
        let retired = store.schema().find("retired").unwrap();
        let dist = CandidateDistribution::uniform(&store);
        let next = apply_answer(&store, &dist, retired, &AttrValue::Flag(true));
        assert_eq!(next.ids().collect::<Vec<_>>(), vec![store.find("A").unwrap()]);
        assert_eq!(next.weight(store.find("A").unwrap()), 1.0);
    }

    #[test]
    fn reapplying_same_answer_is_idempotent() {
        let store = store();
        let club = store.schema().find("club").unwrap();
        let answer = AttrValue::text("X");
        let once = apply_answer(&store, &CandidateDistribution::uniform(&store), club, &answer);
        let twice = apply_answer(&store, &once, club, &answer);
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_value_empties_distribution() {
        let store = store();
        let club = store.schema().find("club").unwrap();
        let next = apply_answer(
            &store,
            &CandidateDistribution::uniform(&store),
            club,
            &AttrValue::text("Z"),
        );
        assert!(next.is_empty());
    }
}
