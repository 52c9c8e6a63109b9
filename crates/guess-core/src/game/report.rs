use super::termination::Termination;
use crate::belief::CandidateDistribution;
use crate::model::EntityStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub name: String,
    pub probability: f64,
}

/// What the session hands back to the shell once a game stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: Termination,
    pub questions_asked: usize,
    /// Remaining candidates, most probable first.
    pub candidates: Vec<RankedCandidate>,
}

impl GameReport {
    pub fn new(
        store: &EntityStore,
        outcome: Termination,
        questions_asked: usize,
        dist: &CandidateDistribution,
    ) -> Self {
        let candidates = dist
            .ranked()
            .into_iter()
            .map(|(id, probability)| RankedCandidate {
                name: store.entity(id).name().to_string(),
                probability,
            })
            .collect();
        Self {
            outcome,
            questions_asked,
            candidates,
        }
    }

    pub fn best(&self) -> Option<&RankedCandidate> {
        self.candidates.first()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attribute, AttributeSchema, EntityRecord};

    #[test]
    fn report_lists_candidates_by_probability() {
        let schema = AttributeSchema::new(vec![Attribute::categorical("club")]).unwrap();
        let store = EntityStore::from_records(
            schema,
            vec![
                EntityRecord::new("A").with("club", "X"),
                EntityRecord::new("B").with("club", "X"),
                EntityRecord::new("C").with("club", "X"),
            ],
        )
        .unwrap();
        let ids: Vec<_> = store.ids().collect();
        let dist = CandidateDistribution::from_weights([(ids[0], 1.0), (ids[2], 3.0)]);
        let report = GameReport::new(&store, Termination::Exhausted, 20, &dist);

        let names: Vec<&str> = report.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["C", "A"]);
        assert_eq!(report.best().map(|c| c.name.as_str()), Some("C"));
        assert!((report.candidates[0].probability - 0.75).abs() < 1e-12);
    }

    #[test]
    fn report_serializes_outcome_tag() {
        let report = GameReport {
            outcome: Termination::NoCandidates,
            questions_asked: 2,
            candidates: Vec::new(),
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"no_candidates\""));
        assert_eq!(GameReport::from_json(&json).unwrap(), report);
    }
}
