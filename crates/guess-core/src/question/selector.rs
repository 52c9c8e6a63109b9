use super::gain::{information_gain, partition};
use crate::belief::CandidateDistribution;
use crate::model::{AttrId, AttributeKind, EntityStore};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{Level, event};

/// Gains closer than this are treated as equal; the earlier schema attribute wins.
pub const GAIN_TOLERANCE: f64 = 1e-12;

/// Next question to put to the answering party.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub attribute: AttrId,
    pub name: String,
    pub kind: AttributeKind,
    pub text: String,
    /// `yes`/`no` for boolean attributes, otherwise the sorted distinct values
    /// held by the remaining candidates.
    pub options: Vec<String>,
    pub gain: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no askable attributes remain")]
    AttributesExhausted,
}

/// Information gain of every attribute not yet asked, in schema order.
pub fn rank_attributes(
    store: &EntityStore,
    dist: &CandidateDistribution,
    asked: &BTreeSet<AttrId>,
) -> Vec<(AttrId, f64)> {
    store
        .schema()
        .ids()
        .filter(|id| !asked.contains(id))
        .map(|id| (id, information_gain(store, dist, id)))
        .collect()
}

/// Picks the attribute with maximal information gain among those not yet asked.
pub fn select_question(
    store: &EntityStore,
    dist: &CandidateDistribution,
    asked: &BTreeSet<AttrId>,
) -> Result<Question, SelectError> {
    let ranked = rank_attributes(store, dist, asked);

    let mut best: Option<(AttrId, f64)> = None;
    for (id, gain) in ranked.iter().copied() {
        match best {
            Some((_, best_gain)) if gain <= best_gain + GAIN_TOLERANCE => {}
            _ => best = Some((id, gain)),
        }
    }
    let (attribute_id, gain) = best.ok_or(SelectError::AttributesExhausted)?;

    let attribute = store.schema().get(attribute_id);
    event!(
        target: "guess_core::select",
        Level::DEBUG,
        chosen = %attribute.name,
        gain,
        candidates = ranked.len(),
        remaining = dist.len(),
    );

    let options = match attribute.kind {
        AttributeKind::Boolean => vec!["yes".to_string(), "no".to_string()],
        AttributeKind::Categorical => partition(store, dist, attribute_id)
            .groups()
            .map(|group| group.value.to_string())
            .collect(),
    };

    Ok(Question {
        attribute: attribute_id,
        name: attribute.name.clone(),
        kind: attribute.kind,
        text: attribute.question_text(),
        options,
        gain,
    })
}
