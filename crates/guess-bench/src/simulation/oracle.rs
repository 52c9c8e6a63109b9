use std::convert::Infallible;

use guess_core::belief::InvalidAnswer;
use guess_core::game::AnswerSource;
use guess_core::model::{AttrValue, EntityId, EntityStore};
use guess_core::question::Question;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{Level, event};

/// Answers on behalf of a secret entity, lying with probability `noise`.
///
/// A lie is always a valid answer: the opposite flag for yes/no questions, or
/// another offered value for categorical ones. When a categorical question
/// offers nothing else the oracle tells the truth.
pub struct OracleAnswerer<'a> {
    store: &'a EntityStore,
    secret: EntityId,
    noise: f64,
    rng: StdRng,
    lies: usize,
}

impl<'a> OracleAnswerer<'a> {
    pub fn new(store: &'a EntityStore, secret: EntityId, noise: f64, seed: u64) -> Self {
        Self {
            store,
            secret,
            noise,
            rng: StdRng::seed_from_u64(seed),
            lies: 0,
        }
    }

    pub fn lies(&self) -> usize {
        self.lies
    }

    fn truth(&self, question: &Question) -> &'a AttrValue {
        self.store.value(self.secret, question.attribute)
    }

    fn lie(&mut self, question: &Question) -> Option<String> {
        let truth = self.truth(question);
        if let Some(flag) = truth.as_flag() {
            return Some(AttrValue::Flag(!flag).to_string());
        }
        let alternatives: Vec<&String> = question
            .options
            .iter()
            .filter(|option| !AttrValue::text(option.as_str()).matches(truth))
            .collect();
        alternatives
            .choose(&mut self.rng)
            .map(|option| option.to_string())
    }
}

impl AnswerSource for OracleAnswerer<'_> {
    type Error = Infallible;

    fn answer(&mut self, question: &Question) -> Result<String, Self::Error> {
        if self.noise > 0.0 && self.rng.gen_bool(self.noise) {
            if let Some(answer) = self.lie(question) {
                self.lies += 1;
                return Ok(answer);
            }
        }
        Ok(self.truth(question).to_string())
    }

    fn rejected(&mut self, question: &Question, error: &InvalidAnswer) {
        event!(
            target: "guess_bench::oracle",
            Level::WARN,
            attribute = %question.name,
            error = %error,
            "oracle answer rejected"
        );
    }
}
