use guess_core::dataset::{DEFAULT_ID_COLUMN, load_csv};
use guess_core::game::{AnswerSource, EngineConfig, Session, Termination};
use guess_core::model::{AttributeSchema, EntityId, EntityStore};
use guess_core::question::Question;
use std::convert::Infallible;
use std::path::PathBuf;

fn players() -> EntityStore {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/players.csv");
    load_csv(&path, AttributeSchema::players(), DEFAULT_ID_COLUMN).expect("bundled dataset loads")
}

/// Answers truthfully on behalf of `secret`.
struct Oracle<'a> {
    store: &'a EntityStore,
    secret: EntityId,
}

impl AnswerSource for Oracle<'_> {
    type Error = Infallible;

    fn answer(&mut self, question: &Question) -> Result<String, Self::Error> {
        Ok(self.store.value(self.secret, question.attribute).to_string())
    }
}

#[test]
fn bundled_dataset_loads_every_row() {
    let store = players();
    assert_eq!(store.len(), 30);
    assert!(store.find("Zinedine Zidane").is_some());
}

#[test]
fn truthful_answers_identify_every_player() {
    let store = players();
    for secret in store.ids() {
        let mut session = Session::new(&store, EngineConfig::default()).expect("session");
        let mut oracle = Oracle {
            store: &store,
            secret,
        };
        let Ok(report) = session.play(&mut oracle);
        let name = store.entity(secret).name();
        assert_eq!(report.outcome, Termination::Solved, "secret {name}");
        assert_eq!(report.best().map(|c| c.name.as_str()), Some(name));
        assert!(report.questions_asked <= store.schema().len());
    }
}

#[test]
fn categorical_options_come_from_remaining_candidates() {
    let store = players();
    let mut session = Session::new(&store, EngineConfig::default()).expect("session");
    let guess_core::game::Turn::Ask(first) = session.next_turn() else {
        panic!("first turn should ask");
    };
    // Nationality splits the bundled roster most evenly.
    assert_eq!(first.name, "nationality");
    let mut sorted = first.options.clone();
    sorted.sort_by_key(|option| option.to_lowercase());
    assert_eq!(first.options, sorted);
    assert!(first.options.iter().any(|option| option == "Ivory Coast"));
    assert!(first.gain > 0.0);
}
