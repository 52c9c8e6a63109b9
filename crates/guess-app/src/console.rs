use guess_core::AppInfo;
use guess_core::game::{GameReport, Session, SessionError, Termination, Turn};
use guess_core::model::{AttributeKind, EntityStore};
use guess_core::question::Question;
use std::io::{self, BufRead, Write};

const OPTION_PREVIEW: usize = 10;
const CANDIDATE_PREVIEW: usize = 5;
const DETAIL_ATTRIBUTES: usize = 3;
const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

/// How an interactive game ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEnd {
    Finished(GameReport),
    /// The player typed `quit` or closed the input.
    Abandoned(GameReport),
}

impl GameEnd {
    pub fn report(&self) -> &GameReport {
        match self {
            GameEnd::Finished(report) | GameEnd::Abandoned(report) => report,
        }
    }
}

/// Line-oriented shell around a [`Session`]: prints questions, reads answers and
/// re-prompts on invalid input.
pub struct ConsoleGame<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleGame<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn welcome(&mut self, store: &EntityStore) -> io::Result<()> {
        let rule = "=".repeat(60);
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "Welcome to the {}!", AppInfo::tagline())?;
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "Loaded {} candidate(s).", store.len())?;
        writeln!(
            self.output,
            "Answer 'yes' or 'no' for yes/no questions, or type a value for the others."
        )?;
        writeln!(self.output, "Type 'quit' to exit at any time.")?;
        Ok(())
    }

    pub fn play(&mut self, session: &mut Session<'_>) -> io::Result<GameEnd> {
        let store = session.store();
        loop {
            let question = match session.next_turn() {
                Turn::Finished(report) => {
                    self.render_outcome(&report)?;
                    return Ok(GameEnd::Finished(report));
                }
                Turn::Ask(question) => question,
            };

            writeln!(self.output)?;
            writeln!(self.output, "{}", "=".repeat(30))?;
            writeln!(
                self.output,
                "Question {} ({} candidate(s) remaining)",
                session.state().questions_asked() + 1,
                session.state().distribution().len()
            )?;
            self.render_question(&question)?;

            loop {
                write!(self.output, "Answer: ")?;
                self.output.flush()?;
                let Some(line) = self.read_line()? else {
                    return self.abandon(session);
                };
                if QUIT_WORDS.contains(&line.trim().to_lowercase().as_str()) {
                    return self.abandon(session);
                }

                match session.submit(&line) {
                    Ok(_) => break,
                    Err(SessionError::InvalidAnswer(err)) => {
                        writeln!(self.output, "Invalid answer: {err}.")?;
                        if question.kind == AttributeKind::Boolean {
                            writeln!(self.output, "Please answer yes or no.")?;
                        }
                    }
                    Err(err) => return Err(io::Error::other(err)),
                }
            }

            self.render_candidates(store, &session.report())?;
        }
    }

    fn abandon(&mut self, session: &Session<'_>) -> io::Result<GameEnd> {
        writeln!(self.output)?;
        writeln!(self.output, "Game abandoned.")?;
        Ok(GameEnd::Abandoned(session.report()))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn render_question(&mut self, question: &Question) -> io::Result<()> {
        writeln!(self.output, "{}", question.text)?;
        match question.kind {
            AttributeKind::Boolean => writeln!(self.output, "Options: yes / no")?,
            AttributeKind::Categorical => {
                let preview: Vec<&str> = question
                    .options
                    .iter()
                    .take(OPTION_PREVIEW)
                    .map(String::as_str)
                    .collect();
                writeln!(self.output, "Options: {}", preview.join(", "))?;
                if question.options.len() > OPTION_PREVIEW {
                    writeln!(
                        self.output,
                        "... and {} more option(s)",
                        question.options.len() - OPTION_PREVIEW
                    )?;
                }
            }
        }
        Ok(())
    }

    fn render_candidates(&mut self, store: &EntityStore, report: &GameReport) -> io::Result<()> {
        if report.candidates.is_empty() {
            writeln!(self.output, "No matching candidates.")?;
            return Ok(());
        }

        writeln!(self.output, "Possible candidates:")?;
        for (rank, candidate) in report.candidates.iter().take(CANDIDATE_PREVIEW).enumerate() {
            writeln!(
                self.output,
                "{}. {}{}",
                rank + 1,
                candidate.name,
                describe(store, &candidate.name)
            )?;
            writeln!(
                self.output,
                "   Probability: {:.1}%",
                candidate.probability * 100.0
            )?;
        }
        if report.candidates.len() > CANDIDATE_PREVIEW {
            writeln!(
                self.output,
                "... and {} more candidate(s)",
                report.candidates.len() - CANDIDATE_PREVIEW
            )?;
        }
        Ok(())
    }

    fn render_outcome(&mut self, report: &GameReport) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", "=".repeat(60))?;
        match (report.outcome, report.best()) {
            (Termination::Solved, Some(best)) => {
                writeln!(
                    self.output,
                    "I'm {:.1}% confident: you are thinking of {}.",
                    best.probability * 100.0,
                    best.name
                )?;
            }
            (Termination::Exhausted, Some(best)) => {
                writeln!(
                    self.output,
                    "Ran out of questions after {} question(s).",
                    report.questions_asked
                )?;
                writeln!(
                    self.output,
                    "Best guess: {} ({:.1}%)",
                    best.name,
                    best.probability * 100.0
                )?;
            }
            _ => writeln!(self.output, "No matching candidate found.")?,
        }
        writeln!(self.output, "{}", "=".repeat(60))?;
        Ok(())
    }
}

/// Short ` (club, position, ...)` suffix built from the first categorical attributes.
fn describe(store: &EntityStore, name: &str) -> String {
    let Some(id) = store.find(name) else {
        return String::new();
    };
    let details: Vec<String> = store
        .schema()
        .iter()
        .filter(|(_, attribute)| attribute.kind == AttributeKind::Categorical)
        .take(DETAIL_ATTRIBUTES)
        .map(|(attr, _)| store.value(id, attr).to_string())
        .collect();
    if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guess_core::game::EngineConfig;
    use guess_core::model::{Attribute, AttributeSchema, EntityRecord};
    use std::io::Cursor;

    fn store() -> EntityStore {
        let schema = AttributeSchema::new(vec![
            Attribute::categorical("club").with_prompt("Which club?"),
            Attribute::boolean("retired"),
        ])
        .unwrap();
        EntityStore::from_records(
            schema,
            vec![
                EntityRecord::new("A").with("club", "X").with("retired", "no"),
                EntityRecord::new("B").with("club", "X").with("retired", "yes"),
                EntityRecord::new("C").with("club", "Y").with("retired", "no"),
            ],
        )
        .unwrap()
    }

    fn run(input: &str) -> (GameEnd, String) {
        let store = store();
        let mut session = Session::new(&store, EngineConfig::default()).unwrap();
        let mut game = ConsoleGame::new(Cursor::new(input.to_string()), Vec::new());
        let end = game.play(&mut session).unwrap();
        let output = String::from_utf8(game.into_output()).unwrap();
        (end, output)
    }

    #[test]
    fn solves_after_two_answers() {
        let (end, output) = run("x\nyes\n");
        let GameEnd::Finished(report) = end else {
            panic!("game should finish: {output}");
        };
        assert_eq!(report.outcome, Termination::Solved);
        assert_eq!(report.best().unwrap().name, "B");
        assert!(output.contains("Which club?"));
        assert!(output.contains("Options: X, Y"));
        assert!(output.contains("you are thinking of B"));
    }

    #[test]
    fn reprompts_on_invalid_yes_no() {
        let (end, output) = run("X\nperhaps\nno\n");
        assert_eq!(end.report().best().unwrap().name, "A");
        assert!(output.contains("Invalid answer: 'perhaps' is not a yes/no answer."));
        assert_eq!(end.report().questions_asked, 2);
    }

    #[test]
    fn quit_abandons_game() {
        let (end, output) = run("QUIT\n");
        assert!(matches!(end, GameEnd::Abandoned(_)));
        assert_eq!(end.report().outcome, Termination::Continue);
        assert!(output.contains("Game abandoned."));
    }

    #[test]
    fn closed_input_abandons_game() {
        let (end, _) = run("");
        assert!(matches!(end, GameEnd::Abandoned(_)));
    }

    #[test]
    fn unknown_value_reports_no_match() {
        let (end, output) = run("Z\n");
        assert_eq!(end.report().outcome, Termination::NoCandidates);
        assert!(output.contains("No matching candidate found."));
    }
}
