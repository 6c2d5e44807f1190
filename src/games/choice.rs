use crate::games::Prefs;
use crate::games::questions::{self, Question};
use crate::progress::merge::{ChoiceOutcome, merge_outcome};
use crate::progress::{ModuleId, ScoredRecord};
use crate::term::{self, Rgb, TerminalGuard, paint};
use crossterm::event::KeyCode;
use std::io;
use tracing::{info, warn};

const POINTS_PER_ANSWER: u32 = 10;
const WRAP_WIDTH: usize = 60;

/// A fixed run through one question bank.
pub struct ChoiceSession
{
    module: ModuleId,
    questions: &'static [Question],
    current: usize,
    selected: Option<usize>,
    score: u32,
    finished: bool,
}

impl ChoiceSession
{
    pub fn new(module: ModuleId, questions: &'static [Question]) -> Self
    {
        Self {
            module,
            questions,
            current: 0,
            selected: None,
            score: 0,
            finished: questions.is_empty(),
        }
    }

    pub fn question(&self) -> Option<&'static Question>
    {
        if self.finished {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Number of the current question, 1-based.
    pub fn position(&self) -> (usize, usize)
    {
        (self.current + 1, self.questions.len())
    }

    pub fn selected(&self) -> Option<usize>
    {
        self.selected
    }

    /// Lock in an answer. `None` when one is already locked in or the
    /// index is not an option.
    pub fn select(&mut self, idx: usize) -> Option<bool>
    {
        if self.selected.is_some() {
            return None;
        }
        let question = self.question()?;
        if idx >= question.options.len() {
            return None;
        }
        let correct = idx == question.correct;
        if correct {
            self.score += POINTS_PER_ANSWER;
        }
        self.selected = Some(idx);
        Some(correct)
    }

    /// Move on; only allowed once the current question is answered.
    pub fn next(&mut self) -> bool
    {
        if self.selected.is_none() || self.finished {
            return false;
        }
        self.selected = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.finished = true;
        }
        true
    }

    pub fn is_finished(&self) -> bool
    {
        self.finished
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn outcome(&self) -> ChoiceOutcome
    {
        ChoiceOutcome {
            module: self.module,
            score: self.score,
            max_score: self.questions.len() as u32 * POINTS_PER_ANSWER,
        }
    }
}

fn title(module: ModuleId) -> &'static str
{
    match module {
        ModuleId::Quiz => "Quiz Corner",
        ModuleId::Science => "Science Zone",
        ModuleId::Reading => "Reading Room",
        _ => "Questions",
    }
}

fn blurb(module: ModuleId) -> &'static str
{
    match module {
        ModuleId::Quiz => "Answer questions about computers, colors, and more!",
        ModuleId::Science => "Explore the world of science with fun questions!",
        ModuleId::Reading => "Read stories and answer questions!",
        _ => "",
    }
}

/// Headline for the result screen.
pub fn verdict(percentage: u32) -> &'static str
{
    if percentage >= 80 {
        "Amazing Work!"
    } else if percentage >= 60 {
        "Great Job!"
    } else {
        "Keep Learning!"
    }
}

/// Quiz, science and reading modules.
pub fn run(
    term: &mut TerminalGuard,
    module: ModuleId,
    record: &ScoredRecord,
    prefs: &Prefs,
    on_update: &mut dyn FnMut(ScoredRecord),
) -> io::Result<()>
{
    let bank = questions::bank(module);
    if bank.is_empty() {
        warn!(%module, "No questions for module");
        return Ok(());
    }

    let mut record = record.clone();
    loop {
        term.draw(&[
            title(module).to_string(),
            String::new(),
            blurb(module).to_string(),
            format!("Best score: {}  Level: {}", record.score, record.level),
            String::new(),
            "Press SPACE to start, ESC to go back.".to_string(),
        ])?;
        let key = term::read_key()?;
        if term::is_back(&key) {
            return Ok(());
        }
        if key.code != KeyCode::Char(' ') {
            continue;
        }

        let mut session = ChoiceSession::new(module, bank);
        if !play(term, &mut session, prefs)? {
            continue;
        }

        let outcome = session.outcome();
        info!(%module, score = outcome.score, max = outcome.max_score, "Question round finished");
        let merged = merge_outcome(&record, &outcome);
        on_update(merged.clone());
        record = merged;

        term.draw(&result_lines(&outcome, &record))?;
        term::wait_for_space()?;
    }
}

/// `false` when the child leaves before the last question.
fn play(term: &mut TerminalGuard, session: &mut ChoiceSession, prefs: &Prefs) -> io::Result<bool>
{
    while let Some(question) = session.question() {
        term.draw(&question_lines(session, question))?;
        let key = term::read_key()?;
        if term::is_back(&key) {
            return Ok(false);
        }
        if session.selected().is_some() {
            if key.code == KeyCode::Enter || key.code == KeyCode::Char(' ') {
                session.next();
            }
            continue;
        }
        if let Some(correct) = term::option_index(&key).and_then(|idx| session.select(idx)) {
            term.chime(prefs.rings_for(!correct))?;
        }
    }
    Ok(session.is_finished())
}

fn question_lines(session: &ChoiceSession, question: &Question) -> Vec<String>
{
    let (number, total) = session.position();
    let mut lines = vec![
        format!(
            "{} - Question {number} of {total}   Score: {}",
            title(session.module),
            session.score()
        ),
        String::new(),
    ];
    if let Some(passage) = question.passage {
        lines.push(paint(passage.title, Rgb::GOLD));
        lines.extend(wrap(passage.text, WRAP_WIDTH));
        lines.push(String::new());
    }
    lines.push(question.prompt.to_string());
    lines.push(String::new());

    for (idx, option) in question.options.iter().enumerate() {
        let label = format!("  {}. {}", idx + 1, option);
        let line = match session.selected() {
            Some(_) if idx == question.correct => paint(&label, Rgb::GREEN),
            Some(chosen) if chosen == idx => paint(&label, Rgb::RED),
            _ => label,
        };
        lines.push(line);
    }

    lines.push(String::new());
    match session.selected() {
        Some(chosen) => {
            let verdict = if chosen == question.correct { "Correct!" } else { "Not quite." };
            lines.push(format!("{verdict} {}", question.explanation));
            lines.push("Press ENTER for the next question.".to_string());
        }
        None => lines.push("Press the number of your answer.".to_string()),
    }
    lines
}

fn result_lines(outcome: &ChoiceOutcome, record: &ScoredRecord) -> Vec<String>
{
    let percentage = outcome.percentage();
    vec![
        verdict(percentage).to_string(),
        String::new(),
        format!("Score: {} / {}  ({}%)", outcome.score, outcome.max_score, percentage),
        format!("Best score: {}  Level: {}", record.score, record.level),
        format!("Badges: {}", record.badges.len()),
        String::new(),
        "Press SPACE to continue.".to_string(),
    ]
}

/// Greedy word wrap on spaces.
fn wrap(text: &str, width: usize) -> Vec<String>
{
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::games::questions::{QUIZ, SCIENCE, STORIES};
    use crate::progress::badges::Badge;
    use crate::progress::merge::SessionOutcome;

    fn answer_all(session: &mut ChoiceSession, correct_count: usize)
    {
        let mut answered = 0;
        while let Some(question) = session.question() {
            let pick = if answered < correct_count {
                question.correct
            } else {
                (question.correct + 1) % question.options.len()
            };
            session.select(pick);
            session.next();
            answered += 1;
        }
    }

    #[test]
    fn perfect_quiz_earns_both_badges()
    {
        let mut session = ChoiceSession::new(ModuleId::Quiz, QUIZ);
        answer_all(&mut session, 8);
        let outcome = session.outcome();
        assert_eq!(outcome.score, 80);
        assert_eq!(outcome.max_score, 80);
        let badges = outcome.earned_badges();
        assert!(badges.contains(&Badge::QuizMaster));
        assert!(badges.contains(&Badge::PerfectScore));
    }

    #[test]
    fn half_marks_are_not_enough_for_quiz_master()
    {
        let mut session = ChoiceSession::new(ModuleId::Quiz, QUIZ);
        answer_all(&mut session, 4);
        let outcome = session.outcome();
        assert_eq!(outcome.score, 40);
        assert_eq!(outcome.percentage(), 50);
        assert!(outcome.earned_badges().is_empty());
    }

    #[test]
    fn answer_is_locked_once_chosen()
    {
        let mut session = ChoiceSession::new(ModuleId::Science, SCIENCE);
        assert_eq!(session.select(0), Some(true));
        assert_eq!(session.select(1), None);
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn cannot_skip_unanswered_question()
    {
        let mut session = ChoiceSession::new(ModuleId::Reading, STORIES);
        assert!(!session.next());
        assert_eq!(session.position(), (1, 2));
        assert_eq!(session.select(7), None);
    }

    #[test]
    fn reading_finishes_after_both_stories()
    {
        let mut session = ChoiceSession::new(ModuleId::Reading, STORIES);
        answer_all(&mut session, 1);
        assert!(session.is_finished());
        assert!(session.question().is_none());
        assert_eq!(session.outcome().earned_badges(), vec![Badge::ReadingStar]);
    }

    #[test]
    fn verdict_thresholds()
    {
        assert_eq!(verdict(100), "Amazing Work!");
        assert_eq!(verdict(80), "Amazing Work!");
        assert_eq!(verdict(63), "Great Job!");
        assert_eq!(verdict(50), "Keep Learning!");
    }

    #[test]
    fn wrap_respects_width()
    {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
    }
}
