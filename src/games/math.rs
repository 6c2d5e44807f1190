use crate::games::Prefs;
use crate::games::timer::Deadline;
use crate::progress::ScoredRecord;
use crate::progress::merge::{MathOutcome, merge_outcome};
use crate::term::{self, LineEvent, LineInput, Rgb, TerminalGuard, paint};
use crossterm::event::KeyCode;
use rand::Rng;
use rand::seq::SliceRandom;
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

const START_LIVES: u8 = 3;
const BASE_POINTS: u32 = 10;
const STREAK_BONUS: u32 = 2;
const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);
const MAX_ANSWER_LEN: usize = 4;

const SHAPES: &[&str] = &["●", "■", "▲", "◆", "★", "♥"];
const THINGS: &[(&str, &str)] = &[
    ("apples", "o"),
    ("cats", "m"),
    ("stars", "*"),
    ("flowers", "@"),
    ("cars", "="),
    ("balloons", "O"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode
{
    Addition,
    Subtraction,
    Shapes,
    Counting,
}

impl MathMode
{
    pub const ALL: [MathMode; 4] = [
        MathMode::Addition,
        MathMode::Subtraction,
        MathMode::Shapes,
        MathMode::Counting,
    ];

    pub fn title(self) -> &'static str
    {
        match self {
            MathMode::Addition => "Addition",
            MathMode::Subtraction => "Subtraction",
            MathMode::Shapes => "Shapes",
            MathMode::Counting => "Counting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem
{
    pub question: String,
    pub answer: i32,
}

pub fn generate(mode: MathMode, rng: &mut impl Rng) -> Problem
{
    match mode {
        MathMode::Addition => {
            let a = rng.gen_range(1..=10);
            let b = rng.gen_range(1..=10);
            Problem {
                question: format!("{a} + {b} = ?"),
                answer: a + b,
            }
        }
        MathMode::Subtraction => {
            let a = rng.gen_range(5..=14);
            let b = rng.gen_range(1..=a);
            Problem {
                question: format!("{a} - {b} = ?"),
                answer: a - b,
            }
        }
        MathMode::Shapes => {
            let shape = SHAPES.choose(rng).unwrap_or(&"●");
            let count = rng.gen_range(3..=7);
            let shapes = shape.repeat(count as usize);
            Problem {
                question: format!("How many {shape} do you see?\r\n{shapes}"),
                answer: count,
            }
        }
        MathMode::Counting => {
            let (name, symbol) = THINGS.choose(rng).unwrap_or(&("stars", "*"));
            let count = rng.gen_range(2..=9);
            Problem {
                question: format!("Count the {name}:\r\n{}", symbol.repeat(count as usize)),
                answer: count,
            }
        }
    }
}

/// Parse a typed answer. Anything that is not a whole number is `None`.
pub fn parse_answer(input: &str) -> Option<i32>
{
    input.trim().parse::<i32>().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback
{
    Correct,
    Incorrect,
}

pub struct MathSession
{
    mode: MathMode,
    problem: Problem,
    score: u32,
    streak: u32,
    best_streak: u32,
    lives: u8,
    answered: u32,
    feedback: Option<Feedback>,
    advance_at: Option<Deadline>,
    over: bool,
}

impl MathSession
{
    pub fn new(mode: MathMode, rng: &mut impl Rng) -> Self
    {
        Self {
            mode,
            problem: generate(mode, rng),
            score: 0,
            streak: 0,
            best_streak: 0,
            lives: START_LIVES,
            answered: 0,
            feedback: None,
            advance_at: None,
            over: false,
        }
    }

    /// Check an answer. Ignored while feedback for the last one is showing.
    pub fn submit(&mut self, input: &str, now: Instant) -> Option<Feedback>
    {
        if self.over || self.feedback.is_some() {
            return None;
        }
        let feedback = if parse_answer(input) == Some(self.problem.answer) {
            self.score += BASE_POINTS + self.streak * STREAK_BONUS;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            Feedback::Correct
        } else {
            self.lives = self.lives.saturating_sub(1);
            self.streak = 0;
            Feedback::Incorrect
        };
        self.answered += 1;
        self.feedback = Some(feedback);
        self.advance_at = Some(Deadline::after(now, FEEDBACK_DELAY));
        Some(feedback)
    }

    /// After the feedback delay: next problem, or game over without lives.
    pub fn tick(&mut self, rng: &mut impl Rng, now: Instant)
    {
        let Some(deadline) = self.advance_at else {
            return;
        };
        if !deadline.is_due(now) {
            return;
        }
        self.advance_at = None;
        self.feedback = None;
        if self.lives == 0 {
            self.over = true;
        } else {
            self.problem = generate(self.mode, rng);
        }
    }

    pub fn end(&mut self)
    {
        self.advance_at = None;
        self.over = true;
    }

    pub fn is_over(&self) -> bool
    {
        self.over
    }

    pub fn problem(&self) -> &Problem
    {
        &self.problem
    }

    pub fn feedback(&self) -> Option<Feedback>
    {
        self.feedback
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn streak(&self) -> u32
    {
        self.streak
    }

    pub fn lives(&self) -> u8
    {
        self.lives
    }

    pub fn has_pending_timer(&self) -> bool
    {
        self.advance_at.is_some()
    }

    pub fn outcome(&self) -> MathOutcome
    {
        MathOutcome {
            score: self.score,
            best_streak: self.best_streak,
        }
    }
}

/// Math module: pick a mode, play until out of lives, repeat.
pub fn run(
    term: &mut TerminalGuard,
    record: &ScoredRecord,
    prefs: &Prefs,
    on_update: &mut dyn FnMut(ScoredRecord),
) -> io::Result<()>
{
    let mut record = record.clone();
    loop {
        term.draw(&mode_menu_lines(&record))?;
        let key = term::read_key()?;
        if term::is_back(&key) {
            return Ok(());
        }
        let Some(mode) = term::option_index(&key).and_then(|idx| MathMode::ALL.get(idx).copied())
        else {
            continue;
        };

        let Some(session) = play(term, mode, prefs)? else {
            continue;
        };
        let outcome = session.outcome();
        info!(mode = mode.title(), score = outcome.score, "Math game finished");
        let merged = merge_outcome(&record, &outcome);
        on_update(merged.clone());
        record = merged;

        term.draw(&[
            "Game Over!".to_string(),
            String::new(),
            format!("Score: {}", outcome.score),
            format!("Best streak: {}", outcome.best_streak),
            format!("Level: {}  Best score: {}", record.level, record.score),
            String::new(),
            "Press SPACE to continue.".to_string(),
        ])?;
        term::wait_for_space()?;
    }
}

/// `None` when the child backs out before answering anything.
fn play(term: &mut TerminalGuard, mode: MathMode, prefs: &Prefs) -> io::Result<Option<MathSession>>
{
    let mut rng = rand::thread_rng();
    let mut session = MathSession::new(mode, &mut rng);
    let mut input = LineInput::new(MAX_ANSWER_LEN);

    while !session.is_over() {
        term.draw(&play_lines(&session, &input))?;
        session.tick(&mut rng, Instant::now());

        let Some(key) = term::poll_key(Duration::from_millis(50))? else {
            continue;
        };
        if session.feedback().is_some() && !term::is_back(&key) {
            continue;
        }
        match input.handle(&key) {
            LineEvent::Cancelled => {
                if session.answered == 0 {
                    return Ok(None);
                }
                session.end();
            }
            LineEvent::Submitted(answer) => {
                if answer.trim().is_empty() && key.code == KeyCode::Enter {
                    continue;
                }
                if let Some(feedback) = session.submit(&answer, Instant::now()) {
                    term.chime(prefs.rings_for(feedback == Feedback::Incorrect))?;
                }
            }
            LineEvent::Edited | LineEvent::Ignored => {}
        }
    }

    Ok(Some(session))
}

fn mode_menu_lines(record: &ScoredRecord) -> Vec<String>
{
    let mut lines = vec![
        "Math Playground".to_string(),
        String::new(),
        format!("Level: {}  Best score: {}", record.level, record.score),
        String::new(),
        "Choose a game:".to_string(),
    ];
    for (idx, mode) in MathMode::ALL.iter().enumerate() {
        lines.push(format!("  {}. {}", idx + 1, mode.title()));
    }
    lines.push(String::new());
    lines.push("Press a number, ESC to go back.".to_string());
    lines
}

fn play_lines(session: &MathSession, input: &LineInput) -> Vec<String>
{
    let mut lines = vec![
        format!("Math Playground - {}", session.mode.title()),
        format!(
            "Score: {}  Streak: {}  Lives: {}",
            session.score(),
            session.streak(),
            "*".repeat(session.lives() as usize)
        ),
        String::new(),
    ];
    lines.extend(session.problem().question.split("\r\n").map(str::to_string));
    lines.push(String::new());
    lines.push(format!("Answer: {}", input.display()));
    lines.push(match session.feedback() {
        Some(Feedback::Correct) => paint("Correct! Great job!", Rgb::GREEN),
        Some(Feedback::Incorrect) => paint(
            &format!("Oops! The answer was {}.", session.problem().answer),
            Rgb::RED,
        ),
        None => "Type your answer and press ENTER. ESC to stop.".to_string(),
    });
    lines
}
