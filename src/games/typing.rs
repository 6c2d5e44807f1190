use crate::games::words::WORDS;
use crate::games::{Prefs, speed_scale};
use crate::progress::ScoredRecord;
use crate::progress::merge::{TypingOutcome, merge_outcome};
use crate::term::{self, Rgb, TerminalGuard, ansi_color, lerp, lerp_color};
use crossterm::event::KeyCode;
use crossterm::terminal;
use rand::Rng;
use rand::seq::SliceRandom;
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

const ROUND_DURATION: Duration = Duration::from_secs(60);
const START_LIVES: u8 = 3;
const MAX_WORDS: usize = 5;
const TICK_MS: u64 = 33;
const SPAWN_INTERVAL: Duration = Duration::from_millis(1800);
const POINTS_PER_LETTER: u32 = 10;

#[derive(Clone, Debug)]
struct Word
{
    text: String,
    spawned_at: Instant,
    ttl: Duration,
    column: usize,
}

impl Word
{
    /// 0.0 at the top of the field, 1.0 on the floor.
    fn fall(&self, now: Instant) -> f32
    {
        let age = now.saturating_duration_since(self.spawned_at);
        if self.ttl.as_secs_f32() <= 0.0 {
            1.0
        } else {
            (age.as_secs_f32() / self.ttl.as_secs_f32()).clamp(0.0, 1.0)
        }
    }
}

/// One round of catching falling words.
pub struct TypingSession
{
    words: Vec<Word>,
    buffer: String,
    score: u32,
    lives: u8,
    words_typed: u32,
    words_missed: u32,
    keystrokes: u32,
    level: u32,
    speed_scale: f32,
    started: Instant,
    next_spawn: Instant,
    over: bool,
}

impl TypingSession
{
    pub fn new(level: u32, speed: f32, now: Instant) -> Self
    {
        Self {
            words: Vec::new(),
            buffer: String::new(),
            score: 0,
            lives: START_LIVES,
            words_typed: 0,
            words_missed: 0,
            keystrokes: 0,
            level: level.max(1),
            speed_scale: speed_scale(speed),
            started: now,
            next_spawn: now,
            over: false,
        }
    }

    pub fn type_char(&mut self, ch: char)
    {
        if self.over || !ch.is_ascii_alphabetic() {
            return;
        }
        self.keystrokes += 1;
        self.buffer.push(ch.to_ascii_lowercase());
        self.catch_matching_word();
    }

    pub fn backspace(&mut self)
    {
        self.buffer.pop();
    }

    pub fn clear_input(&mut self)
    {
        self.buffer.clear();
    }

    fn catch_matching_word(&mut self)
    {
        if let Some(index) = self.words.iter().position(|word| word.text == self.buffer) {
            let word = self.words.swap_remove(index);
            self.score += word.text.len() as u32 * POINTS_PER_LETTER;
            self.words_typed += 1;
            self.buffer.clear();
        }
    }

    /// Advance the simulation: drop landed words, spawn new ones, end the round.
    pub fn tick(&mut self, rng: &mut impl Rng, now: Instant, field_width: usize)
    {
        if self.over {
            return;
        }

        let before = self.words.len();
        self.words
            .retain(|word| now.saturating_duration_since(word.spawned_at) < word.ttl);
        let landed = before - self.words.len();
        if landed > 0 {
            self.lives = self.lives.saturating_sub(landed.min(u8::MAX as usize) as u8);
            self.words_missed += landed as u32;
        }

        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= ROUND_DURATION || self.lives == 0 {
            self.over = true;
            return;
        }

        if self.words.is_empty() || (now >= self.next_spawn && self.words.len() < MAX_WORDS) {
            let word = self.spawn_word(rng, now, elapsed, field_width);
            self.words.push(word);
            self.next_spawn = now + self.spawn_interval();
        }
    }

    fn spawn_interval(&self) -> Duration
    {
        let millis = SPAWN_INTERVAL.as_secs_f32() * 1000.0 * self.speed_scale / self.level_factor();
        Duration::from_millis(millis.max(300.0) as u64)
    }

    fn level_factor(&self) -> f32
    {
        1.0 + (self.level - 1).min(10) as f32 * 0.15
    }

    fn spawn_word(
        &self,
        rng: &mut impl Rng,
        now: Instant,
        elapsed: Duration,
        field_width: usize,
    ) -> Word
    {
        let text = WORDS.choose(rng).unwrap_or(&"cat");
        let max_col = field_width.saturating_sub(text.len());
        let column = if max_col == 0 {
            0
        } else {
            rng.gen_range(0..=max_col)
        };
        Word {
            text: text.to_string(),
            spawned_at: now,
            ttl: self.word_ttl(rng, elapsed),
            column,
        }
    }

    fn word_ttl(&self, rng: &mut impl Rng, elapsed: Duration) -> Duration
    {
        let progress = (elapsed.as_secs_f32() / ROUND_DURATION.as_secs_f32()).clamp(0.0, 1.0);
        let base = lerp(7.0, 4.0, progress) / self.level_factor();
        let jitter = rng.gen_range(0.85..1.15);
        let scaled = (base * self.speed_scale).clamp(1.5, 12.0);
        Duration::from_millis((scaled * jitter * 1000.0) as u64)
    }

    pub fn is_over(&self) -> bool
    {
        self.over
    }

    pub fn end(&mut self)
    {
        self.over = true;
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn lives(&self) -> u8
    {
        self.lives
    }

    pub fn words_typed(&self) -> u32
    {
        self.words_typed
    }

    pub fn time_left(&self, now: Instant) -> Duration
    {
        ROUND_DURATION.saturating_sub(now.saturating_duration_since(self.started))
    }

    pub fn outcome(&self) -> TypingOutcome
    {
        TypingOutcome {
            score: self.score,
            words_typed: self.words_typed,
        }
    }
}

/// Typing module: rounds of falling words until the child goes back.
pub fn run(
    term: &mut TerminalGuard,
    record: &ScoredRecord,
    prefs: &Prefs,
    on_update: &mut dyn FnMut(ScoredRecord),
) -> io::Result<()>
{
    let mut record = record.clone();
    loop {
        term.draw(&intro_lines(&record))?;
        let key = term::read_key()?;
        if term::is_back(&key) {
            return Ok(());
        }
        if key.code != KeyCode::Enter && key.code != KeyCode::Char(' ') {
            continue;
        }

        let session = play_round(term, &record, prefs)?;
        let outcome = session.outcome();
        let merged = merge_outcome(&record, &outcome);
        info!(score = outcome.score, words = outcome.words_typed, "Typing round finished");
        let new_best = outcome.score > record.score;
        on_update(merged.clone());
        record = merged;

        term.draw(&summary_lines(&session, new_best))?;
        term::wait_for_space()?;
    }
}

fn play_round(
    term: &mut TerminalGuard,
    record: &ScoredRecord,
    prefs: &Prefs,
) -> io::Result<TypingSession>
{
    let mut rng = rand::thread_rng();
    let mut session = TypingSession::new(record.level, prefs.typing_speed, Instant::now());
    let mut last_tick = Instant::now();

    while !session.is_over() {
        let now = Instant::now();
        let (field_width, field_height) = layout_metrics();

        while let Some(key) = term::poll_key(Duration::from_millis(0))? {
            if term::is_back(&key) {
                session.end();
                break;
            }
            match key.code {
                KeyCode::Backspace => session.backspace(),
                KeyCode::Enter => session.clear_input(),
                KeyCode::Char(ch) => session.type_char(ch),
                _ => {}
            }
        }

        let lives_before = session.lives();
        session.tick(&mut rng, now, field_width);
        term.chime(prefs.rings_for(session.lives() < lives_before))?;

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            term.draw(&field_lines(&session, now, field_width, field_height))?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    Ok(session)
}

fn intro_lines(record: &ScoredRecord) -> Vec<String>
{
    vec![
        "Typing Adventure".to_string(),
        String::new(),
        "Words fall from the sky. Type them before they land!".to_string(),
        format!("You have {START_LIVES} lives and {} seconds.", ROUND_DURATION.as_secs()),
        String::new(),
        format!("Level: {}  Best score: {}", record.level, record.score),
        String::new(),
        "Press ENTER to start, ESC to go back.".to_string(),
    ]
}

fn field_lines(
    session: &TypingSession,
    now: Instant,
    field_width: usize,
    field_height: usize,
) -> Vec<String>
{
    let mut lines = Vec::new();
    lines.push("Typing Adventure".to_string());
    lines.push(format!(
        "Time left: {:>4.1}s  Lives: {}  Score: {}  Words: {}",
        session.time_left(now).as_secs_f32(),
        "*".repeat(session.lives() as usize),
        session.score(),
        session.words_typed(),
    ));

    let field_width = field_width.max(1);
    let field_height = field_height.max(1);
    let mut field = vec![vec![Cell { ch: ' ', color: None }; field_width]; field_height];
    let buffer_len = session.buffer.chars().count();
    for word in &session.words {
        let fall = word.fall(now);
        let row = ((field_height as f32 - 1.0) * fall).floor() as usize;
        let col = word.column.min(field_width.saturating_sub(1));
        let prefix_match = buffer_len > 0 && word.text.starts_with(&session.buffer);
        for (offset, ch) in word.text.chars().enumerate() {
            if col + offset < field_width && row < field_height {
                let color = if prefix_match && offset < buffer_len {
                    Rgb::GREEN
                } else {
                    color_for_urgency(fall)
                };
                field[row][col + offset] = Cell {
                    ch,
                    color: Some(color),
                };
            }
        }
    }

    for row in field {
        lines.push(render_row(&row));
    }
    lines.push("=".repeat(field_width));
    lines.push(format!("Type: {}", session.buffer));
    lines.push("Backspace/Enter to fix, ESC to stop".to_string());
    lines
}

fn summary_lines(session: &TypingSession, new_best: bool) -> Vec<String>
{
    vec![
        if new_best {
            "New High Score!".to_string()
        } else {
            "Great Job!".to_string()
        },
        String::new(),
        format!("Score: {}", session.score),
        format!("Words typed: {}", session.words_typed),
        format!("Words missed: {}", session.words_missed),
        format!("Accuracy: {:>5.1}%", compute_accuracy(session.words_typed, session.words_missed)),
        format!("Keystrokes: {}", session.keystrokes),
        String::new(),
        "Press SPACE to continue.".to_string(),
    ]
}

#[derive(Clone, Copy)]
struct Cell
{
    ch: char,
    color: Option<Rgb>,
}

fn render_row(row: &[Cell]) -> String
{
    let mut line = String::with_capacity(row.len() + 16);
    let mut active: Option<Rgb> = None;
    for cell in row {
        if cell.color != active {
            if let Some(color) = cell.color {
                line.push_str(&ansi_color(color));
            } else {
                line.push_str("\x1b[0m");
            }
            active = cell.color;
        }
        line.push(cell.ch);
    }
    if active.is_some() {
        line.push_str("\x1b[0m");
    }
    line
}

fn color_for_urgency(progress: f32) -> Rgb
{
    let progress = progress.clamp(0.0, 1.0);
    if progress < 0.33 {
        lerp_color(Rgb::GREEN, Rgb::YELLOW, progress / 0.33)
    } else if progress < 0.66 {
        lerp_color(Rgb::YELLOW, Rgb::ORANGE, (progress - 0.33) / 0.33)
    } else {
        lerp_color(Rgb::ORANGE, Rgb::RED, (progress - 0.66) / 0.34)
    }
}

fn compute_accuracy(words_typed: u32, words_missed: u32) -> f32
{
    let total = words_typed + words_missed;
    if total == 0 {
        return 0.0;
    }
    (words_typed as f32 / total as f32) * 100.0
}

fn layout_metrics() -> (usize, usize)
{
    let (cols, rows) = terminal::size().unwrap_or((80, 24));
    let width = cols as usize;
    let height = rows as usize;
    let extra = 2 + 1 + 2;
    let field_height = if height > extra { height - extra } else { 6 };
    (width.saturating_sub(2).max(10), field_height.clamp(8, 22))
}
