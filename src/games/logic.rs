use crate::games::Prefs;
use crate::progress::ScoredRecord;
use crate::progress::merge::{LogicOutcome, merge_outcome};
use crate::term::{self, Rgb, TerminalGuard, paint};
use crossterm::event::KeyCode;
use rand::Rng;
use rand::seq::SliceRandom;
use std::io;
use tracing::info;

const PUZZLES_PER_ROUND: usize = 5;
const START_LIVES: u8 = 3;
const POINTS_PER_PUZZLE: u32 = 10;
const SHOWN_TERMS: usize = 4;
const OPTION_COUNT: usize = 4;
const PATTERN_SYMBOLS: &[&str] = &["A", "B", "C", "X", "O", "*", "+"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleKind
{
    CountUp,
    CountDown,
    Repeat,
}

/// "What comes next?": a visible sequence and four candidate answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle
{
    pub kind: PuzzleKind,
    pub shown: Vec<String>,
    pub options: Vec<String>,
    pub correct: usize,
}

impl Puzzle
{
    pub fn answer(&self) -> &str
    {
        &self.options[self.correct]
    }
}

pub fn generate(rng: &mut impl Rng) -> Puzzle
{
    let kind = match rng.gen_range(0..3) {
        0 => PuzzleKind::CountUp,
        1 => PuzzleKind::CountDown,
        _ => PuzzleKind::Repeat,
    };

    let (shown, answer, mut distractors) = match kind {
        PuzzleKind::CountUp | PuzzleKind::CountDown => {
            let step: i32 = rng.gen_range(1..=3);
            let step = if kind == PuzzleKind::CountDown { -step } else { step };
            let start: i32 = if step > 0 {
                rng.gen_range(1..=10)
            } else {
                rng.gen_range(14..=20)
            };
            let terms: Vec<i32> = (0..=SHOWN_TERMS as i32).map(|i| start + step * i).collect();
            let answer = terms[SHOWN_TERMS];
            let shown: Vec<String> = terms[..SHOWN_TERMS].iter().map(i32::to_string).collect();
            let candidates = [
                answer + 1,
                answer - 1,
                answer + 2,
                answer + step,
                answer - step,
                answer + 2 * step,
            ];
            let distractors = candidates
                .into_iter()
                .filter(|value| *value != answer && *value >= 0)
                .map(|value| value.to_string())
                .collect::<Vec<_>>();
            (shown, answer.to_string(), distractors)
        }
        PuzzleKind::Repeat => {
            let width = rng.gen_range(2..=3);
            let pattern: Vec<&str> = PATTERN_SYMBOLS
                .choose_multiple(rng, width)
                .copied()
                .collect();
            let terms: Vec<String> = (0..=SHOWN_TERMS + 1)
                .map(|i| pattern[i % width].to_string())
                .collect();
            let answer = terms[SHOWN_TERMS + 1].clone();
            let shown = terms[..=SHOWN_TERMS].to_vec();
            let distractors = PATTERN_SYMBOLS
                .iter()
                .filter(|symbol| **symbol != answer)
                .map(|symbol| symbol.to_string())
                .collect::<Vec<_>>();
            (shown, answer, distractors)
        }
    };

    distractors.dedup();
    distractors.shuffle(rng);
    let mut options = vec![answer.clone()];
    for candidate in distractors {
        if options.len() == OPTION_COUNT {
            break;
        }
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    options.shuffle(rng);
    let correct = options.iter().position(|option| *option == answer).unwrap_or(0);

    Puzzle {
        kind,
        shown,
        options,
        correct,
    }
}

/// One round of sequence puzzles.
pub struct LogicSession
{
    puzzles: Vec<Puzzle>,
    current: usize,
    selected: Option<usize>,
    score: u32,
    lives: u8,
    over: bool,
}

impl LogicSession
{
    pub fn new(rng: &mut impl Rng) -> Self
    {
        Self::with_puzzles((0..PUZZLES_PER_ROUND).map(|_| generate(rng)).collect())
    }

    pub fn with_puzzles(puzzles: Vec<Puzzle>) -> Self
    {
        let over = puzzles.is_empty();
        Self {
            puzzles,
            current: 0,
            selected: None,
            score: 0,
            lives: START_LIVES,
            over,
        }
    }

    pub fn puzzle(&self) -> Option<&Puzzle>
    {
        if self.over { None } else { self.puzzles.get(self.current) }
    }

    pub fn select(&mut self, idx: usize) -> Option<bool>
    {
        if self.selected.is_some() {
            return None;
        }
        let puzzle = self.puzzle()?;
        if idx >= puzzle.options.len() {
            return None;
        }
        let correct = idx == puzzle.correct;
        if correct {
            self.score += POINTS_PER_PUZZLE;
        } else {
            self.lives = self.lives.saturating_sub(1);
        }
        self.selected = Some(idx);
        Some(correct)
    }

    /// Next puzzle; the round ends after the last one or the last life.
    pub fn next(&mut self) -> bool
    {
        if self.selected.is_none() || self.over {
            return false;
        }
        self.selected = None;
        if self.lives == 0 || self.current + 1 >= self.puzzles.len() {
            self.over = true;
        } else {
            self.current += 1;
        }
        true
    }

    pub fn selected(&self) -> Option<usize>
    {
        self.selected
    }

    pub fn is_over(&self) -> bool
    {
        self.over
    }

    pub fn score(&self) -> u32
    {
        self.score
    }

    pub fn lives(&self) -> u8
    {
        self.lives
    }

    pub fn outcome(&self) -> LogicOutcome
    {
        LogicOutcome { score: self.score }
    }
}

/// Logic module: rounds of five puzzles until the child goes back.
pub fn run(
    term: &mut TerminalGuard,
    record: &ScoredRecord,
    prefs: &Prefs,
    on_update: &mut dyn FnMut(ScoredRecord),
) -> io::Result<()>
{
    let mut record = record.clone();
    let mut rng = rand::thread_rng();
    loop {
        term.draw(&[
            "Logic Lab".to_string(),
            String::new(),
            "Find what comes next in each pattern!".to_string(),
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

        let mut session = LogicSession::new(&mut rng);
        if !play(term, &mut session, prefs)? {
            continue;
        }

        let outcome = session.outcome();
        info!(score = outcome.score, lives = session.lives(), "Logic round finished");
        let merged = merge_outcome(&record, &outcome);
        on_update(merged.clone());
        record = merged;

        term.draw(&[
            if session.lives() == 0 { "Out of lives!" } else { "Round complete!" }.to_string(),
            String::new(),
            format!("Score: {}", outcome.score),
            format!("Best score: {}  Level: {}", record.score, record.level),
            String::new(),
            "Press SPACE to continue.".to_string(),
        ])?;
        term::wait_for_space()?;
    }
}

fn play(term: &mut TerminalGuard, session: &mut LogicSession, prefs: &Prefs) -> io::Result<bool>
{
    while !session.is_over() {
        term.draw(&puzzle_lines(session))?;
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
    Ok(true)
}

fn puzzle_lines(session: &LogicSession) -> Vec<String>
{
    let mut lines = vec![
        format!(
            "Logic Lab   Score: {}  Lives: {}",
            session.score(),
            "*".repeat(session.lives() as usize)
        ),
        String::new(),
    ];
    let Some(puzzle) = session.puzzle() else {
        return lines;
    };
    lines.push(format!("{}, ?", puzzle.shown.join(", ")));
    lines.push(String::new());
    for (idx, option) in puzzle.options.iter().enumerate() {
        let label = format!("  {}. {}", idx + 1, option);
        lines.push(match session.selected() {
            Some(_) if idx == puzzle.correct => paint(&label, Rgb::GREEN),
            Some(chosen) if chosen == idx => paint(&label, Rgb::RED),
            _ => label,
        });
    }
    lines.push(String::new());
    lines.push(match session.selected() {
        Some(chosen) if chosen == puzzle.correct => "Correct! Press ENTER.".to_string(),
        Some(_) => format!("It was {}. Press ENTER.", puzzle.answer()),
        None => "What comes next? Press a number.".to_string(),
    });
    lines
}

#[cfg(test)]
mod tests
{
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_puzzles_are_well_formed()
    {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..300 {
            let puzzle = generate(&mut rng);
            assert_eq!(puzzle.options.len(), OPTION_COUNT);
            assert!(puzzle.correct < OPTION_COUNT);
            let mut unique = puzzle.options.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), OPTION_COUNT);
        }
    }

    #[test]
    fn counting_puzzles_continue_the_step()
    {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let puzzle = generate(&mut rng);
            if puzzle.kind == PuzzleKind::Repeat {
                continue;
            }
            let values: Vec<i32> = puzzle.shown.iter().filter_map(|s| s.parse().ok()).collect();
            let step = values[1] - values[0];
            let expected = values[values.len() - 1] + step;
            assert_eq!(puzzle.answer(), expected.to_string());
        }
    }

    fn fixed(correct: usize) -> Puzzle
    {
        Puzzle {
            kind: PuzzleKind::CountUp,
            shown: vec!["1".into(), "2".into(), "3".into(), "4".into()],
            options: vec!["5".into(), "6".into(), "7".into(), "8".into()],
            correct,
        }
    }

    #[test]
    fn perfect_round_earns_logic_star()
    {
        let mut session = LogicSession::with_puzzles((0..5).map(|_| fixed(0)).collect());
        while !session.is_over() {
            assert_eq!(session.select(0), Some(true));
            session.next();
        }
        assert_eq!(session.score(), 50);
        let merged = merge_outcome(&ScoredRecord::default(), &session.outcome());
        assert!(merged.has_badge("logic-star"));
        assert_eq!(merged.level, 3);
    }

    #[test]
    fn three_misses_end_the_round_early()
    {
        let mut session = LogicSession::with_puzzles((0..5).map(|_| fixed(0)).collect());
        for _ in 0..3 {
            assert_eq!(session.select(1), Some(false));
            session.next();
        }
        assert!(session.is_over());
        assert_eq!(session.lives(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn next_requires_an_answer()
    {
        let mut session = LogicSession::with_puzzles(vec![fixed(2)]);
        assert!(!session.next());
        session.select(2);
        assert_eq!(session.select(0), None);
        assert!(session.next());
        assert!(session.is_over());
    }
}
