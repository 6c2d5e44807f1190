use crate::progress::badges::{Badge, catalog};
use crate::progress::{LESSON_COUNT, ProgressMap};
use crate::term::{self, Rgb, TerminalGuard, bar, paint};
use std::io;

pub fn lines(progress: &ProgressMap) -> Vec<String>
{
    let entries = catalog(progress);
    let unlocked = entries.iter().filter(|(_, earned)| *earned).count();

    let mut lines = vec![
        paint("Achievements", Rgb::GOLD),
        format!(
            "{} of {} badges  {}",
            unlocked,
            Badge::ALL.len(),
            bar(unlocked, Badge::ALL.len(), 20)
        ),
        String::new(),
    ];
    for (badge, earned) in entries {
        let line = format!(
            "{} {:<20} {}",
            if earned { "[*]" } else { "[ ]" },
            badge.name(),
            badge.description()
        );
        lines.push(if earned { paint(&line, Rgb::GREEN) } else { paint(&line, Rgb::GREY) });
    }
    lines.push(String::new());
    lines.push(format!(
        "Total points: {}   Highest level: {}   Lessons: {}/{}",
        progress.total_score(),
        progress.highest_level(),
        progress.lessons_completed(),
        LESSON_COUNT
    ));
    lines.push("Press ESC to go back.".to_string());
    lines
}

pub fn run(term: &mut TerminalGuard, progress: &ProgressMap) -> io::Result<()>
{
    term.draw(&lines(progress))?;
    loop {
        let key = term::read_key()?;
        if term::is_back(&key) || key.code == crossterm::event::KeyCode::Char(' ') {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::progress::ScoredRecord;

    #[test]
    fn earned_badges_are_counted_in_header()
    {
        let mut progress = ProgressMap::default();
        progress.quiz = ScoredRecord {
            level: 3,
            score: 80,
            badges: ["quiz-master".to_string(), "perfect-score".to_string()].into_iter().collect(),
        };
        let lines = lines(&progress);
        assert!(lines[1].starts_with("2 of 11 badges"));
        assert_eq!(lines.len(), 3 + Badge::ALL.len() + 3);
    }
}
