use crate::games::{self, GameDescriptor};
use crate::nav::Screen;
use crate::progress::{LESSON_COUNT, ModuleId, ProgressMap};
use crate::term::{self, Rgb, TerminalGuard, paint};
use crossterm::event::{KeyCode, KeyEvent};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction
{
    Open(Screen),
    Quit,
}

/// Map a key press to a menu action using the game registry.
pub fn action_for(key: &KeyEvent, registry: &[GameDescriptor]) -> Option<MenuAction>
{
    if term::is_back(key) {
        return Some(MenuAction::Quit);
    }
    let KeyCode::Char(ch) = key.code else {
        return None;
    };
    let ch = ch.to_ascii_lowercase();
    if ch == 'q' {
        return Some(MenuAction::Quit);
    }
    registry
        .iter()
        .find(|game| game.key == ch)
        .map(|game| MenuAction::Open(game.screen))
}

/// Level and score shown on a menu tile. Learn shows the lesson it is on
/// and how many are done.
pub fn tile_stats(progress: &ProgressMap, module: ModuleId) -> (u32, u32)
{
    match progress.scored(module) {
        Some(record) => (record.level, record.score),
        None => (
            progress.learn.current_lesson.min(LESSON_COUNT - 1) + 1,
            progress.lessons_completed() as u32,
        ),
    }
}

pub fn lines(
    name: &str,
    progress: &ProgressMap,
    registry: &[GameDescriptor],
    warning: Option<&str>,
) -> Vec<String>
{
    let mut lines = vec![
        paint(&format!("Hi {name}! What do you want to do today?"), Rgb::GOLD),
        format!(
            "Level {}   Points {}   Badges {}",
            progress.highest_level(),
            progress.total_score(),
            progress.total_badges()
        ),
        String::new(),
    ];
    for game in registry {
        let stats = match game.screen {
            Screen::Module(module) => {
                let (level, score) = tile_stats(progress, module);
                if module == ModuleId::Learn {
                    format!("  Lesson {level}  Done {score}/{LESSON_COUNT}")
                } else {
                    format!("  Level {level}  Score {score}")
                }
            }
            _ => String::new(),
        };
        lines.push(format!(" {}. {:<18} {}{}", game.key, game.title, game.description, stats));
    }
    lines.push(String::new());
    if let Some(warning) = warning {
        lines.push(paint(warning, Rgb::ORANGE));
    }
    lines.push("Press a key to choose, q to quit.".to_string());
    lines
}

/// Show the menu until a usable key is pressed.
pub fn run(
    term: &mut TerminalGuard,
    name: &str,
    progress: &ProgressMap,
    warning: Option<&str>,
) -> io::Result<MenuAction>
{
    let registry = games::registry();
    term.draw(&lines(name, progress, &registry, warning))?;
    loop {
        let key = term::read_key()?;
        if let Some(action) = action_for(&key, &registry) {
            return Ok(action);
        }
    }
}
