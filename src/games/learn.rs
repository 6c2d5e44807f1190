use crate::progress::merge::merge_lesson;
use crate::progress::{LESSON_COUNT, LearnRecord};
use crate::term::{self, Rgb, TerminalGuard, bar, paint};
use crossterm::event::KeyCode;
use std::io;
use tracing::info;

pub struct Lesson
{
    pub title: &'static str,
    pub intro: &'static str,
    pub points: [&'static str; 4],
}

pub static LESSONS: [Lesson; LESSON_COUNT as usize] = [
    Lesson {
        title: "Meet Your Computer",
        intro: "A computer is like a smart friend that helps us learn and play! \
                Let's meet the parts of a computer.",
        points: [
            "Monitor - This is the screen where you see everything!",
            "Keyboard - Use this to type letters and numbers",
            "Mouse - Click and move things on the screen",
            "CPU - The computer's brain that thinks really fast!",
        ],
    },
    Lesson {
        title: "Using the Mouse",
        intro: "The mouse is your magic wand for the computer! Let's learn how to use it.",
        points: [
            "Left Click - Press the left button to select things",
            "Right Click - Press the right button for more options",
            "Scroll - Roll the wheel to move up and down",
            "Move - Slide the mouse to move the pointer",
        ],
    },
    Lesson {
        title: "Files and Folders",
        intro: "Files and folders help keep your computer organized, just like your toy box!",
        points: [
            "File - A single document, picture, or game",
            "Folder - A container that holds many files",
            "Desktop - The main screen with all your shortcuts",
            "Recycle Bin - Where deleted files go (like a trash can)",
        ],
    },
    Lesson {
        title: "Staying Safe Online",
        intro: "The internet is fun, but we need to stay safe! Here are important safety rules.",
        points: [
            "Never share personal information with strangers",
            "Always ask a grown-up before downloading anything",
            "Don't click on suspicious links or pop-ups",
            "Tell a trusted adult if something makes you uncomfortable",
        ],
    },
];

/// Browsing position plus the record it reports into.
pub struct LearnSession
{
    record: LearnRecord,
    viewing: u32,
}

impl LearnSession
{
    /// Opens on the stored current lesson.
    pub fn new(record: &LearnRecord) -> Self
    {
        let viewing = record.current_lesson.min(LESSON_COUNT - 1);
        Self {
            record: record.clone(),
            viewing,
        }
    }

    pub fn viewing(&self) -> u32
    {
        self.viewing
    }

    pub fn lesson(&self) -> &'static Lesson
    {
        &LESSONS[self.viewing as usize]
    }

    pub fn record(&self) -> &LearnRecord
    {
        &self.record
    }

    pub fn is_completed(&self, lesson: u32) -> bool
    {
        self.record.completed_lessons.contains(&lesson)
    }

    pub fn prev(&mut self) -> bool
    {
        if self.viewing == 0 {
            return false;
        }
        self.viewing -= 1;
        true
    }

    pub fn next(&mut self) -> bool
    {
        if self.viewing + 1 >= LESSON_COUNT {
            return false;
        }
        self.viewing += 1;
        true
    }

    pub fn jump(&mut self, lesson: u32) -> bool
    {
        if lesson >= LESSON_COUNT {
            return false;
        }
        self.viewing = lesson;
        true
    }

    /// Mark the viewed lesson done and move on to the next one.
    /// Returns the new record for the caller to report.
    pub fn complete(&mut self) -> LearnRecord
    {
        self.record = merge_lesson(&self.record, self.viewing, LESSON_COUNT);
        self.next();
        self.record.clone()
    }
}

/// Computer basics lessons. Each completion is reported right away.
pub fn run(
    term: &mut TerminalGuard,
    record: &LearnRecord,
    on_update: &mut dyn FnMut(LearnRecord),
) -> io::Result<()>
{
    let mut session = LearnSession::new(record);
    loop {
        term.draw(&lesson_lines(&session))?;
        let key = term::read_key()?;
        if term::is_back(&key) {
            return Ok(());
        }
        match key.code {
            KeyCode::Left => {
                session.prev();
            }
            KeyCode::Right => {
                session.next();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let completed = session.viewing();
                let updated = session.complete();
                let done = updated.completed_lessons.len();
                info!(lesson = completed, done, "Lesson completed");
                on_update(updated);
            }
            _ => {
                if let Some(idx) = term::option_index(&key) {
                    session.jump(idx as u32);
                }
            }
        }
    }
}

fn lesson_lines(session: &LearnSession) -> Vec<String>
{
    let lesson = session.lesson();
    let viewing = session.viewing();
    let mut lines = vec![
        format!(
            "Computer Explorer - Lesson {} of {}  {}",
            viewing + 1,
            LESSON_COUNT,
            bar(viewing as usize + 1, LESSON_COUNT as usize, 12)
        ),
        String::new(),
        paint(lesson.title, Rgb::GOLD),
        lesson.intro.to_string(),
        String::new(),
    ];
    lines.extend(lesson.points.iter().map(|point| format!("  - {point}")));
    lines.push(String::new());

    if session.is_completed(viewing) {
        lines.push(paint("Lesson complete!", Rgb::GREEN));
    } else {
        lines.push("Press ENTER when you have finished this lesson.".to_string());
    }
    lines.push(String::new());

    for (idx, other) in LESSONS.iter().enumerate() {
        let idx = idx as u32;
        let mark = if session.is_completed(idx) {
            "[x]"
        } else if idx == viewing {
            "[>]"
        } else {
            "[ ]"
        };
        lines.push(format!("{mark} {}. {}", idx + 1, other.title));
    }
    lines.push(String::new());
    lines.push("LEFT/RIGHT to browse, 1-4 to jump, ESC to go back.".to_string());
    lines
}
