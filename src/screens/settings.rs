use crate::games::Prefs;
use crate::games::timer::Deadline;
use crate::term::{self, LineEvent, LineInput, Rgb, TerminalGuard, paint};
use crossterm::event::KeyCode;
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const RESET_WINDOW: Duration = Duration::from_secs(5);
const MESSAGE_TIME: Duration = Duration::from_secs(3);
const MAX_PASSWORD_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPress
{
    Armed,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsExit
{
    Back,
    Reset,
}

/// Parent gate plus the two-press reset confirmation.
pub struct SettingsSession
{
    password: String,
    unlocked: bool,
    reset_armed: Option<Deadline>,
    message: Option<(String, Deadline)>,
}

impl SettingsSession
{
    pub fn new(password: impl Into<String>) -> Self
    {
        Self {
            password: password.into(),
            unlocked: false,
            reset_armed: None,
            message: None,
        }
    }

    pub fn is_unlocked(&self) -> bool
    {
        self.unlocked
    }

    pub fn unlock(&mut self, attempt: &str, now: Instant) -> bool
    {
        if attempt == self.password {
            self.unlocked = true;
            self.message = None;
            info!("Settings unlocked");
        } else {
            warn!("Wrong parent password");
            let shown_until = Deadline::after(now, MESSAGE_TIME);
            self.message = Some(("Incorrect password!".to_string(), shown_until));
        }
        self.unlocked
    }

    /// Flip sound for the rest of the process. Locked settings change nothing.
    pub fn toggle_sound(&self, prefs: &mut Prefs) -> bool
    {
        if !self.unlocked {
            return false;
        }
        prefs.sound = !prefs.sound;
        info!(sound = prefs.sound, "Sound toggled");
        true
    }

    /// First press arms, a second press inside the window confirms.
    pub fn press_reset(&mut self, now: Instant) -> Option<ResetPress>
    {
        if !self.unlocked {
            return None;
        }
        self.expire(now);
        if self.reset_armed.take().is_some() {
            return Some(ResetPress::Confirmed);
        }
        self.reset_armed = Some(Deadline::after(now, RESET_WINDOW));
        Some(ResetPress::Armed)
    }

    pub fn is_reset_armed(&self) -> bool
    {
        self.reset_armed.is_some()
    }

    /// Whole seconds left to confirm a reset, rounded up.
    pub fn reset_seconds_left(&self, now: Instant) -> Option<u64>
    {
        let left = self.reset_armed?.remaining(now);
        if left.is_zero() {
            return None;
        }
        Some(left.as_millis().div_ceil(1000) as u64)
    }

    pub fn message(&self) -> Option<&str>
    {
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    /// Drop the reset confirmation and message once their time is up.
    pub fn expire(&mut self, now: Instant)
    {
        if self.reset_armed.is_some_and(|deadline| deadline.is_due(now)) {
            self.reset_armed = None;
        }
        if self.message.as_ref().is_some_and(|(_, deadline)| deadline.is_due(now)) {
            self.message = None;
        }
    }
}

pub fn run(term: &mut TerminalGuard, prefs: &mut Prefs, password: &str) -> io::Result<SettingsExit>
{
    let mut session = SettingsSession::new(password);
    let mut input = LineInput::masked(MAX_PASSWORD_LEN);
    loop {
        let now = Instant::now();
        session.expire(now);
        term.draw(&lines(&session, &input, prefs, now))?;
        let Some(key) = term::poll_key(Duration::from_millis(200))? else {
            continue;
        };

        if !session.is_unlocked() {
            match input.handle(&key) {
                LineEvent::Cancelled => return Ok(SettingsExit::Back),
                LineEvent::Submitted(attempt) => {
                    session.unlock(&attempt, Instant::now());
                }
                LineEvent::Edited | LineEvent::Ignored => {}
            }
            continue;
        }

        if term::is_back(&key) {
            return Ok(SettingsExit::Back);
        }
        match key.code {
            KeyCode::Char('m') => {
                session.toggle_sound(prefs);
            }
            KeyCode::Char('r') => {
                if session.press_reset(Instant::now()) == Some(ResetPress::Confirmed) {
                    return Ok(SettingsExit::Reset);
                }
            }
            _ => {}
        }
    }
}

fn lines(session: &SettingsSession, input: &LineInput, prefs: &Prefs, now: Instant) -> Vec<String>
{
    let mut lines = vec![paint("Parent Settings", Rgb::GOLD), String::new()];
    if !session.is_unlocked() {
        lines.push("Enter parent password:".to_string());
        lines.push(format!("> {}_", input.display()));
        lines.push(String::new());
        if let Some(message) = session.message() {
            lines.push(paint(message, Rgb::RED));
        }
        lines.push("ENTER to unlock, ESC to go back.".to_string());
        return lines;
    }

    lines.push(format!("  m. Sound: {}", if prefs.sound { "on" } else { "off" }));
    lines.push(match session.reset_seconds_left(now) {
        Some(secs) => {
            let prompt = format!("  r. Press r again within {secs}s to confirm reset!");
            paint(&prompt, Rgb::RED)
        }
        None => "  r. Reset everything".to_string(),
    });
    lines.push(String::new());
    lines.push("ESC to go back.".to_string());
    lines
}
