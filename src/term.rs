//! Raw-mode terminal plumbing shared by every screen.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

pub struct TerminalGuard
{
    stdout: Stdout,
}

impl TerminalGuard
{
    pub fn enter() -> io::Result<Self>
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    /// Replace the whole screen with `lines`.
    pub fn draw(&mut self, lines: &[String]) -> io::Result<()>
    {
        let output = format!("{}\r\n", lines.join("\r\n"));
        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::All))?;
        self.stdout.write_all(output.as_bytes())?;
        self.stdout.flush()
    }

    /// Terminal bell. Does nothing when `ring` is false.
    pub fn chime(&mut self, ring: bool) -> io::Result<()>
    {
        if ring {
            self.stdout.write_all(b"\x07")?;
            self.stdout.flush()?;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard
{
    fn drop(&mut self)
    {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Next key press within `timeout`, if any.
pub fn poll_key(timeout: Duration) -> io::Result<Option<KeyEvent>>
{
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Block until a key is pressed.
pub fn read_key() -> io::Result<KeyEvent>
{
    loop {
        if let Some(key) = poll_key(Duration::from_millis(250))? {
            return Ok(key);
        }
    }
}

/// Esc or Ctrl-C.
pub fn is_back(key: &KeyEvent) -> bool
{
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Drop queued input, then wait for SPACE (or Esc).
pub fn wait_for_space() -> io::Result<()>
{
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        let key = read_key()?;
        if key.code == KeyCode::Char(' ') || is_back(&key) {
            return Ok(());
        }
    }
}

/// Digit key as a zero-based option index.
pub fn option_index(key: &KeyEvent) -> Option<usize>
{
    match key.code {
        KeyCode::Char(ch) => ch
            .to_digit(10)
            .filter(|digit| *digit >= 1)
            .map(|digit| digit as usize - 1),
        _ => None,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb
{
    pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    pub const YELLOW: Rgb = Rgb { r: 255, g: 255, b: 0 };
    pub const ORANGE: Rgb = Rgb { r: 255, g: 128, b: 0 };
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    pub const GOLD: Rgb = Rgb { r: 255, g: 215, b: 0 };
    pub const GREY: Rgb = Rgb { r: 130, g: 130, b: 130 };
}

pub fn ansi_color(color: Rgb) -> String
{
    format!("\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

pub fn paint(text: &str, color: Rgb) -> String
{
    format!("{}{}\x1b[0m", ansi_color(color), text)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32
{
    a + (b - a) * t
}

pub fn lerp_color(start: Rgb, end: Rgb, t: f32) -> Rgb
{
    let t = t.clamp(0.0, 1.0);
    Rgb {
        r: lerp(start.r as f32, end.r as f32, t) as u8,
        g: lerp(start.g as f32, end.g as f32, t) as u8,
        b: lerp(start.b as f32, end.b as f32, t) as u8,
    }
}

/// Progress bar like `[#####-----]`.
pub fn bar(done: usize, total: usize, width: usize) -> String
{
    let filled = if total == 0 {
        0
    } else {
        (done.min(total) * width) / total
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// What a key did to a [`LineInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent
{
    Edited,
    Submitted(String),
    Cancelled,
    Ignored,
}

/// Single-line text entry with a length cap.
#[derive(Debug, Clone, Default)]
pub struct LineInput
{
    buffer: String,
    max_len: usize,
    masked: bool,
}

impl LineInput
{
    pub fn new(max_len: usize) -> Self
    {
        Self {
            buffer: String::new(),
            max_len,
            masked: false,
        }
    }

    pub fn masked(max_len: usize) -> Self
    {
        Self {
            masked: true,
            ..Self::new(max_len)
        }
    }

    pub fn handle(&mut self, key: &KeyEvent) -> LineEvent
    {
        if is_back(key) {
            return LineEvent::Cancelled;
        }
        match key.code {
            KeyCode::Enter => LineEvent::Submitted(std::mem::take(&mut self.buffer)),
            KeyCode::Backspace => {
                self.buffer.pop();
                LineEvent::Edited
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if self.buffer.chars().count() < self.max_len {
                    self.buffer.push(ch);
                    LineEvent::Edited
                } else {
                    LineEvent::Ignored
                }
            }
            _ => LineEvent::Ignored,
        }
    }

    pub fn as_str(&self) -> &str
    {
        &self.buffer
    }

    /// Text to show on screen.
    pub fn display(&self) -> String
    {
        if self.masked {
            "*".repeat(self.buffer.chars().count())
        } else {
            self.buffer.clone()
        }
    }
}
