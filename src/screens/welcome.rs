use crate::nav::{MAX_NAME_LEN, clean_name};
use crate::term::{self, LineEvent, LineInput, Rgb, TerminalGuard, paint};
use std::io;

/// Ask for the child's name. `None` when they press ESC to leave.
pub fn run(term: &mut TerminalGuard) -> io::Result<Option<String>>
{
    let mut input = LineInput::new(MAX_NAME_LEN);
    let mut hint = false;
    loop {
        term.draw(&lines(&input, hint))?;
        let key = term::read_key()?;
        match input.handle(&key) {
            LineEvent::Cancelled => return Ok(None),
            LineEvent::Submitted(raw) => {
                if clean_name(&raw).is_some() {
                    return Ok(Some(raw));
                }
                hint = true;
            }
            LineEvent::Edited => hint = false,
            LineEvent::Ignored => {}
        }
    }
}

fn lines(input: &LineInput, hint: bool) -> Vec<String>
{
    let mut lines = vec![
        paint("Welcome to SafeLearn Junior!", Rgb::GOLD),
        String::new(),
        "What's your name, young learner?".to_string(),
        String::new(),
        format!("> {}_", input.display()),
        String::new(),
    ];
    if hint {
        lines.push(paint("Please type your name first.", Rgb::ORANGE));
    }
    lines.push(format!("Up to {MAX_NAME_LEN} letters. ENTER to start, ESC to quit."));
    lines
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn hint_only_after_blank_submit()
    {
        let input = LineInput::new(MAX_NAME_LEN);
        assert!(!lines(&input, false).iter().any(|line| line.contains("type your name")));
        assert!(lines(&input, true).iter().any(|line| line.contains("type your name")));
    }
}
