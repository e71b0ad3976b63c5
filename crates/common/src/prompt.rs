//! Terminal prompts shared by the tracker menu and the credential gate

use crate::{Error, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, BufRead, Write};

/// Print `prompt` and read one trimmed line from stdin
pub fn prompt_line(prompt: &str) -> Result<String> {
    let stdin = io::stdin();
    read_line_from(&mut stdin.lock(), &mut io::stdout(), prompt)
}

/// Print `prompt` to `output` and read one trimmed line from `input`
///
/// Returns [`Error::InputClosed`] at end of input.
pub fn read_line_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::InputClosed);
    }
    Ok(line.trim().to_string())
}

/// Result of feeding one key to a secret being typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKey {
    /// Keep reading
    Continue,
    /// Input complete
    Submit,
    /// User aborted with Ctrl+C
    Abort,
}

/// Apply a key press to a secret buffer
pub fn apply_secret_key(secret: &mut String, key: KeyEvent) -> SecretKey {
    match key.code {
        KeyCode::Enter => SecretKey::Submit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => SecretKey::Abort,
        KeyCode::Backspace => {
            secret.pop();
            SecretKey::Continue
        }
        KeyCode::Char(c) => {
            secret.push(c);
            SecretKey::Continue
        }
        _ => SecretKey::Continue,
    }
}

/// Raw terminal mode, restored to cooked mode when dropped
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn enable() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Print `prompt` and read a secret without echoing it
pub fn prompt_secret(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;

    let mut secret = String::new();
    let outcome = {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                // Ignore key release events on some platforms
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match apply_secret_key(&mut secret, key) {
                    SecretKey::Continue => {}
                    done => break done,
                }
            }
        }
    };

    writeln!(stdout)?;
    match outcome {
        SecretKey::Abort => Err(Error::Interrupted),
        _ => Ok(secret),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_trims() {
        let mut input = Cursor::new("  my_logs \n");
        let mut output = Vec::new();
        let line = read_line_from(&mut input, &mut output, "Name: ").unwrap();
        assert_eq!(line, "my_logs");
        assert_eq!(output, b"Name: ");
    }

    #[test]
    fn test_read_line_eof() {
        let mut input = Cursor::new("");
        let err = read_line_from(&mut input, &mut io::sink(), "> ").unwrap_err();
        assert!(matches!(err, Error::InputClosed));
    }

    #[test]
    fn test_read_line_blank_line_is_empty() {
        let mut input = Cursor::new("\n");
        let line = read_line_from(&mut input, &mut io::sink(), "> ").unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn test_apply_secret_key_typing() {
        let mut secret = String::new();
        for c in "pa5s".chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            assert_eq!(apply_secret_key(&mut secret, key), SecretKey::Continue);
        }
        let backspace = KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE);
        apply_secret_key(&mut secret, backspace);
        assert_eq!(secret, "pa5");

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(apply_secret_key(&mut secret, enter), SecretKey::Submit);
    }

    #[test]
    fn test_raw_mode_guard_restores_on_drop() {
        // Nothing to check without a controlling terminal
        let Ok(guard) = RawModeGuard::enable() else {
            return;
        };
        assert!(crossterm::terminal::is_raw_mode_enabled().unwrap());
        drop(guard);
        assert!(!crossterm::terminal::is_raw_mode_enabled().unwrap());
    }

    #[test]
    fn test_apply_secret_key_ctrl_c() {
        let mut secret = String::from("abc");
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_secret_key(&mut secret, ctrl_c), SecretKey::Abort);
        assert_eq!(secret, "abc");
    }
}
