use std::io::{self, BufRead, IsTerminal, Write};

use color_eyre::eyre::bail;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use secrecy::SecretString;

use crate::errors::DdResult;

pub trait SecretPrompt {
    /// Ask for a secret without echoing it back.
    fn prompt_secret(&mut self, message: &str) -> DdResult<SecretString>;
}

/// Reads from the controlling terminal in raw mode, or a plain line when stdin is piped.
pub struct TerminalPrompt;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl SecretPrompt for TerminalPrompt {
    fn prompt_secret(&mut self, message: &str) -> DdResult<SecretString> {
        let mut stderr = io::stderr();
        write!(stderr, "{message}")?;
        stderr.flush()?;

        if !io::stdin().is_terminal() {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            writeln!(stderr)?;
            return Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()));
        }

        let input = {
            terminal::enable_raw_mode()?;
            let _raw_mode = RawModeGuard;
            read_hidden_line()?
        };
        writeln!(stderr)?;
        Ok(SecretString::from(input))
    }
}

fn read_hidden_line() -> DdResult<String> {
    let mut input = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(input),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("Token prompt interrupted.")
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }
}
