//! Blocking stdin prompts for confirmations and dates.

use std::io::{self, BufRead, Write};

use subledger_core::Interaction;

/// Asks questions on the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    fn ask(question: &str) -> Option<String> {
        print!("{question} ");
        if let Err(e) = io::stdout().flush() {
            tracing::warn!("Failed to flush prompt: {e}");
        }
        read_line()
    }
}

impl Interaction for TerminalInteraction {
    fn confirm(&self, question: &str) -> bool {
        Self::ask(&format!("{question} [y/N]"))
            .is_some_and(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn prompt_for_date(&self, question: &str) -> Option<String> {
        Self::ask(question).filter(|answer| !answer.trim().is_empty())
    }
}

/// Reads one line from stdin. `None` on end of input or read failure.
pub fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => {
            tracing::warn!("Failed to read input: {e}");
            None
        }
    }
}
