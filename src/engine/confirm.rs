//! Operator confirmation before any transfer.

use anyhow::{Context, Result};
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal};

use super::differ::display_changes;

/// Question asked after the change report.
pub const PROMPT: &str = "Sync changes? [y/N]";

/// Blocks until the operator accepts or rejects.
pub trait ConfirmationGate {
    /// Return the operator's raw answer to `prompt`, or `None` on end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Reads answers from the terminal, or from stdin when it is piped.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl ConfirmationGate for TerminalPrompt {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        if io::stdin().is_terminal() {
            let answer: String = Input::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .context("Failed to read confirmation")?;
            return Ok(Some(answer));
        }

        eprint!("{prompt}: ");
        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read confirmation")?;
        Ok((read > 0).then_some(line))
    }
}

/// Only an explicit `y` or `yes` counts as consent.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// Show `report` and ask whether to apply it.
pub fn confirm(gate: &mut dyn ConfirmationGate, report: &str) -> Result<bool> {
    display_changes(report);
    let answer = gate.ask(PROMPT)?;
    let accepted = answer.as_deref().is_some_and(is_affirmative);
    log::debug!("Confirmation answer {answer:?} accepted: {accepted}");
    Ok(accepted)
}
