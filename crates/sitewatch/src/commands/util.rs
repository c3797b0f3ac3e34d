//! Shared helpers for command handlers.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use sitewatch_core::Operator;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Spinner on stderr for a one-shot backend call. Hidden in quiet mode
/// and when stderr is not a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ── Operator ────────────────────────────────────────────────────────

/// Operator backed by dialoguer prompts on the controlling terminal.
///
/// `echo` prints notifications to stderr; one-shot commands leave it off
/// because the failure is reported once more as the command's error.
pub struct TerminalOperator {
    yes: bool,
    echo: bool,
}

impl TerminalOperator {
    pub fn new(yes: bool, echo: bool) -> Self {
        Self { yes, echo }
    }
}

impl Operator for TerminalOperator {
    fn confirm(&self, prompt: &str) -> bool {
        match confirm(prompt, self.yes) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "confirmation unavailable, treating as declined");
                false
            }
        }
    }

    fn notify(&self, message: &str) {
        if self.echo {
            eprintln!("{} {message}", "✗".red());
        } else {
            tracing::debug!(message, "operator notice");
        }
    }
}
