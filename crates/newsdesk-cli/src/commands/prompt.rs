//! Terminal prompts built on rustyline.

use anyhow::Result;
use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{ColorMode, DefaultEditor, Editor, Helper};
use std::borrow::Cow::{self, Owned};

/// Helper that renders every typed character as `*`.
struct MaskingHelper;

impl Helper for MaskingHelper {}

impl Completer for MaskingHelper {
    type Candidate = String;
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Owned("*".repeat(line.chars().count()))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

/// Reads a password without echoing it. `None` if the user aborts.
pub fn password(label: &str) -> Result<Option<String>> {
    let mut rl: Editor<MaskingHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(MaskingHelper));
    rl.set_color_mode(ColorMode::Forced);
    rl.set_auto_add_history(false);

    match rl.readline(&format!("{label}: ")) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Reads one line of plain input. `None` if the user aborts.
pub fn line(label: &str) -> Result<Option<String>> {
    let mut rl = DefaultEditor::new()?;
    match rl.readline(&format!("{label}: ")) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Asks a yes/no question on a fresh editor. Anything but yes is no.
pub fn confirm(question: &str) -> Result<bool> {
    let mut rl = DefaultEditor::new()?;
    confirm_with(&mut rl, question)
}

/// Asks a yes/no question on an existing editor.
pub fn confirm_with<H: Helper>(rl: &mut Editor<H, DefaultHistory>, question: &str) -> Result<bool> {
    match rl.readline(&format!("{question} [s/N] ")) {
        Ok(answer) => Ok(is_yes(&answer)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Accepts yes in English, Portuguese and Spanish.
fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim" | "si" | "sí"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        for answer in ["s", "Sim", " y ", "YES", "sí", "si"] {
            assert!(is_yes(answer), "{answer:?} should confirm");
        }
        for answer in ["", "n", "nao", "no", "talvez"] {
            assert!(!is_yes(answer), "{answer:?} should not confirm");
        }
    }
}
