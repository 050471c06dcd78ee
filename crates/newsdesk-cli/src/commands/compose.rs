//! Interactive newsletter composer.

use anyhow::Result;
use colored::Colorize;
use newsdesk_core::i18n::{Language, MessageKey, incomplete_draft_warning};
use newsdesk_core::newsletter::{DispatchOutcome, ItemField, NewsletterComposer};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::newsletter::{report_outcome, write_html};
use super::{draft_file, prompt};
use crate::app::AppContext;

const COMMANDS: &[&str] = &[
    "subject", "add", "remove", "title", "content", "show", "preview", "test", "send", "reset",
    "save", "lang", "help", "quit", "exit",
];

const HELP: &str = "\
  subject <text>         set the subject
  add                    append an empty item
  remove <n>             remove item n
  title <n> <text>       set the title of item n
  content <n> <text>     set the content of item n
  show                   print the draft
  preview [file]         render the draft to HTML
  test                   send to the test audience
  send                   send to every subscriber
  reset                  discard the draft
  save [file]            write the draft to a TOML file
  lang                   switch between Portuguese and Spanish
  help                   show this list
  quit                   leave the composer";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ComposeCommand {
    Subject(String),
    Add,
    Remove(usize),
    Update {
        index: usize,
        field: ItemField,
        value: String,
    },
    Show,
    Preview(Option<PathBuf>),
    Test,
    Send,
    Reset,
    Save(Option<PathBuf>),
    ToggleLanguage,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
enum ParseError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid item number '{0}' (items start at 1)")]
    ItemNumber(String),
}

impl ComposeCommand {
    /// Parses one line. Item numbers are 1-based and become 0-based indices.
    fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "subject" => Ok(Self::Subject(rest.to_string())),
            "add" => Ok(Self::Add),
            "remove" => {
                if rest.is_empty() {
                    return Err(ParseError::Usage("remove <n>"));
                }
                Ok(Self::Remove(item_index(rest)?))
            }
            "title" | "content" => {
                let field: ItemField = word
                    .parse()
                    .map_err(|_| ParseError::Unknown(word.to_string()))?;
                let (number, value) = match rest.split_once(char::is_whitespace) {
                    Some((number, value)) => (number, value.trim()),
                    None if !rest.is_empty() => (rest, ""),
                    None => {
                        return Err(ParseError::Usage(match field {
                            ItemField::Title => "title <n> <text>",
                            ItemField::Content => "content <n> <text>",
                        }));
                    }
                };
                Ok(Self::Update {
                    index: item_index(number)?,
                    field,
                    value: value.to_string(),
                })
            }
            "show" => Ok(Self::Show),
            "preview" => Ok(Self::Preview(optional_path(rest))),
            "test" => Ok(Self::Test),
            "send" => Ok(Self::Send),
            "reset" => Ok(Self::Reset),
            "save" => Ok(Self::Save(optional_path(rest))),
            "lang" => Ok(Self::ToggleLanguage),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(ParseError::Unknown(word.to_string())),
        }
    }
}

fn item_index(number: &str) -> Result<usize, ParseError> {
    match number.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ParseError::ItemNumber(number.to_string())),
    }
}

fn optional_path(rest: &str) -> Option<PathBuf> {
    (!rest.is_empty()).then(|| PathBuf::from(rest))
}

/// Completes and hints the first word of a composer command.
struct ComposeHelper;

impl Helper for ComposeHelper {}

impl Completer for ComposeHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ComposeHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_once(' ') {
            Some((word, rest)) if COMMANDS.contains(&word) => {
                Owned(format!("{} {}", word.bright_cyan(), rest))
            }
            None if COMMANDS.contains(&line) => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ComposeHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].bright_black().to_string())
    }
}

impl Validator for ComposeHelper {}

enum Flow {
    Continue,
    Quit,
}

/// Runs the composer until `quit` or end of input.
///
/// With `draft_path`, the draft is loaded from that file when it exists and
/// `save` without an argument writes back to it.
pub async fn run(ctx: &AppContext, draft_path: Option<&Path>) -> Result<()> {
    let account = ctx.require_session().await?;

    let mut composer = match draft_path {
        Some(path) if path.exists() => NewsletterComposer::from_draft(draft_file::load(path)?),
        _ => NewsletterComposer::new(),
    };

    let mut language = ctx.language();
    let mut rl: Editor<ComposeHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ComposeHelper));

    println!(
        "{} {}",
        MessageKey::NewsletterNews.text(language).bright_magenta().bold(),
        format!("· {}", account.display_name()).bright_black()
    );
    println!("{}", "Type 'help' for commands.".bright_black());
    print!("{}", draft_file::render(composer.draft(), language));

    loop {
        match rl.readline("newsdesk> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                let command = match ComposeCommand::parse(line) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };
                let state = ComposeState {
                    composer: &mut composer,
                    rl: &mut rl,
                    language: &mut language,
                    draft_path,
                };
                match execute(ctx, state, command).await? {
                    Flow::Continue => {}
                    Flow::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Mutable state of one composer run.
struct ComposeState<'a> {
    composer: &'a mut NewsletterComposer,
    rl: &'a mut Editor<ComposeHelper, DefaultHistory>,
    language: &'a mut Language,
    draft_path: Option<&'a Path>,
}

async fn execute(ctx: &AppContext, state: ComposeState<'_>, command: ComposeCommand) -> Result<Flow> {
    let ComposeState {
        composer,
        rl,
        language,
        draft_path,
    } = state;
    let text = |key: MessageKey| key.text(*language);

    match command {
        ComposeCommand::Subject(subject) => composer.set_subject(subject),
        ComposeCommand::Add => {
            let index = composer.add_item();
            println!(
                "{} {} {}",
                "+".green(),
                text(MessageKey::NewsletterNewsCount),
                index + 1
            );
        }
        ComposeCommand::Remove(index) => {
            if !composer.remove_item(index) {
                println!(
                    "{}",
                    format!("Item {} was not removed", index + 1).yellow()
                );
            }
        }
        ComposeCommand::Update {
            index,
            field,
            value,
        } => {
            if let Err(e) = composer.update_item(index, field, value) {
                eprintln!("{}", e.to_string().red());
            }
        }
        ComposeCommand::Show => print!("{}", draft_file::render(composer.draft(), *language)),
        ComposeCommand::Preview(output) => {
            if !composer.is_eligible_for_preview() {
                println!("{}", incomplete_draft_warning(*language, false).yellow());
                return Ok(Flow::Continue);
            }
            match ctx.dispatcher.preview(composer.draft()).await {
                Ok(html) => write_html(*language, &html, output.as_deref())?,
                Err(e) => eprintln!("{}", e.user_message(*language, false).red()),
            }
        }
        ComposeCommand::Test | ComposeCommand::Send => {
            let is_test = command == ComposeCommand::Test;
            if !composer.is_eligible_for_send() {
                println!("{}", incomplete_draft_warning(*language, true).yellow());
                return Ok(Flow::Continue);
            }
            if !is_test && !prompt::confirm_with(rl, text(MessageKey::ConfirmSend))? {
                return Ok(Flow::Continue);
            }

            println!("{}", text(MessageKey::CommonLoading).bright_black());
            match ctx.dispatcher.send(composer.draft(), is_test).await {
                Ok(outcome) => {
                    report_outcome(*language, &outcome);
                    if matches!(outcome, DispatchOutcome::Delivered { .. }) {
                        composer.reset();
                    }
                }
                Err(e) => eprintln!("{}", e.user_message(*language, true).red()),
            }
        }
        ComposeCommand::Reset => composer.reset(),
        ComposeCommand::Save(path) => match path.as_deref().or(draft_path) {
            Some(path) => {
                draft_file::save(path, composer.draft())?;
                println!("{} {}", "✓".green(), path.display());
            }
            None => eprintln!("{}", ParseError::Usage("save <file>").to_string().red()),
        },
        ComposeCommand::ToggleLanguage => {
            *language = language.toggled();
            println!("{} {}", "✓".green(), language);
        }
        ComposeCommand::Help => println!("{HELP}"),
        ComposeCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
