use anyhow::{Context, Result, bail};
use colored::Colorize;
use newsdesk_core::i18n::{Language, MessageKey, sent_summary};
use newsdesk_core::newsletter::{DispatchError, DispatchOutcome, ValidationError};
use std::path::Path;

use super::{draft_file, prompt};
use crate::app::AppContext;

pub async fn preview(ctx: &AppContext, draft: &Path, output: Option<&Path>) -> Result<()> {
    let draft = draft_file::load(draft)?;
    ctx.require_session().await?;

    let html = ctx
        .dispatcher
        .preview(&draft)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message(ctx.language(), false)))?;

    write_html(ctx.language(), &html, output)
}

pub async fn send(
    ctx: &AppContext,
    draft: &Path,
    is_test: bool,
    assume_yes: bool,
    recipients: Vec<String>,
) -> Result<()> {
    let draft = draft_file::load(draft)?;
    ctx.require_session().await?;

    if !draft.is_eligible() {
        let missing = draft.missing_fields();
        bail!(DispatchError::from(ValidationError { missing }).user_message(ctx.language(), true));
    }
    if !is_test && !assume_yes && !prompt::confirm(ctx.text(MessageKey::ConfirmSend))? {
        return Ok(());
    }

    println!("{}", ctx.text(MessageKey::CommonLoading).bright_black());
    let recipients = (!recipients.is_empty()).then_some(recipients);
    let outcome = ctx
        .dispatcher
        .send_to(&draft, is_test, recipients)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message(ctx.language(), true)))?;

    report_outcome(ctx.language(), &outcome);
    ensure_delivered(ctx.language(), &outcome)
}

/// Turns a rejected delivery into an error. The remote message has already
/// been printed by [`report_outcome`], so it is not repeated.
fn ensure_delivered(language: Language, outcome: &DispatchOutcome) -> Result<()> {
    if let DispatchOutcome::Rejected { .. } = outcome {
        bail!(MessageKey::DeliveryRejected.text(language));
    }
    Ok(())
}

/// Writes HTML to `output`, or to stdout.
pub fn write_html(language: Language, html: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {} → {}",
                "✓".green(),
                MessageKey::NewsletterPreviewTitle.text(language),
                path.display()
            );
        }
        None => println!("{html}"),
    }
    Ok(())
}

/// Prints the result of a send that reached the delivery service.
pub fn report_outcome(language: Language, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::TestDelivered { .. } => {
            println!("{} {}", "✓".green(), MessageKey::TestSent.text(language));
        }
        DispatchOutcome::Delivered {
            total_sent,
            total_failed,
            errors,
            ..
        } => {
            println!("{} {}", "✓".green(), sent_summary(language, *total_sent));
            if let Some(failed) = total_failed.filter(|failed| *failed > 0) {
                println!(
                    "{}",
                    format!("  {}: {}", MessageKey::CommonError.text(language), failed).yellow()
                );
            }
            for error in errors {
                println!("{}", format!("  - {error}").yellow());
            }
        }
        DispatchOutcome::Rejected { message } => {
            println!(
                "{} {}: {}",
                "✗".red(),
                MessageKey::DeliveryRejected.text(language),
                message
            );
        }
    }
}
