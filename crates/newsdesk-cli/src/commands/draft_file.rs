//! Draft files on disk.
//!
//! ```toml
//! subject = "Weekly Update"
//!
//! [[items]]
//! title = "A"
//! content = "B"
//! ```

use anyhow::{Context, Result};
use colored::Colorize;
use newsdesk_core::i18n::{Language, MessageKey};
use newsdesk_core::newsletter::NewsletterDraft;
use std::path::Path;

pub fn load(path: &Path) -> Result<NewsletterDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid draft {}", path.display()))
}

pub fn save(path: &Path, draft: &NewsletterDraft) -> Result<()> {
    let content = toml::to_string_pretty(draft).context("Failed to serialize draft")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write draft {}", path.display()))
}

/// Human-readable listing of a draft with 1-based item numbers.
pub fn render(draft: &NewsletterDraft, language: Language) -> String {
    let mut out = String::new();
    let subject = if draft.subject().is_empty() {
        "-".bright_black().to_string()
    } else {
        draft.subject().bold().to_string()
    };
    out.push_str(&format!(
        "{}: {}\n",
        MessageKey::NewsletterSubject.text(language),
        subject
    ));

    for (index, item) in draft.items().iter().enumerate() {
        out.push_str(&format!(
            "\n{} {}\n",
            MessageKey::NewsletterNewsCount.text(language),
            index + 1
        ));
        out.push_str(&format!(
            "  {}: {}\n",
            MessageKey::NewsletterTitleLabel.text(language),
            item.title
        ));
        out.push_str(&format!(
            "  {}: {}\n",
            MessageKey::NewsletterContentLabel.text(language),
            item.content
        ));
    }
    out
}
