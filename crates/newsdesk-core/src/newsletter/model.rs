use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A single news entry of a newsletter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Whether both fields have content. Whitespace counts as content.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.content.is_empty()
    }
}

/// Editable field of a [`NewsItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ItemField {
    Title,
    Content,
}

/// In-progress newsletter: a subject and an ordered, never-empty list of items.
///
/// Reads are public; mutation goes through
/// [`NewsletterComposer`](super::NewsletterComposer), which keeps the
/// one-item floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDraft")]
pub struct NewsletterDraft {
    subject: String,
    items: Vec<NewsItem>,
}

/// Deserialization shape; missing or empty item lists become one empty item.
#[derive(Deserialize)]
struct RawDraft {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    items: Vec<NewsItem>,
}

impl From<RawDraft> for NewsletterDraft {
    fn from(raw: RawDraft) -> Self {
        Self::with_items(raw.subject, raw.items)
    }
}

impl Default for NewsletterDraft {
    fn default() -> Self {
        Self {
            subject: String::new(),
            items: vec![NewsItem::default()],
        }
    }
}

impl NewsletterDraft {
    /// Creates a blank draft with one empty item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a draft from existing content. An empty `items` list is
    /// replaced by a single empty item.
    pub fn with_items(subject: impl Into<String>, items: Vec<NewsItem>) -> Self {
        let items = if items.is_empty() {
            vec![NewsItem::default()]
        } else {
            items
        };
        Self {
            subject: subject.into(),
            items,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    /// Whether the draft may be previewed or sent.
    pub fn is_eligible(&self) -> bool {
        !self.subject.is_empty() && self.items.iter().all(NewsItem::is_complete)
    }

    /// Names the fields that block eligibility, e.g. `subject` or
    /// `items[2].content` (zero-based).
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.subject.is_empty() {
            missing.push("subject".to_string());
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.title.is_empty() {
                missing.push(format!("items[{index}].title"));
            }
            if item.content.is_empty() {
                missing.push(format!("items[{index}].content"));
            }
        }
        missing
    }

    pub(super) fn set_subject(&mut self, subject: String) {
        self.subject = subject;
    }

    pub(super) fn items_mut(&mut self) -> &mut Vec<NewsItem> {
        &mut self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_draft_has_one_empty_item() {
        let draft = NewsletterDraft::new();

        assert_eq!(draft.subject(), "");
        assert_eq!(draft.items(), &[NewsItem::default()]);
        assert!(!draft.is_eligible());
    }

    #[test]
    fn test_eligibility_requires_every_field() {
        let draft = NewsletterDraft::with_items(
            "Weekly Update",
            vec![NewsItem::new("A", "B"), NewsItem::new("C", "")],
        );

        assert!(!draft.is_eligible());
        assert_eq!(draft.missing_fields(), vec!["items[1].content".to_string()]);

        let draft = NewsletterDraft::with_items("", vec![NewsItem::new("A", "B")]);
        assert_eq!(draft.missing_fields(), vec!["subject".to_string()]);

        let draft = NewsletterDraft::with_items("Weekly Update", vec![NewsItem::new("A", "B")]);
        assert!(draft.is_eligible());
        assert!(draft.missing_fields().is_empty());
    }

    #[test]
    fn test_whitespace_counts_as_content() {
        let draft = NewsletterDraft::with_items(" ", vec![NewsItem::new(" ", " ")]);
        assert!(draft.is_eligible());
    }

    #[test]
    fn test_deserialize_keeps_item_floor() {
        let draft: NewsletterDraft = toml::from_str(r#"subject = "Weekly Update""#).unwrap();
        assert_eq!(draft.items().len(), 1);

        let draft: NewsletterDraft = toml::from_str(
            r#"
subject = "Weekly Update"

[[items]]
title = "A"
content = "B"

[[items]]
title = "C"
"#,
        )
        .unwrap();
        assert_eq!(draft.items().len(), 2);
        assert_eq!(draft.items()[1], NewsItem::new("C", ""));
    }

    #[test]
    fn test_item_field_parsing() {
        assert_eq!(ItemField::from_str("title").unwrap(), ItemField::Title);
        assert_eq!(ItemField::from_str("Content").unwrap(), ItemField::Content);
        assert!(ItemField::from_str("body").is_err());
    }
}
