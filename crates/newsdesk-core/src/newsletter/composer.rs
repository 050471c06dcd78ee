use super::error::CompositionError;
use super::model::{ItemField, NewsItem, NewsletterDraft};

/// Editor for a single newsletter draft.
///
/// All operations are synchronous. The draft never drops below one item:
/// removals that would do so, and removals of indices that do not exist, are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct NewsletterComposer {
    draft: NewsletterDraft,
}

impl NewsletterComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes editing an existing draft.
    pub fn from_draft(draft: NewsletterDraft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &NewsletterDraft {
        &self.draft
    }

    /// Appends an empty item and returns its index.
    pub fn add_item(&mut self) -> usize {
        let items = self.draft.items_mut();
        items.push(NewsItem::default());
        items.len() - 1
    }

    /// Removes the item at `index`. Returns whether anything was removed.
    pub fn remove_item(&mut self, index: usize) -> bool {
        let items = self.draft.items_mut();
        if items.len() <= 1 || index >= items.len() {
            return false;
        }
        items.remove(index);
        true
    }

    /// Replaces one field of the item at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::IndexOutOfRange`] if no item has that index.
    pub fn update_item(
        &mut self,
        index: usize,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<(), CompositionError> {
        let items = self.draft.items_mut();
        let len = items.len();
        let item = items
            .get_mut(index)
            .ok_or(CompositionError::IndexOutOfRange { index, len })?;

        match field {
            ItemField::Title => item.title = value.into(),
            ItemField::Content => item.content = value.into(),
        }
        Ok(())
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.draft.set_subject(subject.into());
    }

    /// Discards the draft, leaving an empty subject and one empty item.
    pub fn reset(&mut self) {
        self.draft = NewsletterDraft::new();
    }

    pub fn is_eligible_for_preview(&self) -> bool {
        self.draft.is_eligible()
    }

    /// Same rule as [`Self::is_eligible_for_preview`].
    pub fn is_eligible_for_send(&self) -> bool {
        self.draft.is_eligible()
    }

    pub fn missing_fields(&self) -> Vec<String> {
        self.draft.missing_fields()
    }
}
