use thiserror::Error;

use crate::i18n::{Language, MessageKey, incomplete_draft_warning};

/// The draft is not eligible for preview or send.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Draft is incomplete: missing {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<String>,
}

/// Failure of a preview or send.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote rendering failed; carries the remote message.
    #[error("Preview failed: {0}")]
    Preview(String),

    /// Remote delivery failed in transport; carries the remote message.
    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    /// Another send on the same dispatcher has not finished yet.
    #[error("A send is already in progress")]
    Busy,
}

impl DispatchError {
    /// Localized message for the console. `sending` selects the wording of
    /// the incomplete-draft warning.
    pub fn user_message(&self, language: Language, sending: bool) -> String {
        match self {
            Self::Validation(_) => incomplete_draft_warning(language, sending),
            Self::Preview(message) => {
                format!("{}: {}", MessageKey::ErrorPreview.text(language), message)
            }
            Self::Dispatch(message) => {
                format!("{}: {}", MessageKey::ErrorSend.text(language), message)
            }
            Self::Busy => MessageKey::DispatchBusy.text(language).to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Contract violation while editing a draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("Item index {index} is out of range (draft has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ValidationError {
            missing: vec!["subject".to_string(), "items[0].title".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Draft is incomplete: missing subject, items[0].title"
        );
    }

    #[test]
    fn test_user_messages() {
        let err = DispatchError::Preview("template not found".to_string());
        assert_eq!(
            err.user_message(Language::Pt, false),
            "Erro ao gerar preview: template not found"
        );

        let err = DispatchError::from(ValidationError { missing: vec![] });
        assert!(err.is_validation());
        assert_eq!(
            err.user_message(Language::Pt, true),
            "Preencha todos os campos antes de enviar"
        );
    }
}
