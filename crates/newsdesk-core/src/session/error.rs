use thiserror::Error;

use crate::i18n::{Language, MessageKey};

/// Message reported when a login fails without a server-supplied reason.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed";

/// Why a login attempt did not produce an authenticated session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The remote service refused the login and said why.
    #[error("{0}")]
    Rejected(String),

    /// The login failed without a usable reason (transport error, bad response).
    #[error("{}", LOGIN_FALLBACK_MESSAGE)]
    Failed,

    /// The credential was issued but could not be persisted.
    #[error("Failed to store credential: {0}")]
    Storage(String),
}

impl AuthError {
    /// Message to show the user: the remote reason verbatim, otherwise the
    /// localized generic login error.
    pub fn user_message(&self, language: Language) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Failed => MessageKey::LoginError.text(language).to_string(),
            Self::Storage(_) => format!(
                "{}: {}",
                MessageKey::CommonError.text(language),
                self
            ),
        }
    }
}
