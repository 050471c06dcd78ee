//! Error types for the Newsdesk console.

use thiserror::Error;

/// Error type for storage and configuration across the Newsdesk workspace.
///
/// Session and newsletter operations report their own errors
/// (`AuthError`, `DispatchError`, `CompositionError`).
#[derive(Error, Debug, Clone)]
pub enum NewsdeskError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential or config storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl NewsdeskError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<std::io::Error> for NewsdeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for NewsdeskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for NewsdeskError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, NewsdeskError>`.
pub type Result<T> = std::result::Result<T, NewsdeskError>;

/// Failure of a call to one of the remote APIs.
///
/// Produced by transport adapters; the core only inspects it to extract a
/// caller-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns the message supplied by the server, if it sent one.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => Some(detail),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail.as_deref() {
        Some(detail) if !detail.is_empty() => format!("HTTP {status}: {detail}"),
        _ => format!("HTTP {status}"),
    }
}
