//! Domain core of the Newsdesk console.
//!
//! Owns the session lifecycle state machine that gates the console and the
//! newsletter composition/dispatch workflow. Remote services and credential
//! persistence are consumed through the traits defined here and implemented
//! by the infrastructure and interaction crates.

pub mod config;
pub mod credential;
pub mod error;
pub mod i18n;
pub mod newsletter;
pub mod session;

// Re-export common error type
pub use error::{ApiError, NewsdeskError, Result};
