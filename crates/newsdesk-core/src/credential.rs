//! Persistence interface for the session credential.

use std::sync::{Mutex, PoisonError};

use crate::error::Result;

/// Storage for the single session credential string.
///
/// Pure storage with no logic of its own. Only the session manager writes to
/// it; transports may read it to attach the bearer token.
///
/// # Security Note
///
/// Implementations must never log the credential value.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, or `None` if nothing is stored.
    fn get(&self) -> Result<Option<String>>;

    /// Replaces the stored credential.
    fn set(&self, credential: &str) -> Result<()>;

    /// Removes the stored credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}

/// In-process credential store that lives as long as the value itself.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credential: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `credential`.
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Mutex::new(Some(credential.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        let guard = self.credential.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone().filter(|credential| !credential.is_empty()))
    }

    fn set(&self, credential: &str) -> Result<()> {
        let mut guard = self.credential.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.credential.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}
