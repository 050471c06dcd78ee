//! Remote session service interface.

use async_trait::async_trait;

use super::model::Account;
use crate::error::ApiError;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub credential: String,
    pub account: Account,
}

/// Result of validating a stored credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialCheck {
    pub valid: bool,
    pub account: Option<Account>,
}

impl CredentialCheck {
    pub fn valid(account: Account) -> Self {
        Self {
            valid: true,
            account: Some(account),
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            account: None,
        }
    }
}

/// The remote service that issues and validates session credentials.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Exchanges a username and password for a credential.
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ApiError>;

    /// Checks whether `credential` still grants access.
    async fn validate_credential(&self, credential: &str) -> Result<CredentialCheck, ApiError>;
}
