use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lifecycle state of the console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Startup validation has not completed yet.
    Initializing,
    Authenticated,
    Unauthenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Initializing => "initializing",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        };
        f.write_str(label)
    }
}

/// Identifier of a remote account.
///
/// The remote service has used both numeric and UUID identifiers, so both
/// JSON numbers and strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for AccountId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(id) => Self(id.to_string()),
            RawId::Text(id) => Self(id),
        })
    }
}

/// Snapshot of the signed-in account as returned by the remote service.
///
/// Replaced wholesale on every successful login or validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Account {
    /// Name to greet the user with: the full name when known, else the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Point-in-time view of the session.
///
/// Fields are private so that the only way to build a session is through the
/// constructors, which keep `credential` and `account` present exactly when
/// the status is [`SessionStatus::Authenticated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    status: SessionStatus,
    credential: Option<String>,
    account: Option<Account>,
}

impl Session {
    pub fn initializing() -> Self {
        Self {
            status: SessionStatus::Initializing,
            credential: None,
            account: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            credential: None,
            account: None,
        }
    }

    /// Builds an authenticated session.
    ///
    /// Returns `None` for an empty credential, which can never authenticate.
    pub fn authenticated(credential: impl Into<String>, account: Account) -> Option<Self> {
        let credential = credential.into();
        if credential.is_empty() {
            return None;
        }

        Some(Self {
            status: SessionStatus::Authenticated,
            credential: Some(credential),
            account: Some(account),
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}
