//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: session snapshot and account types (`Session`, `Account`)
//! - `api`: the remote session service interface (`SessionApi`)
//! - `error`: login/validation failures (`AuthError`)
//! - `manager`: the lifecycle state machine (`SessionManager`)
//! - `guard`: authorization decision for protected content (`RouteGuard`)

mod api;
mod error;
mod guard;
mod manager;
mod model;

// Re-export public API
pub use api::{CredentialCheck, LoginGrant, SessionApi};
pub use error::{AuthError, LOGIN_FALLBACK_MESSAGE};
pub use guard::{Access, RouteGuard};
pub use manager::SessionManager;
pub use model::{Account, AccountId, Session, SessionStatus};
