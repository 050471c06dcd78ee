use super::api::SessionApi;
use super::error::AuthError;
use super::guard::RouteGuard;
use super::model::{Account, Session, SessionStatus};
use crate::credential::CredentialStore;
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Owns the session state and drives its transitions.
///
/// `SessionManager` is responsible for:
/// - Validating the stored credential once at startup
/// - Exchanging credentials for a session on login
/// - Clearing the session on logout
/// - Publishing every state change to subscribers
///
/// It is the only writer of the [`CredentialStore`].
pub struct SessionManager {
    api: Arc<dyn SessionApi>,
    store: Arc<dyn CredentialStore>,
    state: watch::Sender<Session>,
    /// Bumped by every explicit login/logout. A startup validation that
    /// observes a different generation when it resumes is discarded.
    generation: Mutex<u64>,
    /// Set once the session has left `Initializing`, by whichever of
    /// initialize, login or logout got there first.
    initialized: AtomicBool,
}

impl SessionManager {
    /// Creates a manager in the `Initializing` state.
    ///
    /// # Arguments
    ///
    /// * `api` - The remote session service
    /// * `store` - Persistence for the session credential
    pub fn new(api: Arc<dyn SessionApi>, store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            api,
            store,
            state,
            generation: Mutex::new(0),
            initialized: AtomicBool::new(false),
        }
    }

    /// Validates the stored credential and leaves `Initializing`.
    ///
    /// Fails closed: an invalid credential, a validation error, or an
    /// unreadable store all end in `Unauthenticated` with the stored
    /// credential cleared. Only the first call made while `Initializing`
    /// does any work. Later calls, and calls after a login or logout, return
    /// the current status without a remote call.
    pub async fn initialize(&self) -> SessionStatus {
        if self.initialized.swap(true, Ordering::SeqCst)
            || self.status() != SessionStatus::Initializing
        {
            return self.status();
        }

        let started_at = self.current_generation();

        let credential = match self.store.get() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!("[SessionManager] Failed to read stored credential: {}", e);
                None
            }
        };

        let Some(credential) = credential else {
            tracing::info!("[SessionManager] No stored credential");
            self.finish_initialize(started_at, None);
            return self.status();
        };

        tracing::debug!("[SessionManager] Validating stored credential");
        let validated = match self.api.validate_credential(&credential).await {
            Ok(check) if check.valid => match check.account {
                Some(account) => Session::authenticated(credential, account),
                None => {
                    tracing::warn!("[SessionManager] Validation reported valid without an account");
                    None
                }
            },
            Ok(_) => {
                tracing::warn!("[SessionManager] Stored credential is no longer valid");
                None
            }
            Err(e) => {
                tracing::warn!("[SessionManager] Credential validation failed: {}", e);
                None
            }
        };

        self.finish_initialize(started_at, validated);
        self.status()
    }

    /// Applies the startup validation result unless a login or logout has
    /// happened since it started.
    fn finish_initialize(&self, started_at: u64, validated: Option<Session>) {
        let generation = self.lock_generation();
        if *generation != started_at || self.status() != SessionStatus::Initializing {
            tracing::debug!("[SessionManager] Discarding stale startup validation");
            return;
        }

        match validated {
            Some(session) => {
                if let Some(account) = session.account() {
                    tracing::info!("[SessionManager] Session restored for {}", account.username);
                }
                self.state.send_replace(session);
            }
            None => {
                if let Err(e) = self.store.clear() {
                    tracing::warn!("[SessionManager] Failed to clear stored credential: {}", e);
                }
                self.state.send_replace(Session::unauthenticated());
            }
        }
    }

    /// Exchanges a username and password for an authenticated session.
    ///
    /// On failure nothing changes: the state, the account and the stored
    /// credential stay as they were.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Rejected`] with the remote message when one was supplied
    /// - [`AuthError::Failed`] for any other remote failure
    /// - [`AuthError::Storage`] if the credential could not be persisted
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<Account, AuthError> {
        let grant = match self.api.login(username, password).await {
            Ok(grant) => grant,
            Err(e) => {
                tracing::warn!("[SessionManager] Login failed for {}: {}", username, e);
                return Err(e
                    .remote_message()
                    .map(|message| AuthError::Rejected(message.to_string()))
                    .unwrap_or(AuthError::Failed));
            }
        };

        let account = grant.account.clone();
        let Some(session) = Session::authenticated(grant.credential, grant.account) else {
            tracing::warn!("[SessionManager] Login returned an empty credential");
            return Err(AuthError::Failed);
        };

        let mut generation = self.lock_generation();
        if let Some(credential) = session.credential() {
            self.store.set(credential).map_err(|e| {
                tracing::error!("[SessionManager] Failed to persist credential: {}", e);
                AuthError::Storage(e.to_string())
            })?;
        }
        *generation += 1;
        self.initialized.store(true, Ordering::SeqCst);
        self.state.send_replace(session);
        drop(generation);

        tracing::info!("[SessionManager] Logged in as {}", account.username);
        Ok(account)
    }

    /// Ends the session. Callable from any state, including `Initializing`.
    ///
    /// The transition to `Unauthenticated` always happens.
    ///
    /// # Errors
    ///
    /// Returns the store error if the persisted credential could not be
    /// removed.
    pub fn logout(&self) -> Result<()> {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.initialized.store(true, Ordering::SeqCst);
        self.state.send_replace(Session::unauthenticated());
        let cleared = self.store.clear();
        drop(generation);

        tracing::info!("[SessionManager] Logged out");
        cleared
    }

    /// Returns a snapshot of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    pub fn account(&self) -> Option<Account> {
        self.state.borrow().account().cloned()
    }

    /// Returns a receiver that observes every session transition.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Returns a route guard bound to this manager's session.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.subscribe())
    }

    fn current_generation(&self) -> u64 {
        *self.lock_generation()
    }

    fn lock_generation(&self) -> std::sync::MutexGuard<'_, u64> {
        self.generation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
