use super::model::{Session, SessionStatus};
use tokio::sync::watch;

/// What the caller should do with protected content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session is still initializing; show a waiting indicator.
    Pending,
    /// No session; send the caller to the login entry point.
    Redirect,
    /// Render the protected content.
    Authorized,
}

/// Gate for protected operations.
///
/// Holds no decision of its own: every read evaluates the latest session
/// snapshot, so an authorization never outlives the session that granted it.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: watch::Receiver<Session>,
}

impl RouteGuard {
    pub fn new(session: watch::Receiver<Session>) -> Self {
        Self { session }
    }

    /// Maps a session snapshot to an access decision.
    pub fn evaluate(session: &Session) -> Access {
        match session.status() {
            SessionStatus::Initializing => Access::Pending,
            SessionStatus::Unauthenticated => Access::Redirect,
            SessionStatus::Authenticated => Access::Authorized,
        }
    }

    /// Decision for the current session.
    pub fn current(&self) -> Access {
        Self::evaluate(&self.session.borrow())
    }

    /// Waits for the next session transition and returns the new decision.
    ///
    /// Returns `None` once the session manager has been dropped.
    pub async fn changed(&mut self) -> Option<Access> {
        self.session.changed().await.ok()?;
        Some(Self::evaluate(&self.session.borrow_and_update()))
    }

    /// Waits until the decision is no longer [`Access::Pending`].
    pub async fn settled(&mut self) -> Access {
        loop {
            let access = Self::evaluate(&self.session.borrow_and_update());
            if access != Access::Pending {
                return access;
            }
            if self.session.changed().await.is_err() {
                return self.current();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::{Account, AccountId};

    fn authenticated() -> Session {
        let account = Account {
            id: AccountId::from(7),
            username: "editor".to_string(),
            email: "editor@example.com".to_string(),
            full_name: None,
            is_admin: false,
            active: true,
        };
        Session::authenticated("tok", account).unwrap()
    }

    #[test]
    fn test_evaluate_each_status() {
        assert_eq!(RouteGuard::evaluate(&Session::initializing()), Access::Pending);
        assert_eq!(
            RouteGuard::evaluate(&Session::unauthenticated()),
            Access::Redirect
        );
        assert_eq!(RouteGuard::evaluate(&authenticated()), Access::Authorized);
    }

    #[tokio::test]
    async fn test_decision_follows_transitions() {
        let (tx, rx) = watch::channel(Session::initializing());
        let mut guard = RouteGuard::new(rx);
        assert_eq!(guard.current(), Access::Pending);

        tx.send_replace(authenticated());
        assert_eq!(guard.changed().await, Some(Access::Authorized));

        // A logout must revoke a decision read earlier.
        tx.send_replace(Session::unauthenticated());
        assert_eq!(guard.current(), Access::Redirect);
    }

    #[tokio::test]
    async fn test_settled_waits_past_pending() {
        let (tx, rx) = watch::channel(Session::initializing());
        let mut guard = RouteGuard::new(rx);

        let waiter = tokio::spawn(async move { guard.settled().await });
        tokio::task::yield_now().await;
        tx.send_replace(Session::unauthenticated());

        assert_eq!(waiter.await.unwrap(), Access::Redirect);
    }

    #[tokio::test]
    async fn test_changed_ends_when_sender_dropped() {
        let (tx, rx) = watch::channel(Session::initializing());
        let mut guard = RouteGuard::new(rx);
        drop(tx);

        assert_eq!(guard.changed().await, None);
    }
}
