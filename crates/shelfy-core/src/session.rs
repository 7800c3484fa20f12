// ── Session capability ──
//
// The bearer token lives in one `Session` value that is cloned into every
// controller. Login installs a token, logout clears it; requests only
// ever read it. Observers subscribe to be told when the token changes
// (the TUI uses this to bounce back to the login screen).

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::info;

/// Shared handle to the current auth token.
///
/// Cheaply cloneable; all clones observe the same token.
#[derive(Clone)]
pub struct Session {
    token: Arc<watch::Sender<Option<SecretString>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Session {
    /// A session with no token.
    pub fn anonymous() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            token: Arc::new(tx),
        }
    }

    /// A session that starts out logged in (token loaded from storage).
    pub fn with_token(token: SecretString) -> Self {
        let session = Self::anonymous();
        session.token.send_replace(Some(token));
        session
    }

    /// Current token, if logged in.
    pub fn token(&self) -> Option<SecretString> {
        self.token.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Install a freshly acquired token.
    pub fn login(&self, token: SecretString) {
        self.token.send_replace(Some(token));
        info!("session established");
    }

    /// Drop the token. Idempotent.
    pub fn logout(&self) {
        if self.token.send_replace(None).is_some() {
            info!("session cleared");
        }
    }

    /// Watch for login/logout transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<SecretString>> {
        self.token.subscribe()
    }

    /// Decide whether a screen of the given kind may render now.
    pub fn guard(&self, kind: RouteKind) -> RouteDecision {
        match (kind, self.is_authenticated()) {
            (RouteKind::Private, false) => RouteDecision::RedirectToLogin,
            (RouteKind::Public, true) => RouteDecision::RedirectToHome,
            _ => RouteDecision::Render,
        }
    }
}

/// Access class of a screen or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Login, register: only for anonymous users.
    Public,
    /// Everything that talks to the API with a token.
    Private,
}

/// Outcome of [`Session::guard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    RedirectToLogin,
    RedirectToHome,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn login_logout_lifecycle() {
        let session = Session::anonymous();
        assert!(session.token().is_none());

        session.login(SecretString::from("abc".to_owned()));
        assert_eq!(session.token().unwrap().expose_secret(), "abc");

        let clone = session.clone();
        clone.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn guards_follow_token_presence() {
        let session = Session::anonymous();
        assert_eq!(session.guard(RouteKind::Private), RouteDecision::RedirectToLogin);
        assert_eq!(session.guard(RouteKind::Public), RouteDecision::Render);

        session.login(SecretString::from("t".to_owned()));
        assert_eq!(session.guard(RouteKind::Private), RouteDecision::Render);
        assert_eq!(session.guard(RouteKind::Public), RouteDecision::RedirectToHome);
    }

    #[tokio::test]
    async fn subscribers_see_logout() {
        let session = Session::with_token(SecretString::from("t".to_owned()));
        let mut rx = session.subscribe();
        session.logout();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
