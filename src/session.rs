use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::navigation::NavigatorState;

/// AuthStatus
///
/// The awaitable read the access guard consumes. Implementations may answer
/// instantly (the in-memory session) or after a round trip; the guard bounds
/// the wait either way.
#[async_trait]
pub trait AuthStatus: Send + Sync {
    async fn is_logged_in(&self) -> bool;
}

/// AuthSession
///
/// Holds the "logged in" flag for one session. The flag lives in a `watch`
/// channel: each write replaces the value wholesale and wakes every
/// subscriber, and a reader always sees exactly one current value.
///
/// The session is an explicit value shared through `Arc`, never a global.
pub struct AuthSession {
    state: watch::Sender<bool>,
    navigator: NavigatorState,
    default_route: String,
}

impl AuthSession {
    /// Creates a logged-out session. `default_route` is where every logout navigates.
    pub fn new(navigator: NavigatorState, default_route: impl Into<String>) -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state,
            navigator,
            default_route: default_route.into(),
        }
    }

    /// Marks the session as logged in. Repeated calls are harmless and never navigate.
    pub fn login(&self) {
        let was_logged_in = self.state.send_replace(true);
        tracing::info!(was_logged_in, "session logged in");
    }

    /// Marks the session as logged out and requests navigation to the default route.
    /// Every call issues its own request.
    pub fn logout(&self) {
        let was_logged_in = self.state.send_replace(false);
        tracing::info!(was_logged_in, target = %self.default_route, "session logged out");
        self.navigator.navigate(&self.default_route);
    }

    /// A receiver that observes the current value and every later change.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> bool {
        *self.state.borrow()
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }
}

#[async_trait]
impl AuthStatus for AuthSession {
    async fn is_logged_in(&self) -> bool {
        *self.state.borrow()
    }
}

/// SessionState
///
/// The concrete type used to share the session across the application state.
pub type SessionState = Arc<AuthSession>;
