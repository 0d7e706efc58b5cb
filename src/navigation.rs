use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

// 1. Navigator Contract
/// Navigator
///
/// One-way channel for programmatic navigation requests. The session issues a
/// request on logout; whoever sits on the other end (the navigation worker in
/// the running service, a recorder in tests) decides what to do with it.
/// Requests are fire-and-forget: nothing is read back.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

// 2. Channel-backed Implementation
/// ChannelNavigator
///
/// Forwards each request over an unbounded `mpsc` channel. The receiving half
/// is handed to `route_table::spawn_navigation_worker`.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, target: &str) {
        if self.tx.send(target.to_string()).is_err() {
            // Worker is gone (shutdown); the request has nowhere to go.
            tracing::warn!(target = %target, "navigation worker closed, request dropped");
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// RecordingNavigator
///
/// Records every navigation request in call order so tests can assert on how
/// many were issued and where they pointed.
#[derive(Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.to_string());
    }
}

/// NavigatorState
///
/// The concrete type used to share a navigator with the session.
pub type NavigatorState = Arc<dyn Navigator>;
