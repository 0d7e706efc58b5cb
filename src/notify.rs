use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// NotificationLevel
///
/// `Info` is an informational message; `Alert` is the blocking notice shown
/// when access is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NotificationLevel {
    Info,
    Alert,
}

/// Notification
///
/// A single message directed at the person driving the navigation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    #[ts(type = "string")]
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Alert, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

// 1. Notifier Contract
/// Notifier
///
/// Fire-and-forget output channel for notifications. No acknowledgement is
/// read back into the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

// 2. The Real Implementation
/// TracingNotifier
///
/// Writes notifications to the log: `Info` at info level, `Alert` at warn level
/// so denials stand out in both the pretty and JSON formats.
#[derive(Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => {
                tracing::info!(target: "auth_gate::notify", message = %notification.message)
            }
            NotificationLevel::Alert => {
                tracing::warn!(target: "auth_gate::notify", alert = %notification.message)
            }
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// RecordingNotifier
///
/// Keeps every notification in memory, in emission order.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// NotifierState
///
/// The concrete type used to share the notifier across guards and handlers.
pub type NotifierState = Arc<dyn Notifier>;
