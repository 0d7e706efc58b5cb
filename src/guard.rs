use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::{
    error::GuardError,
    notify::{Notification, Notifier, NotifierState},
    session::AuthStatus,
};

/// Informational message emitted when access is granted.
pub const AUTHORIZED_MESSAGE: &str = "Authorized";
/// Blocking message emitted when access is refused.
pub const DENIED_MESSAGE: &str = "You must be logged in to view this page";

/// RouteContext
///
/// Describes one navigation attempt. The router fills it in for every guard it
/// consults; the auth guard only uses it for logging.
#[derive(Debug, Clone)]
pub struct RouteContext {
    /// Unique per navigation attempt, used to correlate log lines.
    pub attempt_id: Uuid,
    /// Normalized target path (no leading or trailing `/`).
    pub path: String,
}

impl RouteContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            path: path.into(),
        }
    }
}

/// GuardDecision
///
/// What a guard tells the router: continue, cancel, or cancel and go elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny,
    Redirect(String),
}

impl From<bool> for GuardDecision {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// GuardFn
///
/// A guard is a plain async function of the route context.
pub type GuardFn = Arc<dyn Fn(RouteContext) -> BoxFuture<'static, GuardDecision> + Send + Sync>;

/// can_activate
///
/// The access decision. Reads the auth state exactly once, bounded by `wait`,
/// emits one notification and returns the flag as the decision:
///
/// * logged in: `Info` notification, `true`.
/// * logged out: `Alert` notification, `false`.
/// * read timed out: logged as a warning, then handled as logged out.
pub async fn can_activate(
    status: &dyn AuthStatus,
    notifier: &dyn Notifier,
    ctx: &RouteContext,
    wait: Duration,
) -> bool {
    let logged_in = match read_status(status, wait).await {
        Ok(logged_in) => logged_in,
        Err(e) => {
            tracing::warn!(attempt_id = %ctx.attempt_id, path = %ctx.path, error = %e, "denying navigation");
            false
        }
    };

    if logged_in {
        notifier.notify(Notification::info(AUTHORIZED_MESSAGE));
    } else {
        notifier.notify(Notification::alert(DENIED_MESSAGE));
    }

    tracing::debug!(attempt_id = %ctx.attempt_id, path = %ctx.path, allowed = logged_in, "access decision");
    logged_in
}

async fn read_status(status: &dyn AuthStatus, wait: Duration) -> Result<bool, GuardError> {
    tokio::time::timeout(wait, status.is_logged_in())
        .await
        .map_err(|_| GuardError::Timeout(wait))
}

/// auth_guard
///
/// Packages `can_activate` as a `GuardFn` ready to be attached to route entries.
pub fn auth_guard(status: Arc<dyn AuthStatus>, notifier: NotifierState, wait: Duration) -> GuardFn {
    Arc::new(move |ctx: RouteContext| -> BoxFuture<'static, GuardDecision> {
        let status = Arc::clone(&status);
        let notifier = Arc::clone(&notifier);
        Box::pin(async move {
            let allowed = can_activate(status.as_ref(), notifier.as_ref(), &ctx, wait).await;
            GuardDecision::from(allowed)
        })
    })
}
