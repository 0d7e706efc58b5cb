use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::Instrument;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::guard::{GuardDecision, GuardFn, RouteContext};

/// Redirects followed within one navigation attempt before giving up.
pub const MAX_REDIRECTS: usize = 8;
/// Routes of `default_routes` that carry no guard.
pub const PUBLIC_ROUTES: [&str; 2] = ["home", "login"];
/// Path that matches any target not matched by an earlier entry.
pub const WILDCARD: &str = "**";

/// RouteEntry
///
/// One entry of the declarative route table: a path, an optional redirect and
/// the guards consulted (in order) before the route is activated.
#[derive(Clone)]
pub struct RouteEntry {
    pub path: String,
    pub redirect_to: Option<String>,
    pub guards: Vec<GuardFn>,
}

impl RouteEntry {
    pub fn new(path: &str) -> Self {
        Self {
            path: normalize(path),
            redirect_to: None,
            guards: Vec::new(),
        }
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            redirect_to: Some(normalize(to)),
            ..Self::new(path)
        }
    }

    /// Appends a guard; guards run in the order they were attached.
    pub fn guarded(mut self, guard: GuardFn) -> Self {
        self.guards.push(guard);
        self
    }

    fn matches(&self, path: &str) -> bool {
        self.path == WILDCARD || self.path == path
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("redirect_to", &self.redirect_to)
            .field("guards", &self.guards.len())
            .finish()
    }
}

/// NavigationOutcome
///
/// The router's verdict on one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export)]
pub enum NavigationOutcome {
    /// The requested route passed its guards and is now current.
    Activated { path: String },
    /// A redirect (route-level or guard-issued) was followed and `to` is now current.
    Redirected { from: String, to: String },
    /// A guard refused; the current route is unchanged.
    Cancelled { path: String },
    /// No entry matches the path.
    NotFound { path: String },
    /// Redirects kept chaining past `MAX_REDIRECTS`.
    RedirectLimit { path: String },
}

/// NavigationRouter
///
/// Evaluates navigation attempts against an ordered route table and tracks the
/// active route. Concurrent attempts are independent: nothing is
/// de-duplicated, and the last one to activate wins.
pub struct NavigationRouter {
    routes: Vec<RouteEntry>,
    current: watch::Sender<Option<String>>,
}

impl NavigationRouter {
    pub fn new(routes: Vec<RouteEntry>) -> Self {
        let (current, _) = watch::channel(None);
        Self { routes, current }
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// The active route, `None` until the first successful navigation.
    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<String>> {
        self.current.subscribe()
    }

    /// navigate
    ///
    /// Runs one navigation attempt:
    /// 1. Find the first entry matching the normalized path.
    /// 2. Follow route-level redirects without consulting guards.
    /// 3. Run the entry's guards in order; the first non-`Allow` decision wins.
    /// 4. Activate the route when every guard allowed it.
    pub async fn navigate(&self, path: &str) -> NavigationOutcome {
        let requested = normalize(path);
        let ctx = RouteContext::new(requested.clone());
        let span = tracing::info_span!("navigation", attempt_id = %ctx.attempt_id, path = %requested);

        async move {
            let outcome = self.resolve(ctx).await;
            tracing::info!(?outcome, "navigation finished");
            outcome
        }
        .instrument(span)
        .await
    }

    async fn resolve(&self, ctx: RouteContext) -> NavigationOutcome {
        let requested = ctx.path.clone();
        let mut target = requested.clone();

        for _ in 0..=MAX_REDIRECTS {
            let Some(entry) = self.routes.iter().find(|entry| entry.matches(&target)) else {
                return NavigationOutcome::NotFound { path: target };
            };

            if let Some(to) = &entry.redirect_to {
                tracing::debug!(from = %target, to = %to, "route redirect");
                target = to.clone();
                continue;
            }

            let attempt = RouteContext {
                attempt_id: ctx.attempt_id,
                path: target.clone(),
            };

            match run_guards(&entry.guards, &attempt).await {
                GuardDecision::Allow => {
                    self.current.send_replace(Some(target.clone()));
                    return if target == requested {
                        NavigationOutcome::Activated { path: target }
                    } else {
                        NavigationOutcome::Redirected {
                            from: requested,
                            to: target,
                        }
                    };
                }
                GuardDecision::Deny => return NavigationOutcome::Cancelled { path: target },
                GuardDecision::Redirect(to) => {
                    tracing::debug!(from = %target, to = %to, "guard redirect");
                    target = normalize(&to);
                }
            }
        }

        tracing::warn!(path = %requested, limit = MAX_REDIRECTS, "redirect limit reached");
        NavigationOutcome::RedirectLimit { path: requested }
    }
}

async fn run_guards(guards: &[GuardFn], ctx: &RouteContext) -> GuardDecision {
    for guard in guards {
        let decision = guard(ctx.clone()).await;
        if decision != GuardDecision::Allow {
            return decision;
        }
    }
    GuardDecision::Allow
}

/// Strips leading and trailing slashes; `""` is the root.
pub fn normalize(path: &str) -> String {
    path.trim().trim_matches('/').to_string()
}

/// default_routes
///
/// The service's route table: the root redirects to `default_route`, `home`
/// and `login` are public, `dashboard` and `settings` sit behind `guard`.
pub fn default_routes(default_route: &str, guard: GuardFn) -> Vec<RouteEntry> {
    vec![
        RouteEntry::redirect("", default_route),
        RouteEntry::new(PUBLIC_ROUTES[0]),
        RouteEntry::new(PUBLIC_ROUTES[1]),
        RouteEntry::new("dashboard").guarded(Arc::clone(&guard)),
        RouteEntry::new("settings").guarded(guard),
    ]
}

/// RouterState
///
/// The concrete type used to share the navigation router.
pub type RouterState = Arc<NavigationRouter>;

/// spawn_navigation_worker
///
/// Drains programmatic navigation requests (see `navigation::ChannelNavigator`)
/// and runs each one through the router. Ends when every sender is dropped or
/// the returned handle is aborted. When the session's sender is reachable from
/// the router's guards the channel never closes, so the caller owns the abort
/// (see `AppState`).
pub fn spawn_navigation_worker(
    router: RouterState,
    mut requests: mpsc::UnboundedReceiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(target) = requests.recv().await {
            let outcome = router.navigate(&target).await;
            tracing::debug!(target = %target, ?outcome, "programmatic navigation");
        }
        tracing::debug!("navigation worker stopped");
    })
}
