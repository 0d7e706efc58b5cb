use auth_gate::{
    AuthSession, ChannelNavigator, GuardDecision, GuardFn, NavigationOutcome, NavigationRouter,
    RecordingNavigator, RecordingNotifier, RouteContext, auth_guard,
    notify::NotificationLevel,
    route_table::{MAX_REDIRECTS, RouteEntry, default_routes, normalize, spawn_navigation_worker},
};
use futures::future::BoxFuture;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

const WAIT: Duration = Duration::from_millis(200);

// --- Guard Helpers ---

fn fixed(decision: GuardDecision) -> GuardFn {
    Arc::new(move |_ctx: RouteContext| -> BoxFuture<'static, GuardDecision> {
        let decision = decision.clone();
        Box::pin(async move { decision })
    })
}

/// A guard that allows and counts how many times it ran.
fn counting(calls: Arc<AtomicUsize>) -> GuardFn {
    Arc::new(move |_ctx: RouteContext| -> BoxFuture<'static, GuardDecision> {
        calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { GuardDecision::Allow })
    })
}

fn gated_router() -> (NavigationRouter, Arc<AuthSession>, Arc<RecordingNotifier>) {
    let session = Arc::new(AuthSession::new(Arc::new(RecordingNavigator::new()), "home"));
    let notifier = Arc::new(RecordingNotifier::new());
    let guard = auth_guard(session.clone(), notifier.clone(), WAIT);
    let router = NavigationRouter::new(default_routes("home", guard));
    (router, session, notifier)
}

// --- Tests ---

#[test]
fn test_normalize_strips_slashes() {
    assert_eq!(normalize("/dashboard/"), "dashboard");
    assert_eq!(normalize("  /  "), "");
    assert_eq!(normalize("a/b"), "a/b");
}

#[tokio::test]
async fn test_public_route_activates() {
    let (router, _session, notifier) = gated_router();
    assert_eq!(router.current(), None);

    let outcome = router.navigate("/login").await;

    assert_eq!(outcome, NavigationOutcome::Activated { path: "login".into() });
    assert_eq!(router.current().as_deref(), Some("login"));
    // Unguarded routes never consult the auth guard.
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_root_redirects_to_default_route() {
    let (router, _session, _notifier) = gated_router();

    let outcome = router.navigate("/").await;

    assert_eq!(
        outcome,
        NavigationOutcome::Redirected { from: "".into(), to: "home".into() }
    );
    assert_eq!(router.current().as_deref(), Some("home"));
}

#[tokio::test]
async fn test_guarded_route_cancelled_when_logged_out() {
    let (router, _session, notifier) = gated_router();
    router.navigate("home").await;

    let outcome = router.navigate("dashboard").await;

    assert_eq!(outcome, NavigationOutcome::Cancelled { path: "dashboard".into() });
    // A cancelled navigation leaves the previous route active.
    assert_eq!(router.current().as_deref(), Some("home"));
    let seen = notifier.notifications();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].level, NotificationLevel::Alert);
}

#[tokio::test]
async fn test_guarded_route_activates_after_login() {
    let (router, session, notifier) = gated_router();
    session.login();

    let outcome = router.navigate("settings").await;

    assert_eq!(outcome, NavigationOutcome::Activated { path: "settings".into() });
    assert_eq!(notifier.notifications()[0].level, NotificationLevel::Info);
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let (router, _session, _notifier) = gated_router();

    let outcome = router.navigate("nowhere").await;

    assert_eq!(outcome, NavigationOutcome::NotFound { path: "nowhere".into() });
    assert_eq!(router.current(), None);
}

#[tokio::test]
async fn test_wildcard_catches_unknown_paths() {
    let router = NavigationRouter::new(vec![
        RouteEntry::new("home"),
        RouteEntry::redirect("**", "home"),
    ]);

    let outcome = router.navigate("missing/page").await;

    assert_eq!(
        outcome,
        NavigationOutcome::Redirected { from: "missing/page".into(), to: "home".into() }
    );
}

#[tokio::test]
async fn test_guard_redirect_reroutes() {
    let router = NavigationRouter::new(vec![
        RouteEntry::new("login"),
        RouteEntry::new("admin").guarded(fixed(GuardDecision::Redirect("/login".into()))),
    ]);

    let outcome = router.navigate("admin").await;

    assert_eq!(
        outcome,
        NavigationOutcome::Redirected { from: "admin".into(), to: "login".into() }
    );
    assert_eq!(router.current().as_deref(), Some("login"));
}

#[tokio::test]
async fn test_first_refusal_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = NavigationRouter::new(vec![
        RouteEntry::new("vault")
            .guarded(counting(calls.clone()))
            .guarded(fixed(GuardDecision::Deny))
            .guarded(counting(calls.clone())),
    ]);

    let outcome = router.navigate("vault").await;

    assert_eq!(outcome, NavigationOutcome::Cancelled { path: "vault".into() });
    // Only the guard before the refusal ran.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_redirect_loop_is_bounded() {
    let router = NavigationRouter::new(vec![
        RouteEntry::redirect("a", "b"),
        RouteEntry::redirect("b", "a"),
    ]);

    let outcome = router.navigate("a").await;

    assert_eq!(outcome, NavigationOutcome::RedirectLimit { path: "a".into() });
}

/// `r0 -> r1 -> ... -> r{hops}`, where only the last entry is a real route.
fn redirect_chain(hops: usize) -> NavigationRouter {
    let mut routes: Vec<RouteEntry> = (0..hops)
        .map(|i| RouteEntry::redirect(&format!("r{i}"), &format!("r{}", i + 1)))
        .collect();
    routes.push(RouteEntry::new(&format!("r{hops}")));
    NavigationRouter::new(routes)
}

#[tokio::test]
async fn test_redirect_chain_at_limit_activates() {
    let router = redirect_chain(MAX_REDIRECTS);

    let outcome = router.navigate("r0").await;

    assert_eq!(
        outcome,
        NavigationOutcome::Redirected {
            from: "r0".into(),
            to: format!("r{MAX_REDIRECTS}"),
        }
    );
}

#[tokio::test]
async fn test_redirect_chain_past_limit_stops() {
    let router = redirect_chain(MAX_REDIRECTS + 1);

    let outcome = router.navigate("r0").await;

    assert_eq!(outcome, NavigationOutcome::RedirectLimit { path: "r0".into() });
    assert_eq!(router.current(), None);
}

#[tokio::test]
async fn test_logout_navigation_reaches_router() {
    let (navigator, requests) = ChannelNavigator::new();
    let session = Arc::new(AuthSession::new(Arc::new(navigator), "home"));
    let notifier = Arc::new(RecordingNotifier::new());
    let guard = auth_guard(session.clone(), notifier, WAIT);
    let router = Arc::new(NavigationRouter::new(default_routes("home", guard)));
    let mut current = router.subscribe_current();
    spawn_navigation_worker(router.clone(), requests);

    session.login();
    router.navigate("dashboard").await;
    let _ = current.borrow_and_update();

    session.logout();

    tokio::time::timeout(Duration::from_secs(1), current.changed())
        .await
        .expect("worker should process the logout navigation")
        .expect("router is alive");
    assert_eq!(router.current().as_deref(), Some("home"));
}
