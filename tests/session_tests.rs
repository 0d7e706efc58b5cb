use auth_gate::{AuthSession, AuthStatus, RecordingNavigator};
use std::{sync::Arc, time::Duration};

fn session_with_recorder() -> (AuthSession, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let session = AuthSession::new(navigator.clone(), "home");
    (session, navigator)
}

#[tokio::test]
async fn test_new_session_is_logged_out() {
    let (session, navigator) = session_with_recorder();

    assert!(!session.is_logged_in().await);
    assert!(!session.snapshot());
    assert!(navigator.requests().is_empty());
}

#[tokio::test]
async fn test_login_holds_until_logout() {
    let (session, navigator) = session_with_recorder();

    session.login();
    for _ in 0..3 {
        assert!(session.is_logged_in().await);
    }
    // Login never navigates.
    assert!(navigator.requests().is_empty());

    session.logout();
    assert!(!session.is_logged_in().await);
}

#[tokio::test]
async fn test_logout_navigates_to_default_route_once() {
    let (session, navigator) = session_with_recorder();
    session.login();

    session.logout();

    assert!(!session.is_logged_in().await);
    assert_eq!(navigator.requests(), vec!["home".to_string()]);
}

#[tokio::test]
async fn test_double_login_is_idempotent() {
    let (session, navigator) = session_with_recorder();

    session.login();
    session.login();

    assert!(session.is_logged_in().await);
    assert!(navigator.requests().is_empty());
}

#[tokio::test]
async fn test_every_logout_navigates() {
    let (session, navigator) = session_with_recorder();

    session.logout();
    session.logout();

    assert!(!session.is_logged_in().await);
    assert_eq!(navigator.requests(), vec!["home".to_string(), "home".to_string()]);
}

#[tokio::test]
async fn test_subscribers_observe_changes() {
    let (session, _navigator) = session_with_recorder();
    let mut rx = session.subscribe();
    assert!(!*rx.borrow_and_update());

    session.login();
    tokio::time::timeout(Duration::from_secs(1), rx.changed())
        .await
        .expect("subscriber should be woken")
        .expect("sender is alive");
    assert!(*rx.borrow_and_update());

    session.logout();
    rx.changed().await.expect("sender is alive");
    assert!(!*rx.borrow_and_update());
}

#[tokio::test]
async fn test_late_subscriber_sees_current_value() {
    let (session, _navigator) = session_with_recorder();
    session.login();

    let rx = session.subscribe();
    assert!(*rx.borrow());
}
