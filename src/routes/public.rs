use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable with or without a logged-in session. Session control
/// must stay here: login cannot sit behind the guard.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
        // POST /login, POST /logout
        // Flip the session flag. Logout also queues navigation to the default route.
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        // GET /session
        .route("/session", get(handlers::get_session))
        // POST /navigate
        // Runs a navigation attempt through the route table (guards included).
        .route("/navigate", post(handlers::navigate))
        // GET /route
        // The route currently active in the navigation router.
        .route("/route", get(handlers::get_current_route))
        .route("/pages/home", get(handlers::get_home_page))
}
