use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Guarded Router Module
///
/// Pages that require a logged-in session. The router returned here must be
/// wrapped in the access guard layer (see `create_router`); the handlers
/// themselves perform no checks.
pub fn guarded_routes() -> Router<AppState> {
    Router::new()
        .route("/pages/dashboard", get(handlers::get_dashboard_page))
        .route("/pages/settings", get(handlers::get_settings_page))
}
