use crate::{
    models::{CurrentRouteResponse, NavigateRequest, PageResponse, SessionResponse},
    route_table::{NavigationOutcome, RouterState},
    session::SessionState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

// --- Session Handlers ---

/// login
///
/// [Public Route] Marks the session as logged in. Accepts no credentials.
#[utoipa::path(
    post,
    path = "/login",
    responses((status = 200, description = "Logged in", body = SessionResponse))
)]
pub async fn login(State(session): State<SessionState>) -> Json<SessionResponse> {
    session.login();
    Json(SessionResponse {
        logged_in: true,
        redirect_to: None,
    })
}

/// logout
///
/// [Public Route] Marks the session as logged out. The session also queues a
/// navigation to the default route; it is processed by the navigation worker,
/// so `GET /route` reflects it shortly after this returns.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Logged out", body = SessionResponse))
)]
pub async fn logout(State(session): State<SessionState>) -> Json<SessionResponse> {
    session.logout();
    Json(SessionResponse {
        logged_in: false,
        redirect_to: Some(session.default_route().to_string()),
    })
}

/// get_session
///
/// [Public Route] Reports the current flag.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Current session", body = SessionResponse))
)]
pub async fn get_session(State(session): State<SessionState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        logged_in: session.snapshot(),
        redirect_to: None,
    })
}

// --- Navigation Handlers ---

/// navigate
///
/// [Public Route] Runs one navigation attempt through the route table.
/// Guard denials are ordinary outcomes (200 with `cancelled`); only an
/// unknown path maps to 404.
#[utoipa::path(
    post,
    path = "/navigate",
    request_body = NavigateRequest,
    responses(
        (status = 200, description = "Navigation outcome", body = NavigationOutcome),
        (status = 404, description = "No route matches", body = NavigationOutcome)
    )
)]
pub async fn navigate(
    State(router): State<RouterState>,
    Json(payload): Json<NavigateRequest>,
) -> impl IntoResponse {
    let outcome = router.navigate(&payload.path).await;
    let status = match &outcome {
        NavigationOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    (status, Json(outcome))
}

/// get_current_route
///
/// [Public Route] The route most recently activated by the router.
#[utoipa::path(
    get,
    path = "/route",
    responses((status = 200, description = "Active route", body = CurrentRouteResponse))
)]
pub async fn get_current_route(State(router): State<RouterState>) -> Json<CurrentRouteResponse> {
    Json(CurrentRouteResponse {
        path: router.current(),
    })
}

// --- Page Handlers ---

/// get_home_page
///
/// [Public Route]
#[utoipa::path(
    get,
    path = "/pages/home",
    responses((status = 200, description = "Home page", body = PageResponse))
)]
pub async fn get_home_page() -> Json<PageResponse> {
    Json(page("home", "Home", false))
}

/// get_dashboard_page
///
/// [Guarded Route] Only reached when the access guard allowed the request.
#[utoipa::path(
    get,
    path = "/pages/dashboard",
    responses(
        (status = 200, description = "Dashboard page", body = PageResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_dashboard_page() -> Json<PageResponse> {
    Json(page("dashboard", "Dashboard", true))
}

/// get_settings_page
///
/// [Guarded Route]
#[utoipa::path(
    get,
    path = "/pages/settings",
    responses(
        (status = 200, description = "Settings page", body = PageResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_settings_page() -> Json<PageResponse> {
    Json(page("settings", "Settings", true))
}

fn page(route: &str, title: &str, protected: bool) -> PageResponse {
    PageResponse {
        route: route.to_string(),
        title: title.to_string(),
        protected,
    }
}
