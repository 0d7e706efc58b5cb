use axum::{
    extract::{FromRef, Request, State},
    http::{HeaderName, StatusCode},
    Router,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core gate: session flag, access decision and the navigation router.
pub mod session;
pub mod guard;
pub mod navigation;
pub mod notify;
pub mod route_table;

// HTTP surface and ambient concerns.
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

// Module for routing segregation (Public, Guarded).
pub mod routes;
use routes::{guarded, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ConfigError;
pub use guard::{GuardDecision, GuardFn, RouteContext, auth_guard, can_activate};
pub use navigation::{ChannelNavigator, NavigatorState, RecordingNavigator};
pub use notify::{NotifierState, RecordingNotifier, TracingNotifier};
pub use route_table::{NavigationOutcome, NavigationRouter, RouterState};
pub use session::{AuthSession, AuthStatus, SessionState};

/// ApiDoc
///
/// OpenAPI document for the HTTP surface, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout, handlers::get_session,
        handlers::navigate, handlers::get_current_route,
        handlers::get_home_page, handlers::get_dashboard_page, handlers::get_settings_page
    ),
    components(
        schemas(
            models::SessionResponse, models::NavigateRequest, models::CurrentRouteResponse,
            models::PageResponse, route_table::NavigationOutcome,
        )
    ),
    tags(
        (name = "auth-gate", description = "Guarded navigation API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Everything a request may touch, shared across all requests. The session,
/// router and notifier are all `Arc`s, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// The auth flag and its login/logout operations.
    pub session: SessionState,
    /// The route table with guards attached.
    pub router: RouterState,
    /// Where access decisions report to.
    pub notifier: NotifierState,
    /// The loaded, immutable configuration.
    pub config: AppConfig,
    worker: Arc<WorkerHandle>,
}

/// WorkerHandle
///
/// Owns the navigation worker task. The worker holds the router, whose guards
/// hold the session, whose navigator holds the worker's own sender, so the
/// channel never closes by itself. Dropping the last `AppState` clone drops
/// this handle, which aborts the task and releases that chain.
struct WorkerHandle(JoinHandle<()>);

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl AppState {
    /// build
    ///
    /// Wires a logged-out session to a fresh router whose guarded routes use
    /// `auth_guard`. Logout navigation is delivered through a `ChannelNavigator`
    /// drained by a spawned navigation worker, so this must run inside a Tokio runtime.
    /// The worker is aborted once the last clone of the returned state is dropped.
    ///
    /// Fails when `config` does not pass `AppConfig::validate`.
    pub fn build(config: AppConfig, notifier: NotifierState) -> Result<Self, ConfigError> {
        config.validate()?;

        let (navigator, requests) = ChannelNavigator::new();
        let session = Arc::new(AuthSession::new(
            Arc::new(navigator),
            config.default_route.clone(),
        ));

        let guard = auth_guard(session.clone(), notifier.clone(), config.guard_timeout);
        let router = Arc::new(NavigationRouter::new(route_table::default_routes(
            &config.default_route,
            guard,
        )));

        let worker = route_table::spawn_navigation_worker(router.clone(), requests);

        Ok(Self {
            session,
            router,
            notifier,
            config,
            worker: Arc::new(WorkerHandle(worker)),
        })
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.session.clone()
    }
}

impl FromRef<AppState> for RouterState {
    fn from_ref(app_state: &AppState) -> RouterState {
        app_state.router.clone()
    }
}

/// guard_middleware
///
/// Runs the access decision for every request into the guarded routes.
/// A `false` decision rejects with 401 before the handler runs.
async fn guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = RouteContext::new(route_table::normalize(request.uri().path()));
    let allowed = can_activate(
        state.session.as_ref(),
        state.notifier.as_ref(),
        &ctx,
        state.config.guard_timeout,
    )
    .await;

    if allowed {
        next.run(request).await
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

/// create_router
///
/// Assembles the HTTP routing structure, applies the guard to the guarded
/// module and the observability layers to everything.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        // Guarded pages: every request passes through `guard_middleware` first.
        .merge(
            guarded::guarded_routes()
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    guard_middleware,
                ))
        )
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
             ServiceBuilder::new()
                 .layer(SetRequestIdLayer::new(
                     x_request_id.clone(),
                     MakeRequestUuid,
                 ))
                 .layer(
                     TraceLayer::new_for_http()
                         .make_span_with(trace_span_logger)
                         .on_response(
                             DefaultOnResponse::new()
                                 .level(Level::INFO)
                                 .latency_unit(tower_http::LatencyUnit::Millis)
                         )
                 )
                 .layer(PropagateRequestIdLayer::new(x_request_id))
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span, tagged with the `x-request-id` set above.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
