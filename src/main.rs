use auth_gate::{
    AppState, TracingNotifier,
    config::{AppConfig, Env},
    create_router,
};
use std::{process::ExitCode, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, installs logging, builds the gate and serves the HTTP API.
#[tokio::main]
async fn main() -> ExitCode {
    // 1. Configuration & Environment Loading
    dotenv::dotenv().ok();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise verbose for this crate and the HTTP stack.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "auth_gate=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!(
        env = ?config.env,
        default_route = %config.default_route,
        guard_timeout_ms = config.guard_timeout.as_millis() as u64,
        "auth-gate starting"
    );

    // 4. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app_state = match AppState::build(config, Arc::new(TracingNotifier)) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // 5. Router and Server Startup
    let app = create_router(app_state);

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Listening on {bind_addr}");
    tracing::info!("API Documentation (Swagger UI) available at: http://{bind_addr}/swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server terminated");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
