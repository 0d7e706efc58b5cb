use std::{env, time::Duration};

use crate::{
    error::ConfigError,
    route_table::{self, PUBLIC_ROUTES},
};

/// Fallback listen address for local runs.
const LOCAL_BIND_ADDR: &str = "127.0.0.1:3000";
/// Route that `logout()` navigates to when `DEFAULT_ROUTE` is unset.
const DEFAULT_ROUTE: &str = "home";
/// Upper bound on a single auth state read performed by the guard.
const DEFAULT_GUARD_TIMEOUT_MS: u64 = 2000;

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and shared
/// through `AppState` via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and which variables are mandatory.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Route requested by every logout.
    pub default_route: String,
    // Maximum time the guard waits for the auth state before denying.
    pub guard_timeout: Duration,
}

/// Env
///
/// Defines the runtime context: pretty logs and relaxed defaults locally,
/// JSON logs and explicit settings in production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Test-safe configuration that does not touch the process environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: LOCAL_BIND_ADDR.to_string(),
            default_route: DEFAULT_ROUTE.to_string(),
            guard_timeout: Duration::from_millis(DEFAULT_GUARD_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// * `APP_ENV`: `production` or anything else for local.
    /// * `BIND_ADDR`: required in production, defaults to `127.0.0.1:3000` locally.
    /// * `DEFAULT_ROUTE`: logout target, must be a public route, defaults to `home`.
    /// * `GUARD_TIMEOUT_MS`: positive integer, defaults to `2000`.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = match (env::var("BIND_ADDR"), &env) {
            (Ok(addr), _) => addr,
            (Err(_), Env::Production) => return Err(ConfigError::Missing("BIND_ADDR")),
            (Err(_), Env::Local) => LOCAL_BIND_ADDR.to_string(),
        };

        let default_route = env::var("DEFAULT_ROUTE")
            .map(|route| route_table::normalize(&route))
            .unwrap_or_else(|_| DEFAULT_ROUTE.to_string());

        let guard_timeout = match env::var("GUARD_TIMEOUT_MS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => Duration::from_millis(DEFAULT_GUARD_TIMEOUT_MS),
        };

        let config = Self {
            env,
            bind_addr,
            default_route,
            guard_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// validate
    ///
    /// Checks the settings that `load` cannot express through types. The
    /// default route must be one of the public routes: logout navigates there
    /// while logged out, so a guarded, unknown or root target would never activate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_route.is_empty() {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_ROUTE",
                reason: "must not be the root route".to_string(),
            });
        }

        if !PUBLIC_ROUTES.contains(&self.default_route.as_str()) {
            return Err(ConfigError::Invalid {
                name: "DEFAULT_ROUTE",
                reason: format!(
                    "`{}` is not a public route (expected one of {PUBLIC_ROUTES:?})",
                    self.default_route
                ),
            });
        }

        if self.guard_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "GUARD_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let millis: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
        name: "GUARD_TIMEOUT_MS",
        reason: format!("{e}"),
    })?;

    Ok(Duration::from_millis(millis))
}
