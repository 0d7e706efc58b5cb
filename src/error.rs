use std::time::Duration;

use thiserror::Error;

/// ConfigError
///
/// Raised by `AppConfig::load()` when the environment cannot produce a usable
/// configuration. `main` reports it and exits instead of panicking mid-startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable required for the selected `APP_ENV` is not set.
    #[error("{0} must be set when APP_ENV=production")]
    Missing(&'static str),
    /// A variable is set but its value cannot be used.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// GuardError
///
/// Internal failure while reading the auth state for an access decision.
/// Never surfaced to the router: the guard logs it and denies.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("auth state read did not complete within {0:?}")]
    Timeout(Duration),
}
