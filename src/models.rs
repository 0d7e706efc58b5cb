use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Session Schemas ---

/// SessionResponse
///
/// Returned by `/login`, `/logout` and `/session`: the flag after the call.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct SessionResponse {
    pub logged_in: bool,
    /// Set by `/logout` only: the route the logout navigated to.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub redirect_to: Option<String>,
}

// --- Navigation Schemas ---

/// NavigateRequest
///
/// Body of `POST /navigate`. Leading and trailing slashes are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavigateRequest {
    pub path: String,
}

/// CurrentRouteResponse
///
/// The router's active route, `null` before the first activation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq, Eq)]
#[ts(export)]
pub struct CurrentRouteResponse {
    pub path: Option<String>,
}

// --- Page Schemas ---

/// PageResponse
///
/// Placeholder page payload served by the public and guarded page routes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageResponse {
    pub route: String,
    pub title: String,
    pub protected: bool,
}
