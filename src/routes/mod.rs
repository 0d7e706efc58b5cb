//! Router Module Index
//!
//! Splits the HTTP surface by access level. The access guard is applied to a
//! whole module at once (via an axum `route_layer`), so a handler cannot end up
//! unguarded by being registered in the wrong place.

/// Routes accessible without a logged-in session: health, session control,
/// navigation attempts and public pages.
pub mod public;

/// Pages that sit behind the access guard.
pub mod guarded;
