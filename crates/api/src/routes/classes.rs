//! Route definitions for committed classes.
//!
//! Mounted at `/classes` by `api_routes()`.
//!
//! ```text
//! GET    /{id}                          get_class
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::classes;
use crate::state::AppState;

/// Class routes, mounted at `/classes`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(classes::get_class))
}
