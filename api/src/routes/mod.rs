//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe (public)
//! - `/chapters` → chapter submission chat (authenticated users)

use crate::auth::guards::allow_authenticated;
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod chapters;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest(
            "/chapters",
            chapters::chapter_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
