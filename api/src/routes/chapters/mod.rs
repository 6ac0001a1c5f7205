use axum::{Router, extract::DefaultBodyLimit, routing::get};
use util::state::AppState;

pub mod messages;

use messages::{messages_get, messages_post};

/// Routes for chapter submissions. The body limit sits above the 10 MiB
/// document cap so oversized uploads reach the handler and receive the
/// size error instead of a bare 413.
pub fn chapter_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(messages_get).post(messages_post))
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
}
