use crate::response::ApiResponse;
use axum::{Router, routing::get};
use serde::Serialize;
use util::state::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

async fn health() -> ApiResponse<HealthStatus> {
    ApiResponse::success(HealthStatus { status: "ok" })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}
