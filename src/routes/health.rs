//! Liveness endpoint (/api/health)

use axum::{Json, Router, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /api/health - Always ok; does not check the model
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
