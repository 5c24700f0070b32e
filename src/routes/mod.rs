pub mod analyze;
pub mod frontend;
pub mod health;

use axum::Router;
use std::sync::Arc;

use crate::AppState;

/// Build all API routes
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(analyze::routes())
}
