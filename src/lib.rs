//! Deepfake likelihood API.
//!
//! `POST /analyze` stores an uploaded image, scores it with a pretrained
//! classifier and buckets the score into a risk level. `GET /api/health` is a
//! liveness check, and every other path is served from the front-end bundle.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod logging;
pub mod routes;
pub mod services;

use axum::{Router, extract::{DefaultBodyLimit, Request}};
use std::path::PathBuf;
use std::sync::Arc;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use classifier::DeepfakeClassifier;
use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn DeepfakeClassifier>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(classifier: Arc<dyn DeepfakeClassifier>, upload_dir: PathBuf) -> Self {
        Self {
            classifier,
            upload_dir,
        }
    }
}

/// Assemble the full application: API routes, front-end fallback, and
/// permissive CORS for every origin, method and header.
///
/// The front-end also answers wrong-method requests on API paths, so a
/// browser GET on `/analyze` gets the index page instead of a 405.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let frontend = routes::frontend::service(&config.frontend_dir);
    let wrong_method = frontend.clone();

    Router::new()
        .merge(routes::build_routes())
        .method_not_allowed_fallback(move |req: Request| async move {
            wrong_method.oneshot(req).await
        })
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(Arc::new(state))
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
