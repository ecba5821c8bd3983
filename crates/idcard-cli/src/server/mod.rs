//! HTTP API for ID card recognition.
//!
//! Endpoints:
//! - POST /api/id_card/recognize - multipart `image` upload or JSON `image_base64`
//! - POST /api/id_card/extract - JSON `fragments` from an external OCR run
//! - GET /api/id_card/health - liveness check

mod error;
mod routes;

pub use error::ApiError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use idcard_core::models::config::ServerConfig;
use idcard_core::IdCardRecognizer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub recognizer: IdCardRecognizer,
}

impl AppState {
    pub fn new(recognizer: IdCardRecognizer) -> Self {
        Self { recognizer }
    }
}

/// Build the API router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/id_card/recognize", post(routes::recognize))
        .route("/api/id_card/extract", post(routes::extract))
        .route("/api/id_card/health", get(routes::health))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
