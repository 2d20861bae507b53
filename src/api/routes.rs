//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create the router mounted under `/api`
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Chat
        .route("/chat", post(handlers::chat))
        // System
        .route("/health", get(handlers::health))
        .route("/info", get(handlers::info))
        .route("/status", get(handlers::status))
        .route("/version", get(handlers::version))
        // Wake-up
        .route("/wake", post(handlers::wake))
        .route("/wake/status", get(handlers::wake_status))
        .route("/wake/force", post(handlers::wake_force))
        .route("/wake/info", get(handlers::wake_info))
        // Ingestion
        .route("/documents", post(handlers::add_documents))
        .fallback(handlers::not_found)
        .with_state(state)
}
