/// API request handlers
use std::sync::Arc;
use std::time::Instant;

use axum::http::StatusCode;
use axum::Json;

use crate::api::types::ApiResponse;
use crate::config::AppConfig;
use crate::llm::WakeService;
use crate::rag::RagService;

pub mod chat;
pub mod documents;
pub mod system;
pub mod wake;

pub use chat::*;
pub use documents::*;
pub use system::*;
pub use wake::*;

/// Display name in service responses
pub const SERVICE_NAME: &str = "FischGPT Backend";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub rag: Arc<RagService>,
    pub wake: WakeService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, rag: Arc<RagService>, wake: WakeService) -> Self {
        Self {
            config,
            rag,
            wake,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was built
    pub fn uptime(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

/// Unknown route under `/api`
pub async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error("Not Found")))
}
