/// Health, info, status and version handlers
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use tracing::info;

use super::AppState;
use super::SERVICE_NAME;
use crate::api::types::GenerationHealth;
use crate::api::types::HealthResponse;
use crate::api::types::StatusResponse;
use crate::api::types::VersionResponse;
use crate::rag::estimate_token_count;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to FischGPT Backend API",
        "endpoints": {
            "chat": "POST /api/chat",
            "health": "GET /api/health"
        },
        "documentation": "See README.md for full API documentation"
    }))
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    info!("Health check requested");

    let healthy = state.rag.generator().check_health().await;

    Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
        gpt_service: GenerationHealth {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            system_prompt_tokens: estimate_token_count(""),
        },
        uptime: state.uptime(),
        environment: state.config.server.environment.clone(),
    })
}

/// GET /api/info
pub async fn info(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "success": true,
        "service": SERVICE_NAME,
        "description": format!("AI assistant for questions about {}", config.subject.name),
        "version": env!("CARGO_PKG_VERSION"),
        "author": config.subject.name,
        "endpoints": {
            "chat": format!("POST /api/chat - Generate responses about {}", config.subject.name),
            "health": "GET /api/health - Service health check with detailed status",
            "info": "GET /api/info - Comprehensive service information",
            "wake": "POST /api/wake - Fire-and-forget GPU wake-up",
            "documents": "POST /api/documents - Add documents to the knowledge base"
        },
        "retrieval": {
            "queryMode": config.retrieval.query_mode,
            "maxDocuments": config.retrieval.max_documents,
            "distanceThreshold": config.retrieval.distance_threshold,
            "credentialsConfigured": config.has_retrieval_credentials()
        },
        "systemPrompt": {
            "estimatedTokens": estimate_token_count(""),
            "subject": format!("{} - {}", config.subject.name, config.subject.description)
        },
        "technical": {
            "framework": "axum",
            "platform": std::env::consts::OS,
            "architecture": std::env::consts::ARCH
        }
    }))
}

/// GET /api/status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        status: "online".to_string(),
        uptime: state.uptime(),
        timestamp: Utc::now(),
        service: SERVICE_NAME.to_string(),
        message: "Service is running normally".to_string(),
    })
}

/// GET /api/version
pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        success: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now(),
    })
}
