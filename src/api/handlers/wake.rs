/// Wake-up handlers
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use tracing::info;

use super::AppState;
use crate::api::types::WakeAccepted;
use crate::api::types::WakeForceResponse;
use crate::api::types::WakeStatusResponse;
use crate::llm::wake::TriggerResult;

/// POST /api/wake
///
/// Responds before the wake-up runs. Always reports success since the
/// wake-up is an optimisation only.
pub async fn wake(State(state): State<AppState>) -> Json<WakeAccepted> {
    info!("Wake-up request received");

    let message = match state.wake.trigger() {
        TriggerResult::Queued => "Wake-up initiated",
        TriggerResult::AlreadyPending => "Wake-up already in progress",
        TriggerResult::WorkerStopped => "Wake-up request received (error in background)",
    };

    Json(WakeAccepted {
        success: true,
        message: message.to_string(),
        timestamp: Utc::now(),
    })
}

/// GET /api/wake/status
pub async fn wake_status(State(state): State<AppState>) -> Json<WakeStatusResponse> {
    let status = state.wake.status().await;

    let message = if status.warmed_up {
        "Service is warmed up and ready"
    } else if status.responding {
        "Service is responding but may be slow"
    } else {
        "Service may need wake-up"
    };

    Json(WakeStatusResponse {
        success: true,
        warmed_up: status.warmed_up,
        responding: status.responding,
        response_time: status.response_time_ms,
        message: message.to_string(),
        timestamp: status.checked_at,
        error: status.error,
    })
}

/// POST /api/wake/force
pub async fn wake_force(State(state): State<AppState>) -> Json<WakeForceResponse> {
    info!("Force wake-up request received");
    let outcome = state.wake.force().await;

    Json(WakeForceResponse {
        success: outcome.success,
        wake_up_time: outcome.wake_up_time,
        status: outcome.status,
        message: outcome.message,
        timestamp: Utc::now(),
        error: outcome.error,
    })
}

/// GET /api/wake/info
pub async fn wake_info() -> Json<Value> {
    Json(json!({
        "success": true,
        "service": "FischGPT Wake-up Service",
        "description": "GPU warm-up system to reduce cold start latency",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "wake": "POST /api/wake - Initiate background wake-up (fire-and-forget)",
            "status": "GET /api/wake/status - Check current warm-up status",
            "force": "POST /api/wake/force - Force wake-up and wait for completion",
            "info": "GET /api/wake/info - Wake-up system information"
        },
        "optimization": {
            "backgroundProcessing": true,
            "singlePendingWakeUp": true
        }
    }))
}
