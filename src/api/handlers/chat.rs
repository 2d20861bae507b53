/// Chat handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::ApiResponse;
use crate::api::types::ChatData;
use crate::api::types::ChatRequest;
use crate::cli::output::truncate_str;
use crate::llm::GenerationParams;

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid(vec![rejection.body_text()]),
    };

    let chat = match request.validate() {
        Ok(chat) => chat,
        Err(details) => return invalid(details),
    };

    info!("POST /api/chat: {}", truncate_str(&chat.query, 100));

    let params = GenerationParams::resolve(
        GenerationParams::from(&state.config.generation),
        chat.temperature,
        chat.max_tokens,
        chat.top_p,
    );

    match state.rag.answer(&chat.query, &params).await {
        Ok(answer) => {
            info!(
                documents_used = answer.documents_used,
                context_chars = answer.context_chars,
                "Chat answered"
            );
            Json(ApiResponse::success(ChatData {
                response: answer.result.text,
                metadata: answer.result.metadata,
            }))
            .into_response()
        }
        Err(e) => {
            error!(kind = e.kind(), "Chat generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ApiResponse::<()>::error("Failed to generate response")
                        .with_message(e.to_string()),
                ),
            )
                .into_response()
        }
    }
}

fn invalid(details: Vec<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("Invalid request parameters").with_details(details)),
    )
        .into_response()
}
