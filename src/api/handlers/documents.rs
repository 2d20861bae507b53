/// Document ingestion handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::types::AddDocumentsRequest;
use crate::api::types::AddDocumentsResponse;
use crate::api::types::ApiResponse;
use crate::api::types::InternalErrorResponse;
use crate::errors::GatewayError;

/// POST /api/documents
pub async fn add_documents(
    State(state): State<AppState>,
    payload: Result<Json<AddDocumentsRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid(vec![rejection.body_text()]),
    };

    let batch = request.into_batch();
    let ids = batch.ids.clone();
    if let Err(problem) = batch.check_lengths() {
        return invalid(vec![problem]);
    }

    info!("POST /api/documents: {} documents", batch.len());

    match state.rag.ingest(batch).await {
        Ok(count) => Json(AddDocumentsResponse {
            message: "Documents added successfully".to_string(),
            count,
            ids,
        })
        .into_response(),
        Err(GatewayError::ValidationError(details)) => invalid(details),
        Err(e) => {
            error!("Failed to add documents: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InternalErrorResponse {
                    error: "Internal server error".to_string(),
                    details: e.to_string(),
                }),
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
