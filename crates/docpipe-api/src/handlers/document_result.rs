use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use docpipe_core::models::DocumentStatus;
use docpipe_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Fetch the extraction artifact for a document.
///
/// Non-terminal documents answer 202 with an empty body so clients can poll
/// this endpoint directly. A failed document reports its stored error; a
/// succeeded one streams the artifact verbatim.
#[utoipa::path(
    get,
    path = "/documents/{id}/result",
    tag = "documents",
    params(
        ("id" = Uuid, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Extraction result JSON", body = serde_json::Value),
        (status = 202, description = "Processing not finished yet"),
        (status = 404, description = "Document or result artifact not found", body = ErrorResponse),
        (status = 500, description = "Processing failed or internal error", body = ErrorResponse)
    )
)]
pub async fn get_document_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let document = state
        .documents
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))?;

    match document.status {
        DocumentStatus::Uploaded | DocumentStatus::Processing => {
            Ok(StatusCode::ACCEPTED.into_response())
        }
        DocumentStatus::Failed => {
            let message = document
                .error_message
                .unwrap_or_else(|| "Processing failed".to_string());
            Err(AppError::ProcessingFailed(message).into())
        }
        DocumentStatus::Succeeded => {
            let artifact = state
                .storage
                .get_result(id)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?
                .ok_or_else(|| {
                    tracing::warn!(document_id = %id, "Succeeded document has no result artifact");
                    AppError::NotFound(format!("Result for document {} not found", id))
                })?;

            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                artifact,
            )
                .into_response())
        }
    }
}
