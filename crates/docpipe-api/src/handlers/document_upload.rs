use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use docpipe_core::models::UploadAccepted;
use docpipe_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/pdf";

/// Accept a PDF upload and queue it for extraction.
///
/// The file is durably stored and the document row created before the queue
/// message is sent, so a consumer can never observe a message whose document
/// or raw bytes are missing.
#[utoipa::path(
    post,
    path = "/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 202, description = "Upload accepted for processing", body = UploadAccepted,
         headers(("Location" = String, description = "Status URL for the new document"))),
        (status = 400, description = "Missing or empty file part", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;
    let mut form_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        // Take owned copies before `bytes()`/`text()` consume the field.
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(String::from);
                content_type = field.content_type().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                data = Some(bytes.to_vec());
            }
            Some("formType") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read formType: {}", e)))?;
                let text = text.trim().to_string();
                if !text.is_empty() {
                    form_type = Some(text);
                }
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::BadRequest("A file is required.".to_string()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("The uploaded file is empty.".to_string()).into());
    }

    let content_type = match content_type {
        Some(ct) if !ct.trim().is_empty() => ct,
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    };
    let file_name = file_name.unwrap_or_else(|| "document.pdf".to_string());
    let file_size = data.len() as i64;

    let id = Uuid::new_v4();

    let storage_key = state
        .storage
        .put_raw(id, data)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let document = docpipe_core::models::Document::new_uploaded(
        id,
        file_name,
        content_type,
        file_size,
        storage_key,
        form_type,
    );
    state.documents.create(&document).await?;

    let item = docpipe_core::models::QueuedWorkItem::new(id);
    state.queue.enqueue(&item).await?;

    tracing::info!(
        document_id = %id,
        file_size,
        form_type = document.form_type.as_deref().unwrap_or("-"),
        "Document accepted for processing"
    );

    Ok((
        StatusCode::ACCEPTED,
        [(header::LOCATION, format!("/documents/{}", id))],
        Json(UploadAccepted {
            id,
            status: document.status,
        }),
    ))
}
