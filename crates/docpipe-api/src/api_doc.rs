//! OpenAPI documentation.

use axum::Json;
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use docpipe_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docpipe API",
        version = "0.1.0",
        description = "PDF ingestion API. Uploads are acknowledged immediately and processed asynchronously; poll the status endpoint until a terminal state, then fetch the extraction result."
    ),
    paths(
        handlers::document_upload::upload_document,
        handlers::document_get::get_document,
        handlers::document_result::get_document_result,
        handlers::health::health_check,
    ),
    components(schemas(
        models::DocumentStatus,
        models::UploadAccepted,
        models::DocumentStatusResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "documents", description = "Document upload, status, and results"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
