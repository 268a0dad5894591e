use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api_doc;
use crate::handlers;
use crate::state::AppState;

/// Build the HTTP router over the given state.
///
/// `max_body_bytes` caps multipart uploads; everything else on the surface is
/// small JSON.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/documents",
            post(handlers::document_upload::upload_document),
        )
        .route("/documents/{id}", get(handlers::document_get::get_document))
        .route(
            "/documents/{id}/result",
            get(handlers::document_result::get_document_result),
        )
        .route("/health", get(handlers::health::health_check))
        .route("/docs/openapi.json", get(api_doc::serve_openapi))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
