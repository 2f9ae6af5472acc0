/// HTTP handlers for the reply-desk API
pub mod posts;
pub mod replies;

#[cfg(test)]
mod test_handlers;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::ReplyDeskService;

/// Build the router for the four API routes plus a health check.
///
/// Requests are independent; the only shared state is the read-only service.
pub fn build_router(service: ReplyDeskService) -> Router {
    Router::new()
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/:post_id/comments", get(posts::list_comments))
        .route(
            "/api/comments/:comment_id/reply",
            post(replies::publish_reply),
        )
        .route("/api/generate-reply", post(replies::generate_reply))
        .route("/health", get(|| async { "ok" }))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found." })))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed." })),
    )
}
