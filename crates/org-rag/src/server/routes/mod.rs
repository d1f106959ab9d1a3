//! API routes for the RAG server

pub mod ask;
pub mod evaluate;
pub mod ingest;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ingest/records", post(ingest::ingest_records))
        .route("/ask", post(ask::ask))
        .route("/evaluate", post(evaluate::evaluate))
        .route("/health", get(health))
}

/// GET /api/ai/health - overall health, reflecting the vector store
async fn health(state: axum::extract::State<AppState>) -> impl IntoResponse {
    let vector_store = state.vector_store().health().await;
    let timestamp = chrono::Utc::now().to_rfc3339();

    if !vector_store.is_up() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "vectorStore": vector_store,
                "timestamp": timestamp,
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "org-rag",
            "vectorStore": vector_store,
            "timestamp": timestamp,
        })),
    )
}
