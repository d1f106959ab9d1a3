//! Question-answering endpoint, gated by the per-caller rate limiter

use axum::{
    extract::{ConnectInfo, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::rate_limit::RateDecision;
use crate::server::state::AppState;
use crate::types::AskResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    #[serde(flatten)]
    pub result: AskResult,
    pub rate_limit: RateDecision,
}

/// POST /api/ai/ask - answer one question with retrieved context
pub async fn ask(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    if request.question.trim().is_empty() {
        return Err(Error::validation("question must not be empty"));
    }
    if let Some(top_k) = request.top_k {
        if !(1..=20).contains(&top_k) {
            return Err(Error::validation("topK must be between 1 and 20"));
        }
    }

    let limits = &state.config().rate_limit;
    let decision = state.limiter().consume(
        &addr.ip().to_string(),
        limits.requests_per_window,
        Duration::from_millis(limits.window_ms),
    );

    if !decision.allowed {
        return Err(Error::RateLimited {
            limit: decision.limit,
            retry_after_seconds: decision.retry_after_seconds,
        });
    }

    let result = state
        .ask_pipeline()
        .ask(&request.question, request.top_k)
        .await?;

    Ok(Json(AskResponse {
        result,
        rate_limit: decision,
    }))
}
