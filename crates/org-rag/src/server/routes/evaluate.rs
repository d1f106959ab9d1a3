//! Standalone answer evaluation endpoint

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::qa::evaluate_answer;
use crate::server::state::AppState;
use crate::types::{AnswerSource, QualityChecks};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<AnswerSource>,
    pub latency_ms: u64,
}

/// POST /api/ai/evaluate - score an answer against its sources
pub async fn evaluate(
    State(_state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Json<QualityChecks> {
    Json(evaluate_answer(
        &request.question,
        &request.answer,
        &request.sources,
        request.latency_ms,
    ))
}
