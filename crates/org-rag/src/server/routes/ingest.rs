//! Directory ingestion endpoint

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::ingestion::IngestReport;
use crate::server::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// POST /api/ai/ingest/records - (re)index directory records
pub async fn ingest_records(
    State(state): State<AppState>,
    body: Option<Json<IngestRequest>>,
) -> Result<Json<IngestReport>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    if let Some(limit) = request.limit {
        if !(1..=500).contains(&limit) {
            return Err(Error::validation("limit must be between 1 and 500"));
        }
    }

    let report = state.ingestion().ingest(request.limit).await?;
    Ok(Json(report))
}
