//! Qdrant REST adapter: lazy collection provisioning, idempotent upsert,
//! top-K similarity search, and health reporting

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::VectorDbConfig;
use crate::error::{Error, Result};
use crate::types::{KnowledgeChunk, RetrievedChunk};

use super::{VectorStore, VectorStoreHealth};

/// Qdrant-backed vector store owning one named collection.
///
/// The collection is provisioned lazily on first use: a describe call, and
/// on "not found" a create with the configured vector size and cosine
/// distance. Once provisioned the flag is never re-checked for the process
/// lifetime; racing writers at most issue a redundant describe call.
pub struct QdrantVectorStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    vector_size: usize,
    provisioned: AtomicBool,
}

impl QdrantVectorStore {
    /// Create a new Qdrant adapter
    pub fn new(config: &VectorDbConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            vector_size: config.vector_size,
            provisioned: AtomicBool::new(false),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    async fn ensure_collection(&self) -> Result<()> {
        if self.provisioned.load(Ordering::Acquire) {
            return Ok(());
        }

        let describe = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Describe collection failed: {}", e)))?;

        if describe.status().is_success() {
            self.provisioned.store(true, Ordering::Release);
            return Ok(());
        }

        if describe.status() != reqwest::StatusCode::NOT_FOUND {
            let status = describe.status();
            let body = describe.text().await.unwrap_or_default();
            return Err(Error::VectorDb(format!(
                "Describe collection returned {}: {}",
                status, body
            )));
        }

        tracing::info!(
            "Creating collection '{}' (size={}, distance=Cosine)",
            self.collection,
            self.vector_size
        );

        let create = self
            .client
            .put(self.collection_url())
            .json(&json!({
                "vectors": {
                    "size": self.vector_size,
                    "distance": "Cosine",
                }
            }))
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Create collection failed: {}", e)))?;

        if !create.status().is_success() {
            let status = create.status();
            let body = create.text().await.unwrap_or_default();
            return Err(Error::VectorDb(format!(
                "Create collection returned {}: {}",
                status, body
            )));
        }

        self.provisioned.store(true, Ordering::Release);
        Ok(())
    }

    fn chunk_to_point(chunk: &KnowledgeChunk) -> Value {
        let mut payload = Map::new();
        for (key, value) in &chunk.metadata {
            payload.insert(key.clone(), value.clone());
        }
        // Reserved keys always win over metadata collisions
        payload.insert("chunkId".into(), Value::String(chunk.chunk_id.clone()));
        payload.insert("documentId".into(), Value::String(chunk.document_id.clone()));
        payload.insert("source".into(), Value::String(chunk.source.clone()));
        payload.insert("text".into(), Value::String(chunk.text.clone()));
        payload.insert("tags".into(), json!(chunk.tags));

        json!({
            "id": chunk.id,
            "vector": chunk.vector,
            "payload": payload,
        })
    }
}

#[derive(serde::Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(serde::Deserialize)]
struct ScoredPoint {
    id: Value,
    score: f32,
    #[serde(default)]
    payload: Option<Map<String, Value>>,
}

/// Reconstruct a retrieved chunk from a scored point's payload.
///
/// The four reserved payload fields become struct fields; everything else
/// folds back into `metadata`, keeping scalar and null values only.
fn parse_hit(id: &Value, score: f32, payload: Map<String, Value>) -> RetrievedChunk {
    let string_of = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let chunk_id = payload
        .get("chunkId")
        .map(string_of)
        .unwrap_or_else(|| string_of(id));
    let document_id = payload.get("documentId").map(string_of).unwrap_or_default();
    let source = payload
        .get("source")
        .map(string_of)
        .unwrap_or_else(|| "unknown".to_string());
    let text = payload.get("text").map(string_of).unwrap_or_default();

    let mut metadata = HashMap::new();
    for (key, value) in payload {
        if matches!(key.as_str(), "chunkId" | "documentId" | "source" | "text") {
            continue;
        }
        // Arrays and objects never crash the call; they are just dropped
        if matches!(
            value,
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null
        ) {
            metadata.insert(key, value);
        }
    }

    RetrievedChunk {
        chunk_id,
        document_id,
        source,
        text,
        score,
        metadata,
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert_chunks(&self, chunks: &[KnowledgeChunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        self.ensure_collection().await?;

        let points: Vec<Value> = chunks.iter().map(Self::chunk_to_point).collect();

        let response = self
            .client
            .put(format!("{}/points?wait=true", self.collection_url()))
            .json(&json!({ "points": points }))
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Upsert failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorDb(format!(
                "Upsert returned {}: {}",
                status, body
            )));
        }

        tracing::debug!("Upserted {} points into '{}'", chunks.len(), self.collection);
        Ok(())
    }

    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>> {
        self.ensure_collection().await?;

        let response = self
            .client
            .post(format!("{}/points/search", self.collection_url()))
            .json(&json!({
                "vector": vector,
                "limit": top_k,
                "with_payload": true,
            }))
            .send()
            .await
            .map_err(|e| Error::VectorDb(format!("Search failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::VectorDb(format!(
                "Search returned {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::VectorDb(format!("Invalid search response: {}", e)))?;

        Ok(parsed
            .result
            .into_iter()
            .map(|point| parse_hit(&point.id, point.score, point.payload.unwrap_or_default()))
            .collect())
    }

    async fn health(&self) -> VectorStoreHealth {
        let result = self
            .client
            .get(format!("{}/collections", self.base_url))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => VectorStoreHealth::Up,
            Ok(response) => VectorStoreHealth::Down {
                detail: format!("Vector store returned {}", response.status()),
            },
            Err(e) => VectorStoreHealth::Down {
                detail: e.to_string(),
            },
        }
    }
}
