//! Knowledge chunk types: the unit of indexing and retrieval

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A unit of indexed content, created during ingestion.
///
/// `id` is a deterministic content hash of `(source, chunk_id, text)`, so
/// re-ingesting unchanged content overwrites the same point in the vector
/// store rather than duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeChunk {
    /// Content-derived stable identifier (lowercase hex sha-256)
    pub id: String,
    /// Human-readable identifier, "{document_id}#{sequence}"
    pub chunk_id: String,
    /// Source record identifier
    pub document_id: String,
    /// Logical origin tag, e.g. "directory.records"
    pub source: String,
    /// Bounded-length text segment
    pub text: String,
    /// Classification tags
    pub tags: Vec<String>,
    /// Embedding vector, dimension = the collection's configured size
    pub vector: Vec<f32>,
    /// Flat scalar metadata folded into the point payload
    pub metadata: HashMap<String, Value>,
}

/// A search hit: a [`KnowledgeChunk`] without its vector, plus a similarity
/// score (higher = more relevant). Transient, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedChunk {
    /// Human-readable chunk identifier
    pub chunk_id: String,
    /// Source record identifier
    pub document_id: String,
    /// Logical origin tag
    pub source: String,
    /// Chunk text
    pub text: String,
    /// Similarity score
    pub score: f32,
    /// Scalar metadata folded back out of the point payload
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}
