//! Provider abstractions for embeddings, chat, vector storage, identity,
//! and the record directory
//!
//! Trait-based seams so pipelines stay testable and backends swappable; one
//! concrete adapter per external system.

pub mod directory;
pub mod identity;
pub mod openai;
pub mod qdrant;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DirectoryRecord, KnowledgeChunk, RetrievedChunk};

/// One batch of embeddings, order-preserving with respect to the input texts
#[derive(Debug, Clone)]
pub struct EmbeddingBatch {
    /// One vector per input text
    pub vectors: Vec<Vec<f32>>,
    /// Total embedding tokens reported by the provider
    pub total_tokens: u64,
}

/// One chat completion
#[derive(Debug, Clone)]
pub struct ChatAnswer {
    /// Trimmed answer text
    pub answer: String,
    /// Prompt tokens consumed
    pub input_tokens: u64,
    /// Completion tokens produced
    pub output_tokens: u64,
    /// Model that produced the answer
    pub model: String,
}

/// Vector store health status
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum VectorStoreHealth {
    Up,
    Down { detail: String },
}

impl VectorStoreHealth {
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

/// Converts texts into fixed-dimension vectors.
///
/// Empty input must short-circuit to an empty batch without a network call.
/// Provider errors propagate unwrapped; the enclosing pipeline aborts.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingBatch>;
}

/// Answers one question given an assembled system and user prompt
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn answer_question(&self, system_prompt: &str, user_prompt: &str)
        -> Result<ChatAnswer>;
}

/// Owns a named collection in an external vector store
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Write chunks as points keyed by content id; idempotent, no-op on
    /// empty input
    async fn upsert_chunks(&self, chunks: &[KnowledgeChunk]) -> Result<()>;

    /// Top-K similarity search, descending score order
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<RetrievedChunk>>;

    /// Reachability check; never raises, errors are reported as `Down`
    async fn health(&self) -> VectorStoreHealth;
}

/// Obtains short-lived bearer credentials via client-credentials exchange
#[async_trait]
pub trait AuthTokenProvider: Send + Sync {
    async fn get_access_token(&self, scope: Option<&str>) -> Result<String>;
}

/// Fetches source records to index
#[async_trait]
pub trait RecordDirectoryProvider: Send + Sync {
    /// Valid records in source order, truncated to `limit` when positive
    async fn get_records(&self, limit: Option<usize>) -> Result<Vec<DirectoryRecord>>;
}
