//! Question-answering result types

use serde::{Deserialize, Serialize};

/// Token counts accumulated across one ask invocation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Chat prompt tokens
    pub input_tokens: u64,
    /// Chat completion tokens
    pub output_tokens: u64,
    /// Embedding tokens for the question
    pub embedding_tokens: u64,
}

/// A citation derived from a retrieved chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSource {
    /// Source record identifier
    pub document_id: String,
    /// Human-readable chunk identifier
    pub chunk_id: String,
    /// Logical origin tag
    pub source: String,
    /// Similarity score
    pub score: f32,
    /// First 220 characters of the chunk text
    pub snippet: String,
}

/// Deterministic quality checks over an answer and its supporting sources
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityChecks {
    /// At least one retrieved source backs the answer
    pub has_sources: bool,
    /// Trimmed answer is non-empty
    pub non_empty_answer: bool,
    /// Latency within (0, 5000] ms
    pub latency_ok: bool,
    /// Answer contains the canonical insufficient-context phrase
    pub says_insufficient_context: bool,
    /// Sources present, answer non-empty, and not a refusal
    pub grounded: bool,
    /// Aggregate score, 0-100
    pub score: u8,
}

/// Output of one question-answering invocation.
///
/// Returned synchronously to the caller; never persisted by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResult {
    /// Model answer, possibly the canonical insufficient-context phrase
    pub answer: String,
    /// Identifier of the model that generated the answer
    pub model: String,
    /// Wall-clock latency across embed/search/chat, in milliseconds
    pub latency_ms: u64,
    /// Estimated monetary cost in USD, rounded to 8 decimal places
    pub estimated_cost_usd: f64,
    /// Token counts for the invocation
    pub token_usage: TokenUsage,
    /// Citations, ordered by descending similarity
    pub sources: Vec<AnswerSource>,
    /// Quality checks over the answer
    pub quality_checks: QualityChecks,
}
