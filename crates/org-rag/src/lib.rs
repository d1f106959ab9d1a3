//! org-rag: Retrieval-augmented question answering over directory records
//!
//! This crate indexes organization directory records into a Qdrant collection
//! and answers free-text questions with retrieved context, source citations,
//! quality scoring, per-caller rate limiting, and model cost accounting.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod providers;
pub mod qa;
pub mod rate_limit;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    answer::{AnswerSource, AskResult, QualityChecks, TokenUsage},
    chunk::{KnowledgeChunk, RetrievedChunk},
    record::DirectoryRecord,
};
