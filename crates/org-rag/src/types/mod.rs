//! Core data types for indexing, retrieval, and answering

pub mod answer;
pub mod chunk;
pub mod record;

pub use answer::{AnswerSource, AskResult, QualityChecks, TokenUsage};
pub use chunk::{KnowledgeChunk, RetrievedChunk};
pub use record::DirectoryRecord;
