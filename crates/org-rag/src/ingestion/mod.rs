//! Ingestion: directory records -> chunks -> embeddings -> vector store

pub mod chunker;
pub mod pipeline;

pub use chunker::chunk_text;
pub use pipeline::{IngestReport, IngestionPipeline};
