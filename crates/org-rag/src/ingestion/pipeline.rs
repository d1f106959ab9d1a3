//! Ingestion pipeline: fetch records, synthesize text, embed, upsert

use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, RecordDirectoryProvider, VectorStore};
use crate::types::{DirectoryRecord, KnowledgeChunk};

use super::chunker::chunk_text;

/// Logical origin tag for chunks produced by this pipeline
pub const SOURCE_TAG: &str = "directory.records";

/// Outcome of one ingestion run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub records_fetched: usize,
    pub chunks_indexed: usize,
    pub embedding_tokens: u64,
    pub latency_ms: u64,
}

/// Orchestrates directory -> chunker -> embeddings -> vector store.
///
/// At-least-once semantics: any step failure aborts the whole call with no
/// partial commit, and re-running is safe because chunk ids are
/// content-derived.
pub struct IngestionPipeline {
    directory: Arc<dyn RecordDirectoryProvider>,
    embeddings: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    max_chars: usize,
}

impl IngestionPipeline {
    /// Create a new ingestion pipeline
    pub fn new(
        directory: Arc<dyn RecordDirectoryProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        max_chars: usize,
    ) -> Self {
        Self {
            directory,
            embeddings,
            vector_store,
            max_chars,
        }
    }

    /// (Re)index up to `limit` directory records
    pub async fn ingest(&self, limit: Option<usize>) -> Result<IngestReport> {
        let started = Instant::now();

        let records = self.directory.get_records(limit).await?;
        if records.is_empty() {
            return Ok(IngestReport {
                records_fetched: 0,
                chunks_indexed: 0,
                embedding_tokens: 0,
                latency_ms: started.elapsed().as_millis() as u64,
            });
        }

        let mut chunks: Vec<KnowledgeChunk> = records
            .iter()
            .flat_map(|record| record_to_chunks(record, self.max_chars))
            .collect();

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let batch = self.embeddings.embed_texts(&texts).await?;

        if batch.vectors.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "Expected {} vectors, got {}",
                chunks.len(),
                batch.vectors.len()
            )));
        }

        for (chunk, vector) in chunks.iter_mut().zip(batch.vectors) {
            chunk.vector = vector;
        }

        self.vector_store.upsert_chunks(&chunks).await?;

        let report = IngestReport {
            records_fetched: records.len(),
            chunks_indexed: chunks.len(),
            embedding_tokens: batch.total_tokens,
            latency_ms: started.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Ingested {} records into {} chunks ({} embedding tokens, {} ms)",
            report.records_fetched,
            report.chunks_indexed,
            report.embedding_tokens,
            report.latency_ms
        );

        Ok(report)
    }
}

/// Synthesize the canonical text block for one record: one line per field,
/// fixed label order, missing optionals rendered as a literal placeholder.
fn record_text(record: &DirectoryRecord) -> String {
    [
        format!("Record ID: {}", record.id),
        format!("Email: {}", record.email),
        format!("Name: {}", record.name.as_deref().unwrap_or("(sin nombre)")),
        format!(
            "Created At: {}",
            record.created_at.as_deref().unwrap_or("unknown")
        ),
        format!(
            "Updated At: {}",
            record.updated_at.as_deref().unwrap_or("unknown")
        ),
    ]
    .join("\n")
}

/// Split one record into chunks with content-derived ids (no vectors yet)
fn record_to_chunks(record: &DirectoryRecord, max_chars: usize) -> Vec<KnowledgeChunk> {
    let text = record_text(record);

    chunk_text(&text, max_chars)
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            let chunk_id = format!("{}#{}", record.id, index);
            let id = hash_id(&format!("{}:{}:{}", SOURCE_TAG, chunk_id, segment));

            let mut metadata = HashMap::new();
            metadata.insert("recordId".to_string(), json!(record.id));
            metadata.insert("email".to_string(), json!(record.email));

            KnowledgeChunk {
                id,
                chunk_id,
                document_id: record.id.clone(),
                source: SOURCE_TAG.to_string(),
                text: segment,
                tags: vec!["records".to_string()],
                vector: Vec::new(),
                metadata,
            }
        })
        .collect()
}

fn hash_id(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::EmbeddingBatch;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(id: &str) -> DirectoryRecord {
        DirectoryRecord {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: Some("Ana García".to_string()),
            created_at: Some("2026-01-01T00:00:00Z".to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn test_record_text_renders_placeholders() {
        let mut r = record("u-1");
        r.name = None;
        let text = record_text(&r);

        assert!(text.contains("Record ID: u-1"));
        assert!(text.contains("Name: (sin nombre)"));
        assert!(text.contains("Updated At: unknown"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_chunk_ids_are_deterministic() {
        let r = record("u-7");
        let first = record_to_chunks(&r, 900);
        let second = record_to_chunks(&r, 900);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.chunk_id, b.chunk_id);
        }
    }

    #[test]
    fn test_changed_content_changes_id() {
        let mut r = record("u-7");
        let before = record_to_chunks(&r, 900);
        r.email = "other@example.com".to_string();
        let after = record_to_chunks(&r, 900);

        assert_ne!(before[0].id, after[0].id);
        assert_eq!(before[0].chunk_id, after[0].chunk_id);
    }

    #[test]
    fn test_long_record_splits_into_sequenced_chunks() {
        let mut r = record("u-9");
        // Pad the name so the synthesized block exceeds two full segments
        r.name = Some("n".repeat(2000));
        let chunks = record_to_chunks(&r, 900);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chunk_id, "u-9#0");
        assert_eq!(chunks[1].chunk_id, "u-9#1");
        assert_eq!(chunks[2].chunk_id, "u-9#2");

        let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rebuilt, record_text(&r));
    }

    struct StubDirectory {
        records: Vec<DirectoryRecord>,
    }

    #[async_trait]
    impl RecordDirectoryProvider for StubDirectory {
        async fn get_records(&self, limit: Option<usize>) -> crate::Result<Vec<DirectoryRecord>> {
            let mut records = self.records.clone();
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            Ok(records)
        }
    }

    struct StubEmbeddings {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbeddings {
        async fn embed_texts(&self, texts: &[String]) -> crate::Result<EmbeddingBatch> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(EmbeddingBatch {
                vectors: texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect(),
                total_tokens: texts.len() as u64 * 10,
            })
        }
    }

    #[derive(Default)]
    struct StubStore {
        upserted: Mutex<Vec<KnowledgeChunk>>,
    }

    #[async_trait]
    impl VectorStore for StubStore {
        async fn upsert_chunks(&self, chunks: &[KnowledgeChunk]) -> crate::Result<()> {
            self.upserted.lock().extend_from_slice(chunks);
            Ok(())
        }

        async fn search(
            &self,
            _vector: &[f32],
            _top_k: usize,
        ) -> crate::Result<Vec<crate::types::RetrievedChunk>> {
            Ok(Vec::new())
        }

        async fn health(&self) -> crate::providers::VectorStoreHealth {
            crate::providers::VectorStoreHealth::Up
        }
    }

    #[tokio::test]
    async fn test_ingest_embeds_and_upserts_one_batch() {
        let store = Arc::new(StubStore::default());
        let embeddings = Arc::new(StubEmbeddings {
            calls: AtomicUsize::new(0),
        });
        let pipeline = IngestionPipeline::new(
            Arc::new(StubDirectory {
                records: vec![record("u-1"), record("u-2")],
            }),
            embeddings.clone(),
            store.clone(),
            900,
        );

        let report = pipeline.ingest(None).await.unwrap();

        assert_eq!(report.records_fetched, 2);
        assert_eq!(report.chunks_indexed, 2);
        assert_eq!(report.embedding_tokens, 20);
        assert_eq!(embeddings.calls.load(Ordering::SeqCst), 1);

        let upserted = store.upserted.lock();
        assert_eq!(upserted.len(), 2);
        assert!(upserted.iter().all(|c| c.vector == vec![0.1, 0.2, 0.3]));
    }

    #[tokio::test]
    async fn test_ingest_empty_directory_short_circuits() {
        let embeddings = Arc::new(StubEmbeddings {
            calls: AtomicUsize::new(0),
        });
        let pipeline = IngestionPipeline::new(
            Arc::new(StubDirectory {
                records: Vec::new(),
            }),
            embeddings.clone(),
            Arc::new(StubStore::default()),
            900,
        );

        let report = pipeline.ingest(Some(10)).await.unwrap();

        assert_eq!(report.records_fetched, 0);
        assert_eq!(report.chunks_indexed, 0);
        assert_eq!(report.embedding_tokens, 0);
        assert_eq!(embeddings.calls.load(Ordering::SeqCst), 0);
    }
}
