//! Question-answering pipeline: embed, retrieve, generate, account, score

use std::sync::Arc;
use std::time::Instant;

use crate::config::PricingConfig;
use crate::error::{Error, Result};
use crate::providers::{ChatProvider, EmbeddingProvider, VectorStore};
use crate::types::{AnswerSource, AskResult, RetrievedChunk, TokenUsage};

use super::evaluator::evaluate_answer;
use super::prompt::PromptBuilder;

/// Citation snippets carry at most this many characters of chunk text
const SNIPPET_CHARS: usize = 220;

/// Orchestrates one ask invocation end to end.
///
/// No internal retries: any step failure aborts the call and propagates the
/// originating error to the service boundary.
pub struct AskPipeline {
    embeddings: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatProvider>,
    pricing: PricingConfig,
    default_top_k: usize,
}

impl AskPipeline {
    /// Create a new ask pipeline
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatProvider>,
        pricing: PricingConfig,
        default_top_k: usize,
    ) -> Self {
        Self {
            embeddings,
            vector_store,
            chat,
            pricing,
            default_top_k,
        }
    }

    /// Answer one question, retrieving up to `top_k` supporting chunks
    pub async fn ask(&self, question: &str, top_k: Option<usize>) -> Result<AskResult> {
        let started = Instant::now();
        let question = question.trim();
        let top_k = top_k.unwrap_or(self.default_top_k);

        let batch = self.embeddings.embed_texts(&[question.to_string()]).await?;
        let question_vector = batch
            .vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("Provider returned no vector".into()))?;

        let retrieved = self.vector_store.search(&question_vector, top_k).await?;

        let context = PromptBuilder::build_context(&retrieved);
        let system_prompt = PromptBuilder::build_system_prompt();
        let user_prompt = PromptBuilder::build_user_prompt(question, &context);

        let chat = self.chat.answer_question(&system_prompt, &user_prompt).await?;

        let latency_ms = started.elapsed().as_millis() as u64;
        let sources = map_sources(&retrieved);

        let token_usage = TokenUsage {
            input_tokens: chat.input_tokens,
            output_tokens: chat.output_tokens,
            embedding_tokens: batch.total_tokens,
        };

        let estimated_cost_usd = estimate_cost_usd(&token_usage, &self.pricing);
        let quality_checks = evaluate_answer(question, &chat.answer, &sources, latency_ms);

        tracing::info!(
            "Answered with {} sources in {} ms (model={}, cost=${:.8})",
            sources.len(),
            latency_ms,
            chat.model,
            estimated_cost_usd
        );

        Ok(AskResult {
            answer: chat.answer,
            model: chat.model,
            latency_ms,
            estimated_cost_usd,
            token_usage,
            sources,
            quality_checks,
        })
    }
}

/// Map retrieved chunks to citations, score-descending as retrieved
fn map_sources(retrieved: &[RetrievedChunk]) -> Vec<AnswerSource> {
    retrieved
        .iter()
        .map(|chunk| AnswerSource {
            document_id: chunk.document_id.clone(),
            chunk_id: chunk.chunk_id.clone(),
            source: chunk.source.clone(),
            score: chunk.score,
            snippet: chunk.text.chars().take(SNIPPET_CHARS).collect(),
        })
        .collect()
}

/// Estimate the USD cost of one invocation from per-1K-token prices,
/// rounded to 8 decimal places
fn estimate_cost_usd(usage: &TokenUsage, pricing: &PricingConfig) -> f64 {
    let cost = usage.input_tokens as f64 / 1000.0 * pricing.input_per_1k
        + usage.output_tokens as f64 / 1000.0 * pricing.output_per_1k
        + usage.embedding_tokens as f64 / 1000.0 * pricing.embedding_per_1k;

    (cost * 1e8).round() / 1e8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatAnswer, EmbeddingBatch, VectorStoreHealth};
    use async_trait::async_trait;
    use std::collections::HashMap;

    #[test]
    fn test_cost_estimate_reference_values() {
        let usage = TokenUsage {
            input_tokens: 1000,
            output_tokens: 1000,
            embedding_tokens: 1000,
        };
        let cost = estimate_cost_usd(&usage, &PricingConfig::default());
        assert!((cost - 0.00077).abs() < 1e-9);
    }

    #[test]
    fn test_cost_estimate_zero_usage() {
        let cost = estimate_cost_usd(&TokenUsage::default(), &PricingConfig::default());
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_snippet_truncates_to_220_chars() {
        let hits = vec![RetrievedChunk {
            chunk_id: "d#0".into(),
            document_id: "d".into(),
            source: "directory.records".into(),
            text: "x".repeat(500),
            score: 0.8,
            metadata: HashMap::new(),
        }];

        let sources = map_sources(&hits);
        assert_eq!(sources[0].snippet.chars().count(), 220);
    }

    struct StubEmbeddings;

    #[async_trait]
    impl EmbeddingProvider for StubEmbeddings {
        async fn embed_texts(&self, texts: &[String]) -> crate::Result<EmbeddingBatch> {
            Ok(EmbeddingBatch {
                vectors: texts.iter().map(|_| vec![0.5; 4]).collect(),
                total_tokens: 12,
            })
        }
    }

    struct StubStore {
        hits: Vec<RetrievedChunk>,
    }

    #[async_trait]
    impl VectorStore for StubStore {
        async fn upsert_chunks(&self, _chunks: &[crate::types::KnowledgeChunk]) -> crate::Result<()> {
            Ok(())
        }

        async fn search(
            &self,
            _vector: &[f32],
            top_k: usize,
        ) -> crate::Result<Vec<RetrievedChunk>> {
            Ok(self.hits.iter().take(top_k).cloned().collect())
        }

        async fn health(&self) -> VectorStoreHealth {
            VectorStoreHealth::Up
        }
    }

    struct StubChat {
        answer: String,
    }

    #[async_trait]
    impl ChatProvider for StubChat {
        async fn answer_question(
            &self,
            system_prompt: &str,
            user_prompt: &str,
        ) -> crate::Result<ChatAnswer> {
            assert!(system_prompt.contains("contexto"));
            assert!(user_prompt.contains("Pregunta:"));
            Ok(ChatAnswer {
                answer: self.answer.clone(),
                input_tokens: 1000,
                output_tokens: 1000,
                model: "gpt-4o-mini".into(),
            })
        }
    }

    fn hit(chunk_id: &str, score: f32) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: chunk_id.to_string(),
            document_id: "u-1".to_string(),
            source: "directory.records".to_string(),
            text: "Record ID: u-1\nEmail: ana@example.com".to_string(),
            score,
            metadata: HashMap::new(),
        }
    }

    fn pipeline(hits: Vec<RetrievedChunk>, answer: &str) -> AskPipeline {
        AskPipeline::new(
            Arc::new(StubEmbeddings),
            Arc::new(StubStore { hits }),
            Arc::new(StubChat {
                answer: answer.to_string(),
            }),
            PricingConfig::default(),
            5,
        )
    }

    #[tokio::test]
    async fn test_ask_assembles_grounded_result() {
        let pipeline = pipeline(
            vec![hit("u-1#0", 0.93), hit("u-1#1", 0.71)],
            "Ana está registrada como u-1 [u-1#0]",
        );

        let result = pipeline.ask("  ¿Quién es Ana?  ", None).await.unwrap();

        assert_eq!(result.model, "gpt-4o-mini");
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].chunk_id, "u-1#0");
        assert!(result.sources[0].score > result.sources[1].score);
        assert_eq!(result.token_usage.embedding_tokens, 12);
        assert!((result.estimated_cost_usd - 0.00075024).abs() < 1e-9);
        assert!(result.quality_checks.has_sources);
        assert!(result.quality_checks.grounded);
    }

    #[tokio::test]
    async fn test_ask_without_hits_is_not_grounded() {
        let pipeline = pipeline(
            Vec::new(),
            "No hay información suficiente en el contexto",
        );

        let result = pipeline.ask("¿Quién es Zoe?", Some(3)).await.unwrap();

        assert!(result.sources.is_empty());
        assert!(!result.quality_checks.has_sources);
        assert!(result.quality_checks.says_insufficient_context);
        assert!(!result.quality_checks.grounded);
    }

    /// In-memory store that serves back whatever was ingested into it
    #[derive(Default)]
    struct RecordingStore {
        chunks: parking_lot::Mutex<Vec<crate::types::KnowledgeChunk>>,
    }

    #[async_trait]
    impl VectorStore for RecordingStore {
        async fn upsert_chunks(&self, chunks: &[crate::types::KnowledgeChunk]) -> crate::Result<()> {
            self.chunks.lock().extend_from_slice(chunks);
            Ok(())
        }

        async fn search(
            &self,
            _vector: &[f32],
            top_k: usize,
        ) -> crate::Result<Vec<RetrievedChunk>> {
            Ok(self
                .chunks
                .lock()
                .iter()
                .take(top_k)
                .map(|c| RetrievedChunk {
                    chunk_id: c.chunk_id.clone(),
                    document_id: c.document_id.clone(),
                    source: c.source.clone(),
                    text: c.text.clone(),
                    score: 0.9,
                    metadata: c.metadata.clone(),
                })
                .collect())
        }

        async fn health(&self) -> VectorStoreHealth {
            VectorStoreHealth::Up
        }
    }

    struct OneRecordDirectory;

    #[async_trait]
    impl crate::providers::RecordDirectoryProvider for OneRecordDirectory {
        async fn get_records(
            &self,
            _limit: Option<usize>,
        ) -> crate::Result<Vec<crate::types::DirectoryRecord>> {
            Ok(vec![crate::types::DirectoryRecord {
                id: "u-42".to_string(),
                email: "u-42@example.com".to_string(),
                name: Some("n".repeat(2000)),
                created_at: None,
                updated_at: None,
            }])
        }
    }

    #[tokio::test]
    async fn test_ingest_then_ask_over_the_same_store() {
        let store = Arc::new(RecordingStore::default());
        let embeddings = Arc::new(StubEmbeddings);

        let ingestion = crate::ingestion::IngestionPipeline::new(
            Arc::new(OneRecordDirectory),
            embeddings.clone(),
            store.clone(),
            900,
        );
        let report = ingestion.ingest(None).await.unwrap();
        assert_eq!(report.records_fetched, 1);
        assert_eq!(report.chunks_indexed, 3);

        {
            let chunks = store.chunks.lock();
            assert_eq!(chunks[0].chunk_id, "u-42#0");
            assert_eq!(chunks[1].chunk_id, "u-42#1");
            assert_eq!(chunks[2].chunk_id, "u-42#2");
        }

        let ask = AskPipeline::new(
            embeddings,
            store,
            Arc::new(StubChat {
                answer: "u-42 es la cuenta de prueba [u-42#0]".to_string(),
            }),
            PricingConfig::default(),
            5,
        );

        let result = ask.ask("¿Qué sabes de u-42?", None).await.unwrap();
        assert_eq!(result.sources.len(), 3);
        assert!(result.quality_checks.has_sources);
        assert!(result.quality_checks.grounded);
    }

    #[tokio::test]
    async fn test_ask_honors_explicit_top_k() {
        let pipeline = pipeline(
            vec![hit("u-1#0", 0.9), hit("u-1#1", 0.8), hit("u-1#2", 0.7)],
            "ok",
        );

        let result = pipeline.ask("¿Qué registros hay?", Some(2)).await.unwrap();
        assert_eq!(result.sources.len(), 2);
    }
}
