//! Application state for the RAG server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::ingestion::IngestionPipeline;
use crate::providers::{
    directory::DirectoryClient,
    identity::IdentityClient,
    openai::{OpenAiChat, OpenAiEmbeddings},
    qdrant::QdrantVectorStore,
    ChatProvider, EmbeddingProvider, RecordDirectoryProvider, VectorStore,
};
use crate::qa::AskPipeline;
use crate::rate_limit::RateLimiter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    vector_store: Arc<dyn VectorStore>,
    ingestion: IngestionPipeline,
    ask: AskPipeline,
    limiter: RateLimiter,
}

impl AppState {
    /// Wire the concrete provider adapters from configuration
    pub fn new(config: RagConfig) -> Self {
        let identity = Arc::new(IdentityClient::new(&config.auth));
        let directory: Arc<dyn RecordDirectoryProvider> =
            Arc::new(DirectoryClient::new(&config.directory, identity));
        let embeddings: Arc<dyn EmbeddingProvider> =
            Arc::new(OpenAiEmbeddings::new(&config.embeddings));
        let chat: Arc<dyn ChatProvider> = Arc::new(OpenAiChat::new(&config.chat));
        let vector_store: Arc<dyn VectorStore> =
            Arc::new(QdrantVectorStore::new(&config.vector_db));

        Self::with_providers(config, directory, embeddings, chat, vector_store)
    }

    /// Build state from explicit providers (test seam and provider swaps)
    pub fn with_providers(
        config: RagConfig,
        directory: Arc<dyn RecordDirectoryProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        let ingestion = IngestionPipeline::new(
            directory,
            Arc::clone(&embeddings),
            Arc::clone(&vector_store),
            config.chunking.max_chars,
        );

        let ask = AskPipeline::new(
            embeddings,
            Arc::clone(&vector_store),
            chat,
            config.pricing.clone(),
            config.ask.default_top_k,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                vector_store,
                ingestion,
                ask,
                limiter: RateLimiter::new(),
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.inner.vector_store
    }

    pub fn ingestion(&self) -> &IngestionPipeline {
        &self.inner.ingestion
    }

    pub fn ask_pipeline(&self) -> &AskPipeline {
        &self.inner.ask
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }
}
