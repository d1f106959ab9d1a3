//! RAG server binary
//!
//! Run with: cargo run -p org-rag --bin org-rag-server

use org_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "org_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("ORG_RAG_CONFIG") {
        Ok(path) => RagConfig::from_file(&path)?,
        Err(_) => RagConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Chat model: {}", config.chat.model);
    tracing::info!(
        "  - Collection: {} (size={})",
        config.vector_db.collection,
        config.vector_db.vector_size
    );
    tracing::info!(
        "  - Rate limit: {} req / {} ms",
        config.rate_limit.requests_per_window,
        config.rate_limit.window_ms
    );

    let server = RagServer::new(config);
    tracing::info!("API: http://{}/api/ai", server.address());

    server.start().await?;

    Ok(())
}
