//! Configuration for the RAG core

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main RAG configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Embedding provider configuration
    pub embeddings: EmbeddingConfig,
    /// Chat completion configuration
    pub chat: ChatConfig,
    /// Vector store (Qdrant) configuration
    pub vector_db: VectorDbConfig,
    /// Identity provider configuration
    pub auth: AuthConfig,
    /// Directory service configuration
    pub directory: DirectoryConfig,
    /// Text chunking configuration
    pub chunking: ChunkingConfig,
    /// Question-answering configuration
    pub ask: AskConfig,
    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
    /// Per-1K-token prices for cost estimation
    pub pricing: PricingConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read config {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.vector_db.vector_size == 0 {
            return Err(Error::Config("vector_db.vector_size must be > 0".into()));
        }
        if self.chunking.max_chars == 0 {
            return Err(Error::Config("chunking.max_chars must be > 0".into()));
        }
        if self.ask.default_top_k == 0 || self.ask.default_top_k > 20 {
            return Err(Error::Config("ask.default_top_k must be in 1..=20".into()));
        }
        if self.rate_limit.requests_per_window == 0 {
            return Err(Error::Config(
                "rate_limit.requests_per_window must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8086,
            enable_cors: true,
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// API key (may also come from OPENAI_API_KEY)
    pub api_key: String,
    /// Embedding model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "text-embedding-3-small".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// API key (may also come from OPENAI_API_KEY)
    pub api_key: String,
    /// Chat model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            timeout_secs: 60,
        }
    }
}

/// Vector store (Qdrant) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    /// Qdrant base URL
    pub url: String,
    /// Collection name
    pub collection: String,
    /// Vector dimension (must match the embedding model)
    pub vector_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            collection: "org_knowledge".to_string(),
            vector_size: 1536,
            timeout_secs: 30,
        }
    }
}

/// Identity provider configuration for client-credentials exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Identity provider base URL
    pub base_url: String,
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Default scope requested when callers pass none
    pub scope: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            scope: "openid profile email directory:read".to_string(),
        }
    }
}

/// Directory service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Directory service base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8082".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: 900 }
    }
}

/// Question-answering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AskConfig {
    /// Default number of chunks retrieved when the caller passes none
    pub default_top_k: usize,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self { default_top_k: 5 }
    }
}

/// Rate limiting configuration for the ask entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Allowed requests per window, per caller key
    pub requests_per_window: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 60,
            window_ms: 60_000,
        }
    }
}

/// Per-1K-token prices in USD for cost estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Chat input price per 1K tokens
    pub input_per_1k: f64,
    /// Chat output price per 1K tokens
    pub output_per_1k: f64,
    /// Embedding price per 1K tokens
    pub embedding_per_1k: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            input_per_1k: 0.00015,
            output_per_1k: 0.00060,
            embedding_per_1k: 0.00002,
        }
    }
}
