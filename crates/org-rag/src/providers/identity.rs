//! Identity provider client: client-credentials exchange with token caching

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::error::{Error, Result};

use super::AuthTokenProvider;

/// Reuse the cached token while it has at least this long left to live
const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_secs(5);

/// Fallback token lifetime when the provider omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: u64 = 300;

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Client for the identity provider's client-credentials flow.
///
/// A single cache slot holds the most recent token. Concurrent callers
/// racing past expiry each issue their own exchange; exchanges are
/// idempotent and cheap, so the last writer wins.
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    default_scope: String,
    token: RwLock<Option<CachedToken>>,
}

#[derive(serde::Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    scope: &'a str,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl IdentityClient {
    /// Create a new identity client
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            default_scope: config.scope.clone(),
            token: RwLock::new(None),
        }
    }

    async fn exchange(&self, scope: &str) -> Result<CachedToken> {
        let now = Instant::now();

        let response = self
            .client
            .post(format!("{}/oauth/token", self.base_url))
            .json(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                scope,
            })
            .send()
            .await
            .map_err(|e| Error::Auth(format!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "Token exchange returned {}: {}",
                status, body
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Invalid token response: {}", e)))?;

        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Auth("Identity provider returned no access token".into()))?;

        let expires_in = parsed.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        Ok(CachedToken {
            access_token,
            expires_at: now + Duration::from_secs(expires_in),
        })
    }
}

#[async_trait]
impl AuthTokenProvider for IdentityClient {
    async fn get_access_token(&self, scope: Option<&str>) -> Result<String> {
        {
            let cached = self.token.read().await;
            if let Some(ref token) = *cached {
                if Instant::now() + EXPIRY_SAFETY_MARGIN < token.expires_at {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let fresh = self
            .exchange(scope.unwrap_or(&self.default_scope))
            .await?;

        let access_token = fresh.access_token.clone();
        {
            let mut cached = self.token.write().await;
            *cached = Some(fresh);
        }

        tracing::debug!("Refreshed access token");
        Ok(access_token)
    }
}
