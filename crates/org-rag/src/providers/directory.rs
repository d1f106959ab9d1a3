//! Directory service client: fetches the source records to index

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DirectoryConfig;
use crate::error::{Error, Result};
use crate::types::DirectoryRecord;

use super::{AuthTokenProvider, RecordDirectoryProvider};

/// Bearer-authenticated client for the record directory.
///
/// Normalization is permissive: entries missing `id` or `email` are dropped
/// instead of failing the batch, tolerating partial directory corruption.
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<dyn AuthTokenProvider>,
}

impl DirectoryClient {
    /// Create a new directory client
    pub fn new(config: &DirectoryConfig, auth: Arc<dyn AuthTokenProvider>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn normalize(payload: Value) -> Vec<DirectoryRecord> {
        let Some(entries) = payload.as_array() else {
            return Vec::new();
        };

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            match DirectoryRecord::from_value(entry) {
                Some(record) => records.push(record),
                None => tracing::warn!("Dropping malformed directory entry"),
            }
        }
        records
    }
}

#[async_trait]
impl RecordDirectoryProvider for DirectoryClient {
    async fn get_records(&self, limit: Option<usize>) -> Result<Vec<DirectoryRecord>> {
        let token = self.auth.get_access_token(None).await?;

        let response = self
            .client
            .get(format!("{}/records", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::Directory(format!("Fetch failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Directory(format!(
                "Directory returned {}: {}",
                status, body
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::Directory(format!("Invalid response: {}", e)))?;

        let mut records = Self::normalize(payload);

        if let Some(limit) = limit.filter(|&l| l > 0) {
            records.truncate(limit);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_drops_invalid_entries() {
        let records = DirectoryClient::normalize(json!([
            { "id": "u-1", "email": "a@x.io", "name": "Ana" },
            { "id": "u-2" },
            "garbage",
            { "id": "u-3", "email": "c@x.io" },
        ]));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "u-1");
        assert_eq!(records[1].id, "u-3");
    }

    #[test]
    fn test_normalize_non_array_payload() {
        assert!(DirectoryClient::normalize(json!({ "error": "oops" })).is_empty());
    }
}
