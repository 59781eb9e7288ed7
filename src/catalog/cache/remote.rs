use super::CacheStore;
use crate::catalog::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Body of a store request
#[derive(Serialize)]
struct SetRequest<'a> {
    key: &'a str,
    value: &'a Value,
    /// Milliseconds
    ttl: u64,
}

/// Client for a shared cache server.
///
/// `GET {base}/{key}` answers with the stored JSON value or `404`;
/// `POST {base}` with `{"key", "value", "ttl"}` stores one.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build cache client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(key))
    }
}

#[async_trait]
impl CacheStore for RemoteStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let response = self.client.get(self.key_url(key)).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Remote cache miss: {}", key);
            return Ok(None);
        }

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        match response.json::<Value>().await? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let body = SetRequest {
            key,
            value: &value,
            ttl: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
        };

        self.client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
