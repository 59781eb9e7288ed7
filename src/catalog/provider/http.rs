use crate::catalog::{CatalogError, Result};
use crate::config::HttpSettings;
use reqwest::{Client, Response, header::CONTENT_TYPE, header::HeaderMap, redirect};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

const MAX_REDIRECTS: usize = 5;

/// HTTP client wrapper shared by providers
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client with the configured user agent and per-request timeout
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Same connection pool, different base URL
    #[must_use]
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL from endpoint; absolute URLs pass through
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_owned()
        } else {
            format!("{}{}", self.base_url, endpoint)
        }
    }

    /// GET and return the body as text
    pub async fn get_text(&self, endpoint: &str, headers: HeaderMap) -> Result<String> {
        let response = self.client.get(self.url(endpoint)).headers(headers).send().await?;

        Ok(Self::check(response).await?.text().await?)
    }

    /// GET and parse the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.client.get(self.url(endpoint)).send().await?;

        Self::check(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(format!("JSON parse error: {e}")))
    }

    /// GET raw bytes along with the response content type
    pub async fn get_bytes(
        &self,
        endpoint: &str,
        headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> Result<(Option<String>, Vec<u8>)> {
        let mut request = self.client.get(self.url(endpoint)).headers(headers);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = Self::check(request.send().await?).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;

        Ok((content_type, bytes.to_vec()))
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.url(endpoint))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        Self::check(response)
            .await?
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(format!("JSON parse error: {e}")))
    }

    /// Map a non-success status to [`CatalogError::Api`]
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        Err(CatalogError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }
}
