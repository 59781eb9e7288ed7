use crate::catalog::{CacheKey, CachedImage, CatalogError, Fetcher, HttpClient, Result};
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue, PRAGMA, REFERER,
    USER_AGENT,
};
use std::time::Duration;
use tracing::warn;

const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Where a client should load an image from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Served from the cache by hash
    Cached { hash: String },
    /// Caching failed; use the upstream URL directly
    Passthrough(String),
}

impl ImageRef {
    /// URL for clients: `{proxy_base}/api/image/{hash}` or the upstream URL
    #[must_use]
    pub fn to_url(&self, proxy_base: &str) -> String {
        match self {
            Self::Cached { hash } => format!("{}/api/image/{hash}", proxy_base.trim_end_matches('/')),
            Self::Passthrough(url) => url.clone(),
        }
    }
}

/// Caches remote image bodies under the hash of their URL
pub struct ImageCache {
    fetcher: Fetcher,
    client: HttpClient,
    ttl: Duration,
    headers: HeaderMap,
}

impl ImageCache {
    /// `referer` is sent on every download; image CDNs refuse hotlinked requests.
    pub fn new(fetcher: Fetcher, client: HttpClient, ttl: Duration, referer: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
            ),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("image"));
        headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("no-cors"));
        headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("cross-site"));
        if let Some(referer) = referer {
            let value = HeaderValue::from_str(referer)
                .map_err(|e| CatalogError::Config(format!("Invalid image referer {referer:?}: {e}")))?;
            headers.insert(REFERER, value);
        }

        Ok(Self {
            fetcher,
            client,
            ttl,
            headers,
        })
    }

    /// Make sure the image at `url` is cached.
    ///
    /// Never fails: if the image cannot be fetched the original URL is handed
    /// back so the client can load it directly.
    pub async fn cache_image(&self, url: &str) -> ImageRef {
        let hash = CacheKey::image_hash(url);
        let key = CacheKey::image(&hash);

        let cached: Result<CachedImage> = self
            .fetcher
            .cached(key.as_str(), self.ttl, || self.download(url))
            .await;

        match cached {
            Ok(_) => ImageRef::Cached { hash },
            Err(e) => {
                warn!("Error caching image {}: {}", url, e);
                ImageRef::Passthrough(url.to_owned())
            }
        }
    }

    /// A cached image by hash, `None` once it has expired
    pub async fn get(&self, hash: &str) -> Option<CachedImage> {
        self.fetcher.peek(CacheKey::image(hash).as_str()).await
    }

    async fn download(&self, url: &str) -> Result<CachedImage> {
        let (content_type, bytes) = self
            .client
            .get_bytes(url, self.headers.clone(), Some(IMAGE_TIMEOUT))
            .await?;
        if bytes.is_empty() {
            return Err(CatalogError::Upstream(format!("Empty image body from {url}")));
        }

        Ok(CachedImage {
            content_type: content_type.unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            bytes,
        })
    }
}
