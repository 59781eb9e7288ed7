use crate::catalog::{
    CatalogError, Result,
    cache::{CacheStats, CacheStore, MemoryStore, RemoteStore, TieredStore},
    fetch::Fetcher,
    provider::{
        AniListProvider, ArtworkSource, ChapterListingSource, ChapterRowExtractor, CharacterSource,
        HttpChapterListing, HttpClient, anilist::ANILIST_API_URL,
    },
};
use crate::config::AppConfig;
use crate::services::{AnimeService, ArtworkService, ChapterService, CharacterService, ImageCache};
use std::sync::Arc;
use tracing::info;

/// Process-wide wiring: the cache, the fetcher in front of it and the shared
/// HTTP client. Services are created from it on demand.
pub struct Engine {
    config: AppConfig,
    store: Arc<TieredStore>,
    fetcher: Fetcher,
    http: HttpClient,
}

impl Engine {
    /// Select the cache backend, start the expiry sweep and build the clients.
    ///
    /// Must run inside a Tokio runtime.
    pub fn bootstrap(config: AppConfig) -> Result<Self> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CatalogError::Config(
                "Engine::bootstrap must run inside a Tokio runtime".to_string(),
            ));
        }

        let remote = match config.cache.remote_url() {
            Some(url) => {
                info!("Using remote cache at {}", url);
                Some(RemoteStore::new(url, config.cache.remote_timeout())?)
            }
            None => {
                info!("Using local in-memory cache");
                None
            }
        };

        let store = Arc::new(TieredStore::new(MemoryStore::new(), remote));
        store.start_sweeper(config.cache.sweep_interval());

        Self::with_store(config, store)
    }

    /// Build an engine around an existing store. The sweeper is left as is.
    pub fn with_store(config: AppConfig, store: Arc<TieredStore>) -> Result<Self> {
        let fetcher = Fetcher::new(store.clone());
        let http = HttpClient::new("", &config.http)?;

        Ok(Self {
            config,
            store,
            fetcher,
            http,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn store(&self) -> &Arc<TieredStore> {
        &self.store
    }

    /// AniList lookups against the public GraphQL endpoint
    #[must_use]
    pub fn anime(&self) -> AnimeService {
        self.anime_at(ANILIST_API_URL)
    }

    #[must_use]
    pub fn anime_at(&self, api_url: &str) -> AnimeService {
        let provider = AniListProvider::new(self.http.with_base_url(api_url));
        AnimeService::new(self.fetcher.clone(), provider, self.config.ttl.anilist())
    }

    /// Fails only when the configured image referer is not a valid header value.
    pub fn images(&self) -> Result<ImageCache> {
        ImageCache::new(
            self.fetcher.clone(),
            self.http.clone(),
            self.config.ttl.image(),
            self.config.http.image_referer(),
        )
    }

    pub fn artwork<S: ArtworkSource>(&self, source: S) -> ArtworkService<S> {
        ArtworkService::new(self.fetcher.clone(), source, self.config.ttl.artwork())
    }

    pub fn characters<S: CharacterSource>(&self, source: S) -> CharacterService<S> {
        CharacterService::new(self.fetcher.clone(), source, self.config.ttl.character())
    }

    pub fn chapters<L, X>(&self, listing: L, extractor: X, base_url: &str) -> ChapterService<L, X>
    where
        L: ChapterListingSource,
        X: ChapterRowExtractor,
    {
        ChapterService::new(
            self.fetcher.clone(),
            listing,
            extractor,
            base_url,
            self.config.ttl.chapters(),
        )
    }

    /// Chapter listings fetched over HTTP from `base_url`
    #[must_use]
    pub fn chapter_listing(&self, base_url: &str) -> HttpChapterListing {
        HttpChapterListing::new(self.http.with_base_url(base_url))
    }

    pub async fn cache_stats(&self) -> Option<CacheStats> {
        self.store.stats().await
    }

    /// Stop background work started by [`Engine::bootstrap`].
    pub async fn shutdown(&self) {
        self.store.stop_sweeper().await;
    }
}
