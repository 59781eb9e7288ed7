use crate::catalog::{AniListProvider, AnimeMedia, CacheKey, Fetcher, Lookup, Result};
use std::time::Duration;
use tracing::info;

/// AniList media by site slug, cached per slug
pub struct AnimeService {
    fetcher: Fetcher,
    provider: AniListProvider,
    ttl: Duration,
}

impl AnimeService {
    #[must_use]
    pub const fn new(fetcher: Fetcher, provider: AniListProvider, ttl: Duration) -> Self {
        Self {
            fetcher,
            provider,
            ttl,
        }
    }

    /// AniList record for a slug such as `naruto-shippuden-355`.
    ///
    /// A missing record is a cached `NoMatch`; transport and API failures are
    /// returned and not cached.
    pub async fn info(&self, slug: &str) -> Result<Lookup<AnimeMedia>> {
        let key = CacheKey::anilist(slug);

        self.fetcher
            .cached(key.as_str(), self.ttl, || self.lookup(slug))
            .await
    }

    async fn lookup(&self, slug: &str) -> Result<Lookup<AnimeMedia>> {
        let lookup = self.provider.find_anime(slug).await?;
        if !lookup.is_found() {
            info!("No AniList media for {}", slug);
        }
        Ok(lookup)
    }
}
