use crate::catalog::{
    ArtworkDetails, ArtworkSource, CacheKey, Fetcher, Lookup, Result, degrade, link_by_title,
};
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info};

/// Logos, backdrops and openings for a title, linked by fuzzy title match
pub struct ArtworkService<S> {
    fetcher: Fetcher,
    source: S,
    ttl: Duration,
}

impl<S: ArtworkSource> ArtworkService<S> {
    pub const fn new(fetcher: Fetcher, source: S, ttl: Duration) -> Self {
        Self {
            fetcher,
            source,
            ttl,
        }
    }

    /// Artwork for `title`.
    ///
    /// Any failure, including a failed search, is cached as `NoMatch` for the
    /// TTL so an unreachable upstream is not retried on every request.
    pub async fn details(&self, title: &str) -> Lookup<ArtworkDetails> {
        let title = title.trim();
        let key = CacheKey::new(self.source.id(), "animeDetails", title);

        self.fetcher
            .cached_or_default(key.as_str(), self.ttl, || self.resolve(title))
            .await
    }

    /// [`ArtworkService::details`] for several titles at once, in input order
    pub async fn details_for_all(&self, titles: &[&str]) -> Vec<Lookup<ArtworkDetails>> {
        join_all(titles.iter().map(|title| self.details(title))).await
    }

    async fn resolve(&self, title: &str) -> Result<Lookup<ArtworkDetails>> {
        let candidates = self.source.search(title).await?;
        let Some(best) = link_by_title(title, candidates) else {
            info!("No {} match for {:?}", self.source.id(), title);
            return Ok(Lookup::NoMatch);
        };
        debug!(
            "Linked {:?} to {} (score {:.2})",
            title, best.candidate.catalog_id, best.score
        );

        let id = best.candidate.catalog_id;
        let (logos, backdrops, openings) = tokio::join!(
            degrade("logos", self.source.logos(&id)),
            degrade("backdrops", self.source.backdrops(&id)),
            degrade("openings", self.source.openings(&id)),
        );

        Ok(Lookup::Found(ArtworkDetails {
            id,
            logos,
            backdrops,
            openings,
        }))
    }
}
