use crate::catalog::{
    CacheKey, CharacterProfile, CharacterSource, Fetcher, Lookup, Result, degrade, link_by_name,
};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// Character profiles linked by name, optionally within one anime
pub struct CharacterService<S> {
    fetcher: Fetcher,
    source: S,
    ttl: Duration,
}

impl<S: CharacterSource> CharacterService<S> {
    pub const fn new(fetcher: Fetcher, source: S, ttl: Duration) -> Self {
        Self {
            fetcher,
            source,
            ttl,
        }
    }

    /// Profile of the character called `name`, restricted to characters
    /// appearing in `anime` when given.
    ///
    /// The details page is required; a failed picture gallery only leaves
    /// `pics` empty.
    pub async fn find(&self, name: &str, anime: Option<&str>) -> Result<Lookup<CharacterProfile>> {
        let key = CacheKey::mal_character(name, anime);

        self.fetcher
            .cached(key.as_str(), self.ttl, || self.resolve(name, anime))
            .await
    }

    async fn resolve(&self, name: &str, anime: Option<&str>) -> Result<Lookup<CharacterProfile>> {
        let candidates = self.source.search(name).await?;
        let Some(linked) = link_by_name(name, candidates, anime) else {
            info!("No character match for {:?} (filter {:?})", name, anime);
            return Ok(Lookup::NoMatch);
        };
        let candidate = linked.candidate;
        debug!("Linked character {:?} to {}", name, candidate.catalog_id);

        let (details, pics) = tokio::join!(
            self.source.details(&candidate),
            degrade("character pictures", self.source.pictures(&candidate)),
        );

        let mut seen = HashSet::new();
        let pics = pics.into_iter().filter(|pic| seen.insert(pic.clone())).collect();

        Ok(Lookup::Found(CharacterProfile {
            catalog_id: candidate.catalog_id,
            source_url: candidate.source_url,
            details: details?,
            pics,
        }))
    }
}
