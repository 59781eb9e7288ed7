mod cache;
mod chapters;
mod dates;
mod engine;
mod fetch;
mod linker;
mod matcher;
mod payload;
mod provider;
mod types;


pub use cache::{CacheKey, CacheStats, CacheStore, MemoryStore, RemoteStore, SweeperHandle, TieredStore};
pub use chapters::{reconcile, reconcile_at};
pub use dates::{normalize_relative_date, resolve_date};
pub use engine::Engine;
pub use fetch::{Fetcher, degrade};
pub use linker::{contains_either, link_by_name, link_by_title};
pub use matcher::{normalize_title, similarity_score};
pub use payload::UpstreamPayload;
pub use provider::anilist;
pub use provider::{
    AniListProvider, ArtworkSource, CharacterSource, ChapterListingSource, ChapterRowExtractor,
    HttpChapterListing, HttpClient, ListingKind,
};
pub use types::{
    AnimeMedia, ArtworkDetails, CachedImage, CandidateName, CandidateTitle, ChapterRecord,
    CharacterDetails, CharacterProfile, Lookup, MatchResult, Named, OpeningVideo, RawChapterRow,
    Titled,
};

/// Alias matching the external `reconcileChapters` entry point.
pub use chapters::reconcile as reconcile_chapters;

/// Catalog result type
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

impl CatalogError {
    /// Whether the upstream answered that the requested record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }

    /// Suggested HTTP status for the routing layer.
    #[must_use]
    pub fn status_hint(&self) -> u16 {
        match self {
            _ if self.is_not_found() => 404,
            Self::Timeout(_) => 504,
            Self::Network(_) | Self::Api { .. } | Self::Upstream(_) | Self::Parse(_) => 502,
            _ => 500,
        }
    }
}
