//! Caching and reconciliation engine behind the Zenith catalog API.
//!
//! Extractors hand this crate already-shaped records scraped from third-party
//! catalogs; the crate links records across catalogs, merges chapter listings
//! and makes every remote fetch go through a TTL-bounded cache.

pub mod catalog;
pub mod config;
pub mod services;
pub mod telemetry;

pub use catalog::{
    CacheKey, CacheStats, CacheStore, CandidateName, CandidateTitle, CatalogError, ChapterRecord,
    Engine, Fetcher, Lookup, MatchResult, RawChapterRow, Result, link_by_name, link_by_title,
    normalize_relative_date, reconcile_chapters, similarity_score,
};
pub use config::AppConfig;
