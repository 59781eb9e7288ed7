//! Composite lookups built on the catalog engine.
//!
//! Each service pairs a source of raw records with the fetcher, so every
//! upstream round trip is cached under a namespaced key.

mod anime;
mod artwork;
mod chapters;
mod characters;
mod images;

pub use anime::AnimeService;
pub use artwork::ArtworkService;
pub use chapters::{ChapterService, short_id};
pub use characters::CharacterService;
pub use images::{ImageCache, ImageRef};
