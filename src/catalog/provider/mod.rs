pub mod anilist;
mod http;
mod traits;

pub use anilist::AniListProvider;
pub use http::HttpClient;
pub use traits::{
    ArtworkSource, ChapterListingSource, ChapterRowExtractor, CharacterSource, HttpChapterListing,
    ListingKind,
};
