mod api_types;
mod provider;

pub use api_types::{
    AiringEpisode, CoverImage, ExternalLink, FuzzyDate, Media, StreamingEpisode, Title, Trailer,
};
pub use provider::{ANILIST_API_URL, AniListProvider, search_title_from_slug};
