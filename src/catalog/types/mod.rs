mod candidate;
mod chapter;
mod media;

pub use candidate::{CandidateName, CandidateTitle, Lookup, MatchResult, Named, Titled};
pub use chapter::{ChapterRecord, RawChapterRow};
pub use media::{
    AnimeMedia, ArtworkDetails, CachedImage, CharacterDetails, CharacterProfile, OpeningVideo,
};
