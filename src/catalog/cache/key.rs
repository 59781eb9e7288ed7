use sha2::{Digest, Sha256};
use std::fmt;

/// Namespaced cache key, rendered as `source:entity:identifier`.
///
/// `source` and `entity` are fixed labels without `:`, so the identifier can be
/// any text without two logical keys colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(source: &str, entity: &str, identifier: impl AsRef<str>) -> Self {
        debug_assert!(!source.contains(':') && !entity.contains(':'));
        Self(format!("{source}:{entity}:{}", identifier.as_ref()))
    }

    /// AniList media looked up by site slug
    pub fn anilist(slug: &str) -> Self {
        Self::new("anilist", "media", slug)
    }

    /// MAL character, optionally narrowed to an anime.
    ///
    /// Both parts are percent-encoded so a `|` in the name cannot pose as the
    /// separator.
    pub fn mal_character(name: &str, anime: Option<&str>) -> Self {
        let name = urlencoding::encode(name);
        match anime.map(str::trim).filter(|a| !a.is_empty()) {
            Some(anime) => Self::new("mal", "character", format!("{name}|{}", urlencoding::encode(anime))),
            None => Self::new("mal", "character", name),
        }
    }

    /// TMDB artwork for a title
    pub fn tmdb_details(title: &str) -> Self {
        Self::new("tmdb", "animeDetails", title)
    }

    pub fn manga_info(id: &str) -> Self {
        Self::new("manga", "info", id)
    }

    pub fn manga_chapters(id: &str) -> Self {
        Self::new("manga", "chapters", id)
    }

    pub fn manga_pages(id: &str) -> Self {
        Self::new("manga", "pages", id)
    }

    pub fn manga_popular(page: u32) -> Self {
        Self::new("manga", "popular", page.to_string())
    }

    /// Key for a remote image, addressed by the hash of its URL
    pub fn image(hash: &str) -> Self {
        Self::new("img", "body", hash)
    }

    /// Hex SHA-256 of an image URL
    #[must_use]
    pub fn image_hash(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
