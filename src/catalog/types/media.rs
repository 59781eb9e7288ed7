use serde::{Deserialize, Serialize};

/// Promotional artwork linked from a secondary catalog (logos, backdrops, openings)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkDetails {
    /// Id of the linked title in the artwork catalog
    pub id: String,
    pub logos: Vec<String>,
    pub backdrops: Vec<String>,
    pub openings: Vec<OpeningVideo>,
}

/// An opening-credits video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningVideo {
    pub title: String,
    pub youtube_id: String,
    pub thumbnail: Option<String>,
}

impl OpeningVideo {
    pub fn new(title: impl Into<String>, youtube_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            youtube_id: youtube_id.into(),
            thumbnail: None,
        }
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    #[must_use]
    pub fn youtube_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.youtube_id)
    }
}

/// Character sheet fields read from a character page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDetails {
    pub name: String,
    pub japanese_name: Option<String>,
    pub birthdate: Option<String>,
    pub age: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub blood_type: Option<String>,
    pub hair_color: Option<String>,
    pub eye_color: Option<String>,
    pub sign: Option<String>,
    pub likes: Option<String>,
    pub bio: Option<String>,
}

/// A linked character: details plus its picture gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    pub catalog_id: String,
    pub source_url: String,
    #[serde(flatten)]
    pub details: CharacterDetails,
    pub pics: Vec<String>,
}

/// An image body kept in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedImage {
    pub content_type: String,
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
}

/// Image bodies travel as one base64 string rather than a number per byte
mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}

/// AniList media record, stored as returned by the GraphQL API
pub type AnimeMedia = crate::catalog::anilist::Media;
