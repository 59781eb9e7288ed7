use serde::{Deserialize, Deserializer, Serialize};

/// AniList sends `null` for empty lists
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    pub status: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct MediaData {
    #[serde(rename = "Media")]
    pub media: Option<Media>,
}

/// An AniList anime record, kept in the GraphQL field naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub title: Title,
    pub banner_image: Option<String>,
    pub cover_image: Option<CoverImage>,
    pub description: Option<String>,
    pub episodes: Option<i32>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    pub average_score: Option<i32>,
    pub popularity: Option<i32>,
    pub start_date: Option<FuzzyDate>,
    pub end_date: Option<FuzzyDate>,
    pub trailer: Option<Trailer>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub external_links: Vec<ExternalLink>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub streaming_episodes: Vec<StreamingEpisode>,
    pub next_airing_episode: Option<AiringEpisode>,
}

impl Media {
    /// English title, else romaji
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.title.english.as_deref().or(self.title.romaji.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

impl FuzzyDate {
    /// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`, depending on what is known
    #[must_use]
    pub fn to_iso(&self) -> Option<String> {
        match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => Some(format!("{y:04}-{m:02}-{d:02}")),
            (Some(y), Some(m), None) => Some(format!("{y:04}-{m:02}")),
            (Some(y), None, None) => Some(format!("{y:04}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub id: Option<String>,
    pub site: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub url: Option<String>,
    pub site: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingEpisode {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiringEpisode {
    pub id: i64,
    pub time_until_airing: Option<i64>,
}
