use super::api_types::{GraphQLResponse, Media, MediaData};
use crate::catalog::{CatalogError, Lookup, Result, provider::HttpClient};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use tracing::debug;

pub const ANILIST_API_URL: &str = "https://graphql.anilist.co";

static TRAILING_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\d+$").expect("Invalid regex"));

const MEDIA_QUERY: &str = r"
query ($search: String) {
    Media (search: $search, type: ANIME) {
        id
        title { romaji english native }
        bannerImage
        coverImage { extraLarge large medium color }
        description
        episodes
        status
        genres
        averageScore
        popularity
        startDate { year month day }
        endDate { year month day }
        trailer { id site thumbnail }
        externalLinks { url site type }
        streamingEpisodes { title thumbnail }
        nextAiringEpisode { id timeUntilAiring }
    }
}
";

/// Search string for a site slug: `naruto-shippuden-355` -> `naruto shippuden`
#[must_use]
pub fn search_title_from_slug(slug: &str) -> String {
    TRAILING_ID.replace(slug.trim(), "").replace('-', " ")
}

/// AniList GraphQL client
#[derive(Debug, Clone)]
pub struct AniListProvider {
    client: HttpClient,
}

impl AniListProvider {
    pub const fn new(client: HttpClient) -> Self {
        Self { client }
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, variables: serde_json::Value) -> Result<T> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables
        });

        let response: GraphQLResponse<T> = self.client.post_json("", &body).await?;

        if let Some(errors) = response.errors
            && let Some(error) = errors.first()
        {
            return Err(CatalogError::Api {
                status: error.status.unwrap_or(400),
                message: error.message.clone(),
            });
        }

        response
            .data
            .ok_or_else(|| CatalogError::Parse("No data in response".to_string()))
    }

    /// Look up the anime a site slug refers to.
    pub async fn find_anime(&self, slug: &str) -> Result<Lookup<Media>> {
        let search = search_title_from_slug(slug);
        if search.trim().is_empty() {
            return Ok(Lookup::NoMatch);
        }
        debug!("AniList search for {:?}", search);

        let data: MediaData = match self
            .query(MEDIA_QUERY, serde_json::json!({ "search": search }))
            .await
        {
            Ok(data) => data,
            Err(e) if e.is_not_found() => return Ok(Lookup::NoMatch),
            Err(e) => return Err(e),
        };

        Ok(data.media.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_title_from_slug() {
        assert_eq!(search_title_from_slug("naruto-shippuden-355"), "naruto shippuden");
        assert_eq!(search_title_from_slug("one-piece"), "one piece");
        assert_eq!(search_title_from_slug("86-eighty-six-12"), "86 eighty six");
        assert_eq!(search_title_from_slug("-12"), "");
    }

    #[test]
    fn test_media_deserializes_sparse_record() {
        let raw = serde_json::json!({
            "Media": {
                "id": 20,
                "title": {"romaji": "Naruto", "english": "Naruto", "native": null},
                "bannerImage": null,
                "coverImage": {"extraLarge": "x.jpg", "large": null, "medium": null, "color": "#e4a15d"},
                "description": "A ninja.",
                "episodes": 220,
                "status": "FINISHED",
                "genres": ["Action"],
                "averageScore": 79,
                "popularity": 500000,
                "startDate": {"year": 2002, "month": 10, "day": 3},
                "endDate": {"year": 2007, "month": 2, "day": null},
                "trailer": null,
                "externalLinks": [{"url": "https://x", "site": "Crunchyroll", "type": "STREAMING"}],
                "streamingEpisodes": null,
                "nextAiringEpisode": null
            }
        });

        let data: MediaData = serde_json::from_value(raw).unwrap();
        let media = data.media.unwrap();

        assert_eq!(media.id, 20);
        assert_eq!(media.display_title(), Some("Naruto"));
        assert_eq!(media.start_date.unwrap().to_iso().as_deref(), Some("2002-10-03"));
        assert_eq!(media.end_date.unwrap().to_iso().as_deref(), Some("2007-02"));
        assert_eq!(media.external_links[0].kind.as_deref(), Some("STREAMING"));
        assert!(media.streaming_episodes.is_empty());
    }

    #[test]
    fn test_missing_media_is_no_match() {
        let data: MediaData = serde_json::from_value(serde_json::json!({"Media": null})).unwrap();
        let lookup: Lookup<Media> = data.media.into();

        assert!(!lookup.is_found());
    }
}
