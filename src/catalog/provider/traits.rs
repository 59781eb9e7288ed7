use crate::catalog::{
    Result,
    provider::HttpClient,
    types::{CandidateName, CandidateTitle, CharacterDetails, OpeningVideo, RawChapterRow},
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, ORIGIN, REFERER};

/// Catalog of promotional artwork (logos, backdrops, opening videos)
#[async_trait]
pub trait ArtworkSource: Send + Sync {
    /// Catalog identifier, used in cache keys (e.g. "tmdb")
    fn id(&self) -> &'static str;

    /// Candidate titles for a free-text search
    async fn search(&self, title: &str) -> Result<Vec<CandidateTitle>>;

    async fn logos(&self, id: &str) -> Result<Vec<String>>;

    async fn backdrops(&self, id: &str) -> Result<Vec<String>>;

    async fn openings(&self, id: &str) -> Result<Vec<OpeningVideo>>;
}

/// Catalog of character records
#[async_trait]
pub trait CharacterSource: Send + Sync {
    /// Candidate characters for a name search
    async fn search(&self, name: &str) -> Result<Vec<CandidateName>>;

    /// Character sheet of a linked candidate
    async fn details(&self, candidate: &CandidateName) -> Result<CharacterDetails>;

    /// Picture gallery of a linked candidate
    async fn pictures(&self, candidate: &CandidateName) -> Result<Vec<String>>;
}

/// Which of the two chapter listings to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    /// Reader listing: chapter existence, links and ids
    Read,
    /// Manga page listing: titles and release times
    Manga,
}

impl ListingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Manga => "manga",
        }
    }
}

/// Raw body of a chapter listing endpoint
#[async_trait]
pub trait ChapterListingSource: Send + Sync {
    async fn listing(&self, kind: ListingKind, manga_id: &str) -> Result<String>;
}

/// Turns listing HTML into rows. HTML parsing is up to the implementor.
pub trait ChapterRowExtractor: Send + Sync {
    /// Rows of the reader listing
    fn primary_rows(&self, fragment: &str) -> Vec<RawChapterRow>;

    /// Rows of the manga page listing
    fn secondary_rows(&self, fragment: &str) -> Vec<RawChapterRow>;
}

/// Chapter listings served by `{base}/ajax/{read|manga}/{id}/chapter/en`
#[derive(Debug, Clone)]
pub struct HttpChapterListing {
    client: HttpClient,
    headers: HeaderMap,
}

impl HttpChapterListing {
    pub fn new(client: HttpClient) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(origin) = HeaderValue::from_str(client.base_url().trim_end_matches('/')) {
            headers.insert(ORIGIN, origin);
        }
        if let Ok(referer) = HeaderValue::from_str(&format!("{}/", client.base_url().trim_end_matches('/'))) {
            headers.insert(REFERER, referer);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        Self { client, headers }
    }

    #[must_use]
    pub fn endpoint(kind: ListingKind, manga_id: &str) -> String {
        format!("/ajax/{}/{}/chapter/en", kind.as_str(), urlencoding::encode(manga_id))
    }
}

#[async_trait]
impl ChapterListingSource for HttpChapterListing {
    async fn listing(&self, kind: ListingKind, manga_id: &str) -> Result<String> {
        self.client
            .get_text(&Self::endpoint(kind, manga_id), self.headers.clone())
            .await
    }
}
