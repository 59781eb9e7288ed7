use crate::catalog::{
    CacheKey, ChapterListingSource, ChapterRecord, ChapterRowExtractor, Fetcher, ListingKind,
    Result, UpstreamPayload, reconcile_chapters,
};
use std::time::Duration;
use tracing::{debug, warn};

/// Listing id of a manga: `jujutsu-kaisenn.rl2vm` -> `rl2vm`
#[must_use]
pub fn short_id(manga_id: &str) -> &str {
    manga_id
        .split('.')
        .nth(1)
        .filter(|id| !id.is_empty())
        .unwrap_or(manga_id)
}

/// Chapter list of a manga, merged from the reader and manga-page listings
pub struct ChapterService<L, X> {
    fetcher: Fetcher,
    listing: L,
    extractor: X,
    base_url: String,
    ttl: Duration,
}

impl<L, X> ChapterService<L, X>
where
    L: ChapterListingSource,
    X: ChapterRowExtractor,
{
    pub fn new(fetcher: Fetcher, listing: L, extractor: X, base_url: &str, ttl: Duration) -> Self {
        Self {
            fetcher,
            listing,
            extractor,
            base_url: base_url.trim_end_matches('/').to_owned(),
            ttl,
        }
    }

    /// Chapters of `manga_id`, newest first.
    ///
    /// The reader listing is required; if it cannot be fetched the error is
    /// returned and nothing is cached. The manga-page listing only adds
    /// titles and release times.
    pub async fn chapters(&self, manga_id: &str) -> Result<Vec<ChapterRecord>> {
        let key = CacheKey::manga_chapters(manga_id);

        self.fetcher
            .cached(key.as_str(), self.ttl, || self.resolve(manga_id))
            .await
    }

    async fn resolve(&self, manga_id: &str) -> Result<Vec<ChapterRecord>> {
        let id = short_id(manga_id);
        let (read, manga) = tokio::join!(
            self.listing.listing(ListingKind::Read, id),
            self.listing.listing(ListingKind::Manga, id),
        );

        let read = UpstreamPayload::decode(&read?);
        let Some(primary_html) = read.html_fragment() else {
            debug!("Empty reader listing for {}", manga_id);
            return Ok(Vec::new());
        };
        let primary = self.extractor.primary_rows(primary_html);

        let secondary = match manga {
            Ok(body) => UpstreamPayload::decode(&body)
                .html_fragment()
                .map(|html| self.extractor.secondary_rows(html))
                .unwrap_or_default(),
            Err(e) => {
                warn!("Manga listing for {} unavailable, titles and dates degraded: {}", manga_id, e);
                Vec::new()
            }
        };

        let mut chapters = reconcile_chapters(&primary, &secondary);
        for chapter in &mut chapters {
            chapter.url = self.absolute_url(&chapter.url);
        }

        Ok(chapters)
    }

    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_owned()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, MemoryStore, RawChapterRow};
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Default)]
    struct FakeListing {
        read_calls: AtomicUsize,
        read_fails: bool,
        manga_fails: bool,
    }

    #[async_trait]
    impl ChapterListingSource for FakeListing {
        async fn listing(&self, kind: ListingKind, manga_id: &str) -> Result<String> {
            assert_eq!(manga_id, "rl2vm");
            match kind {
                ListingKind::Read => {
                    self.read_calls.fetch_add(1, Ordering::SeqCst);
                    if self.read_fails {
                        return Err(CatalogError::Timeout("read".into()));
                    }
                    Ok(r#"{"status":200,"result":{"html":"2=/read/rl2vm/en/chapter-2;1=/read/rl2vm/en/chapter-1"}}"#.into())
                }
                ListingKind::Manga => {
                    if self.manga_fails {
                        return Err(CatalogError::Upstream("refused".into()));
                    }
                    Ok(r#"{"status":200,"result":"2=Cursed Womb|1 day ago;1=Ryomen Sukuna|Apr 05, 2021"}"#.into())
                }
            }
        }
    }

    /// Rows encoded as `number=url` or `number=title|time`, `;`-separated
    struct PairExtractor;

    impl ChapterRowExtractor for PairExtractor {
        fn primary_rows(&self, fragment: &str) -> Vec<RawChapterRow> {
            fragment
                .split(';')
                .filter_map(|row| row.split_once('='))
                .map(|(number, url)| RawChapterRow::new(number).with_url(url))
                .collect()
        }

        fn secondary_rows(&self, fragment: &str) -> Vec<RawChapterRow> {
            fragment
                .split(';')
                .filter_map(|row| row.split_once('='))
                .filter_map(|(number, rest)| {
                    let (title, time) = rest.split_once('|')?;
                    Some(RawChapterRow::new(number).with_title(title).with_time(time))
                })
                .collect()
        }
    }

    fn service(listing: FakeListing) -> ChapterService<FakeListing, PairExtractor> {
        let fetcher = Fetcher::new(Arc::new(MemoryStore::new()));
        ChapterService::new(fetcher, listing, PairExtractor, "https://mangafire.to/", Duration::from_secs(1800))
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("jujutsu-kaisenn.rl2vm"), "rl2vm");
        assert_eq!(short_id("rl2vm"), "rl2vm");
        assert_eq!(short_id("broken."), "broken.");
    }

    #[tokio::test]
    async fn test_merges_both_listings() {
        let service = service(FakeListing::default());

        let chapters = service.chapters("jujutsu-kaisenn.rl2vm").await.unwrap();

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter_number, 2.0);
        assert_eq!(chapters[0].title, "Cursed Womb");
        assert_eq!(chapters[0].url, "https://mangafire.to/read/rl2vm/en/chapter-2");
        assert_eq!(chapters[1].title, "Ryomen Sukuna");
        assert_eq!(chapters[1].published_at.to_rfc3339(), "2021-04-05T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_secondary_failure_degrades() {
        let service = service(FakeListing {
            manga_fails: true,
            ..Default::default()
        });

        let chapters = service.chapters("jujutsu-kaisenn.rl2vm").await.unwrap();

        let titles: Vec<_> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter 2", "Chapter 1"]);
    }

    #[tokio::test]
    async fn test_primary_failure_propagates_uncached() {
        let service = service(FakeListing {
            read_fails: true,
            ..Default::default()
        });

        assert!(service.chapters("jujutsu-kaisenn.rl2vm").await.is_err());
        assert!(service.chapters("jujutsu-kaisenn.rl2vm").await.is_err());
        assert_eq!(service.listing.read_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_result_is_cached() {
        let service = service(FakeListing::default());

        service.chapters("jujutsu-kaisenn.rl2vm").await.unwrap();
        service.chapters("jujutsu-kaisenn.rl2vm").await.unwrap();

        assert_eq!(service.listing.read_calls.load(Ordering::SeqCst), 1);
    }
}
