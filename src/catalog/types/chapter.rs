use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `<li>` of a chapter listing, as an extractor read it.
///
/// Every field is optional because listing markup is routinely partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawChapterRow {
    /// Chapter number text, e.g. `"10"` or `"10.5"`
    pub number: Option<String>,
    pub title: Option<String>,
    /// Timestamp text, relative (`"2 days ago"`) or absolute
    pub time: Option<String>,
    pub url: Option<String>,
    /// Catalog-specific chapter id
    pub external_id: Option<String>,
}

impl RawChapterRow {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }
}

/// A reconciled chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRecord {
    pub chapter_number: f64,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub external_id: Option<String>,
    pub url: String,
}
