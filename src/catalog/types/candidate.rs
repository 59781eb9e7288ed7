use serde::{Deserialize, Serialize};

/// Anything the title linker can score.
pub trait Titled {
    fn title(&self) -> &str;
}

/// Anything the name linker can compare, with the titles it appears in.
pub trait Named {
    fn name(&self) -> &str;

    /// Titles (anime, manga) this record is associated with.
    fn appearances(&self) -> &[String] {
        &[]
    }
}

/// A title row scraped from a secondary catalog's search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTitle {
    /// Title text as shown by the catalog
    pub raw_title: String,
    /// Catalog-specific identifier
    pub catalog_id: String,
    /// Page the candidate was scraped from
    pub source_url: String,
}

impl CandidateTitle {
    pub fn new(raw_title: impl Into<String>, catalog_id: impl Into<String>) -> Self {
        Self {
            raw_title: raw_title.into(),
            catalog_id: catalog_id.into(),
            source_url: String::new(),
        }
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }
}

impl Titled for CandidateTitle {
    fn title(&self) -> &str {
        &self.raw_title
    }
}

/// A character row scraped from a secondary catalog's search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateName {
    pub name: String,
    pub catalog_id: String,
    pub source_url: String,
    /// Anime/manga the character is listed under
    pub appearances: Vec<String>,
}

impl CandidateName {
    pub fn new(name: impl Into<String>, catalog_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog_id: catalog_id.into(),
            source_url: String::new(),
            appearances: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    #[must_use]
    pub fn with_appearance(mut self, title: impl Into<String>) -> Self {
        self.appearances.push(title.into());
        self
    }
}

impl Named for CandidateName {
    fn name(&self) -> &str {
        &self.name
    }

    fn appearances(&self) -> &[String] {
        &self.appearances
    }
}

/// The candidate a linker settled on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult<C> {
    pub candidate: C,
    /// Similarity in `[0, 1]`
    pub score: f64,
}

/// Outcome of a lookup that may legitimately find nothing.
///
/// `NoMatch` is a normal, cacheable answer; failures travel as
/// [`CatalogError`](crate::CatalogError) instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    NoMatch,
}

impl<T> Lookup<T> {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NoMatch => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Self::Found(value) => Lookup::Found(value),
            Self::NoMatch => Lookup::NoMatch,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NoMatch => Lookup::NoMatch,
        }
    }
}

impl<T> Default for Lookup<T> {
    fn default() -> Self {
        Self::NoMatch
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NoMatch, Self::Found)
    }
}
