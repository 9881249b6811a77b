use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Result, WatchlistError};

/// Movies shown per page of the watchlist.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Soft bounds suggested to users when entering a release year. The data
/// layer stores any integer.
pub const MIN_SUGGESTED_YEAR: i32 = 1888;
pub const MAX_SUGGESTED_YEAR: i32 = 2030;

/// Categories always offered for filtering, ahead of any others already in
/// use on the list.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Science Fiction",
    "Horror",
    "Romance",
    "Animation",
    "Documentary",
    "Thriller",
];

/// Store-assigned movie identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        MovieId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        MovieId(s.to_string())
    }
}

impl From<String> for MovieId {
    fn from(s: String) -> Self {
        MovieId(s)
    }
}

impl FromStr for MovieId {
    type Err = WatchlistError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(WatchlistError::Validation(
                "movie ID cannot be empty".to_string(),
            ));
        }
        Ok(MovieId(s.to_string()))
    }
}

/// A movie on the user's watchlist, as held in the canonical list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub watched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Movie {
    pub fn has_any_category<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        wanted
            .iter()
            .any(|w| self.categories.iter().any(|c| c == w.as_ref()))
    }

    /// Draft pre-filled with this movie's editable fields.
    pub fn to_draft(&self) -> MovieDraft {
        MovieDraft {
            title: self.title.clone(),
            categories: self.categories.clone(),
            year: self.year,
            poster_url: self.poster_url.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Unvalidated movie fields as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
    pub categories: Vec<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub notes: Option<String>,
}

impl MovieDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_poster_url(mut self, url: impl Into<String>) -> Self {
        self.poster_url = Some(url.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Check and normalize the draft. Never touches the network.
    pub fn validate(self) -> Result<MoviePayload> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(WatchlistError::Validation(
                "title cannot be empty".to_string(),
            ));
        }

        let categories = self
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        let poster_url = match non_blank(self.poster_url) {
            Some(raw) => Some(validate_poster_url(&raw)?),
            None => None,
        };

        Ok(MoviePayload {
            title: title.to_string(),
            categories,
            year: self.year,
            poster_url,
            notes: non_blank(self.notes),
        })
    }
}

/// Validated fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePayload {
    pub title: String,
    pub categories: Vec<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_poster_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| {
        WatchlistError::Validation(format!("poster URL '{raw}' is not an absolute URL: {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(WatchlistError::Validation(format!(
            "poster URL must use http or https, got '{other}'"
        ))),
    }
}
