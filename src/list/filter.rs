//! Client-side filtering of the canonical list.

use std::collections::BTreeSet;

use crate::types::Movie;

/// Search text and selected categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring matched against titles. Empty = no search.
    pub search: String,
    /// A movie matches when it carries at least one of these. Empty = all.
    pub categories: BTreeSet<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.categories.is_empty()
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        matches_search(movie, &self.search.to_lowercase()) && self.matches_categories(movie)
    }

    fn matches_categories(&self, movie: &Movie) -> bool {
        self.categories.is_empty()
            || movie
                .categories
                .iter()
                .any(|c| self.categories.contains(c))
    }
}

/// `needle` must already be lowercased.
fn matches_search(movie: &Movie, needle: &str) -> bool {
    needle.is_empty() || movie.title.to_lowercase().contains(needle)
}

/// Apply the search predicate, then the category predicate. Order is kept.
pub fn filter_movies<'a>(movies: &'a [Movie], filter: &ListFilter) -> Vec<&'a Movie> {
    let needle = filter.search.to_lowercase();

    movies
        .iter()
        .filter(|m| matches_search(m, &needle))
        .filter(|m| filter.matches_categories(m))
        .collect()
}
