//! List state controller.
//!
//! [`ListController`] owns the canonical list (the in-memory mirror of the
//! user's stored movies) together with the filter and page state, and
//! computes the derived view on demand. The canonical list is only ever
//! replaced by a refresh from the store; nothing patches it in place.

pub mod filter;
pub mod pagination;

use std::collections::{BTreeSet, HashMap, HashSet};
use std::num::NonZeroUsize;

use serde::Serialize;

use crate::error::{FailureKind, Result, WatchlistError};
use crate::store::{MovieRow, MovieStore, UserScope};
use crate::types::{DEFAULT_CATEGORIES, Movie, MovieId};

pub use filter::{ListFilter, filter_movies};
pub use pagination::{Pagination, total_pages};

/// One row of the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewItem<'a> {
    #[serde(flatten)]
    pub movie: &'a Movie,
    /// A mutation on this movie is in flight; its fields may be stale.
    pub pending: bool,
}

/// The filtered and paginated slice actually rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView<'a> {
    pub items: Vec<ViewItem<'a>>,
    pub page: usize,
    pub total_pages: usize,
    /// Movies matching the filter across all pages.
    pub total_matches: usize,
}

impl ListView<'_> {
    /// Page controls are only shown when there is more than one page.
    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.items.iter().map(|item| item.movie)
    }
}

/// Filter `movies`, then cut out the requested page.
///
/// Pure: the canonical order is preserved and nothing is re-sorted.
pub fn derive_view<'a>(
    movies: &'a [Movie],
    filter: &ListFilter,
    pagination: Pagination,
) -> ListView<'a> {
    let matches = filter_movies(movies, filter);
    let total_matches = matches.len();
    let range = pagination.slice_range(total_matches);

    ListView {
        items: matches[range]
            .iter()
            .map(|movie| ViewItem {
                movie,
                pending: false,
            })
            .collect(),
        page: pagination.page,
        total_pages: total_pages(total_matches, pagination.page_size),
        total_matches,
    }
}

/// Where the canonical list stands relative to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Never loaded.
    #[default]
    Idle,
    Loading,
    Ready,
    /// The last refresh failed; the previous list is still shown.
    Failed { kind: FailureKind, message: String },
}

/// Identifies one refresh. Only the most recently issued ticket may apply
/// its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RefreshTicket(u64);

/// Outcome of handing a fetch result to [`ListController::finish_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A newer refresh was started; this result was dropped.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct ListController {
    movies: Vec<Movie>,
    filter: ListFilter,
    pagination: Pagination,
    load_state: LoadState,
    /// Writes in flight.
    pending: HashSet<MovieId>,
    /// Written ids still shown with their pre-write values, keyed by the
    /// refresh generation current when the write completed.
    awaiting_refresh: HashMap<MovieId, u64>,
    generation: u64,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(pagination::default_page_size())
    }
}

impl ListController {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            movies: Vec::new(),
            filter: ListFilter::default(),
            pagination: Pagination::new(1, page_size),
            load_state: LoadState::Idle,
            pending: HashSet::new(),
            awaiting_refresh: HashMap::new(),
            generation: 0,
        }
    }

    /// Build a controller from a configured page size, rejecting zero.
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        NonZeroUsize::new(page_size)
            .map(Self::new)
            .ok_or_else(|| WatchlistError::Config("page size must be greater than zero".into()))
    }

    /// The canonical list, newest first. The only writer is
    /// [`ListController::finish_refresh`].
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn page(&self) -> usize {
        self.pagination.page
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search = text.into();
        self.pagination.page = 1;
    }

    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.categories = categories.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        self.pagination.page = 1;
    }

    /// Select `category` if unselected, otherwise unselect it.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.filter.categories.remove(category) {
            self.filter.categories.insert(category.to_string());
        }
        self.pagination.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter = ListFilter::default();
        self.pagination.page = 1;
    }

    /// Jump to page `n`. Not clamped: an out-of-range page yields an empty
    /// slice, and callers only offer pages in `1..=total_pages`.
    pub fn set_page(&mut self, n: usize) {
        self.pagination.page = n;
    }

    pub fn view(&self) -> ListView<'_> {
        let mut view = derive_view(&self.movies, &self.filter, self.pagination);
        for item in &mut view.items {
            item.pending = self.is_pending(&item.movie.id);
        }
        view
    }

    /// Categories to offer for filtering, with how many listed movies carry
    /// each. The defaults come first, in their fixed order, followed by any
    /// other category in order of first appearance.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = DEFAULT_CATEGORIES
            .iter()
            .map(|c| (c.to_string(), 0))
            .collect();
        for movie in &self.movies {
            // A label repeated on one movie counts once.
            let unique: BTreeSet<&str> = movie.categories.iter().map(String::as_str).collect();
            for category in unique {
                match counts.iter_mut().find(|(name, _)| name.as_str() == category) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((category.to_string(), 1)),
                }
            }
        }
        counts
    }

    pub fn get(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| &m.id == id)
    }

    /// Exact, case-sensitive title lookup.
    pub fn find_by_title(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.title == title)
    }

    /// Resolve a full ID or a unique ID prefix against the canonical list.
    pub fn resolve_id(&self, partial: &str) -> Result<MovieId> {
        let partial = partial.trim();
        if partial.is_empty() {
            return Err(WatchlistError::Validation("movie ID cannot be empty".into()));
        }

        if let Some(exact) = self.movies.iter().find(|m| m.id.as_str() == partial) {
            return Ok(exact.id.clone());
        }

        let mut candidates = self
            .movies
            .iter()
            .filter(|m| m.id.as_str().starts_with(partial));
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Ok(only.id.clone()),
            (Some(_), Some(_)) => Err(WatchlistError::AmbiguousId(partial.to_string())),
            (None, _) => Err(WatchlistError::NotFound(MovieId::from(partial))),
        }
    }

    /// A write on `id` is in flight, or has landed but the list has not
    /// been re-read since.
    pub fn is_pending(&self, id: &MovieId) -> bool {
        self.pending.contains(id) || self.awaiting_refresh.contains_key(id)
    }

    pub(crate) fn mark_pending(&mut self, id: &MovieId) {
        self.pending.insert(id.clone());
    }

    /// The write on `id` failed; the listed value is still current.
    pub(crate) fn clear_pending(&mut self, id: &MovieId) {
        self.pending.remove(id);
    }

    /// The write on `id` succeeded. It stays pending until a refresh
    /// started after this point is applied.
    pub(crate) fn settle_pending(&mut self, id: &MovieId) {
        self.pending.remove(id);
        self.awaiting_refresh.insert(id.clone(), self.generation);
    }

    /// Start a refresh. Any ticket issued earlier becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        RefreshTicket(self.generation)
    }

    /// Apply a fetch result if `ticket` is still the latest refresh.
    ///
    /// A failed fetch leaves the canonical list untouched and is returned to
    /// the caller. Results of superseded tickets are dropped, errors included.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<MovieRow>>,
    ) -> Result<RefreshOutcome> {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "dropping superseded refresh"
            );
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(rows) => {
                self.movies = rows.into_iter().map(Movie::from).collect();
                self.awaiting_refresh
                    .retain(|_, written_at| *written_at >= ticket.0);
                self.load_state = LoadState::Ready;
                tracing::debug!(count = self.movies.len(), "canonical list refreshed");
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                self.load_state = LoadState::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Re-read the canonical list from the store.
    pub async fn refresh<S: MovieStore>(
        &mut self,
        store: &S,
        scope: &UserScope,
    ) -> Result<RefreshOutcome> {
        let ticket = self.begin_refresh();
        let result = store.list_all(scope).await;
        self.finish_refresh(ticket, result)
    }
}
