//! Paged browsing of the popular listing.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::Result;
use crate::list::RefreshOutcome;
use crate::types::Movie;

use super::{
    CastMember, CatalogMovie, MAX_CATALOG_PAGES, MetadataApi, MovieDetail, PopularPage, TOP_CAST,
    format_runtime,
};

/// Identifies one page fetch. Only the most recent ticket may apply its
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    generation: u64,
    page: u32,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PageState {
    #[default]
    Idle,
    Loading,
    Loaded(PopularPage),
    /// The fetch failed. Nothing retries automatically.
    Failed(String),
}

/// A listing item annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry<'a> {
    #[serde(flatten)]
    pub movie: &'a CatalogMovie,
    /// A watchlist movie carries exactly the same title.
    pub in_list: bool,
    pub genres: Vec<&'static str>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    page: u32,
    last_page: u32,
    state: PageState,
    generation: u64,
}

impl Default for CatalogBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBrowser {
    pub fn new() -> Self {
        Self {
            page: 1,
            last_page: MAX_CATALOG_PAGES,
            state: PageState::Idle,
            generation: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Highest page that can be requested. Before the first page arrives
    /// this is the API-wide limit.
    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page
    }

    /// Move to page `n`, clamped to `1..=last_page`, and start its fetch.
    pub fn go_to_page(&mut self, n: u32) -> FetchTicket {
        self.page = n.clamp(1, self.last_page);
        self.generation += 1;
        self.state = PageState::Loading;
        FetchTicket {
            generation: self.generation,
            page: self.page,
        }
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.has_next().then(|| self.go_to_page(self.page + 1))
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        self.has_previous().then(|| self.go_to_page(self.page - 1))
    }

    /// Apply a fetch result if `ticket` is still the latest fetch.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<PopularPage>,
    ) -> Result<RefreshOutcome> {
        if ticket.generation != self.generation {
            tracing::debug!(page = ticket.page, "dropping superseded catalog page");
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                self.last_page = page.last_page();
                self.state = PageState::Loaded(page);
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(page = ticket.page, error = %e, "catalog page failed to load");
                self.state = PageState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch the current page.
    pub async fn load<A: MetadataApi>(&mut self, api: &A) -> Result<RefreshOutcome> {
        self.load_page(api, self.page).await
    }

    /// Move to page `n` (clamped) and fetch it.
    pub async fn load_page<A: MetadataApi>(&mut self, api: &A, n: u32) -> Result<RefreshOutcome> {
        let ticket = self.go_to_page(n);
        let result = api.popular(ticket.page).await;
        self.finish_fetch(ticket, result)
    }

    /// Items of the loaded page, in API order. Empty unless a page is loaded.
    pub fn entries<'a>(&'a self, list: &[Movie]) -> Vec<CatalogEntry<'a>> {
        let PageState::Loaded(page) = &self.state else {
            return Vec::new();
        };

        let titles: HashSet<&str> = list.iter().map(|m| m.title.as_str()).collect();
        page.results
            .iter()
            .map(|movie| CatalogEntry {
                movie,
                in_list: titles.contains(movie.title.as_str()),
                genres: movie.genre_names(),
                year: movie.year(),
            })
            .collect()
    }
}

/// Everything shown on a single movie's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetailView {
    pub detail: MovieDetail,
    /// Leading cast, in billing order.
    pub cast: Vec<CastMember>,
    /// Set when credits could not be loaded; the detail is still shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_error: Option<String>,
    pub runtime: Option<String>,
    pub in_list: bool,
}

/// Fetch detail and credits together. Only the detail is required.
pub async fn fetch_detail<A: MetadataApi>(
    api: &A,
    id: u64,
    list: &[Movie],
) -> Result<MovieDetailView> {
    let (detail, credits) = futures::join!(api.movie_detail(id), api.movie_credits(id));
    let detail = detail?;

    let (cast, credits_error) = match credits {
        Ok(credits) => (credits.cast.into_iter().take(TOP_CAST).collect(), None),
        Err(e) => {
            tracing::warn!(id, error = %e, "credits unavailable");
            (Vec::new(), Some(e.to_string()))
        }
    };

    Ok(MovieDetailView {
        runtime: format_runtime(detail.runtime),
        in_list: list.iter().any(|m| m.title == detail.title),
        detail,
        cast,
        credits_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Credits;
    use crate::error::WatchlistError;
    use crate::types::MovieId;

    fn item(id: u64, title: &str, genre_ids: &[u32]) -> CatalogMovie {
        CatalogMovie {
            id,
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            release_date: Some("2024-03-01".to_string()),
            vote_average: 7.5,
            genre_ids: genre_ids.to_vec(),
        }
    }

    fn page(n: u32, total_pages: u32) -> PopularPage {
        PopularPage {
            page: n,
            results: vec![
                item(693134, "Dune: Part Two", &[878, 12, 28, 18]),
                item(1022789, "Inside Out 2", &[16, 10751]),
            ],
            total_pages,
            total_results: 20 * u64::from(total_pages),
        }
    }

    fn watchlist_movie(title: &str) -> Movie {
        Movie {
            id: MovieId::from("w1"),
            title: title.to_string(),
            categories: vec![],
            year: None,
            poster_url: None,
            watched: false,
            notes: None,
        }
    }

    #[test]
    fn test_go_to_page_clamps_before_first_load() {
        let mut browser = CatalogBrowser::new();
        assert_eq!(browser.go_to_page(0).page(), 1);
        assert_eq!(browser.go_to_page(9999).page(), MAX_CATALOG_PAGES);
    }

    #[test]
    fn test_reported_total_narrows_the_range() {
        let mut browser = CatalogBrowser::new();
        let ticket = browser.go_to_page(1);
        browser.finish_fetch(ticket, Ok(page(1, 3))).unwrap();
        assert_eq!(browser.last_page(), 3);
        assert_eq!(browser.go_to_page(10).page(), 3);
    }

    #[test]
    fn test_reported_total_is_capped() {
        let mut browser = CatalogBrowser::new();
        let ticket = browser.go_to_page(1);
        browser.finish_fetch(ticket, Ok(page(1, 45_000))).unwrap();
        assert_eq!(browser.last_page(), MAX_CATALOG_PAGES);
    }

    #[test]
    fn test_next_and_previous_respect_bounds() {
        let mut browser = CatalogBrowser::new();
        assert!(browser.previous_page().is_none());

        let ticket = browser.go_to_page(1);
        browser.finish_fetch(ticket, Ok(page(1, 2))).unwrap();
        assert_eq!(browser.next_page().map(|t| t.page()), Some(2));
        assert!(browser.next_page().is_none());
        assert_eq!(browser.previous_page().map(|t| t.page()), Some(1));
    }

    #[test]
    fn test_superseded_page_is_discarded() {
        let mut browser = CatalogBrowser::new();
        let stale = browser.go_to_page(1);
        let fresh = browser.go_to_page(2);

        let outcome = browser.finish_fetch(fresh, Ok(page(2, 10))).unwrap();
        assert_eq!(outcome, RefreshOutcome::Applied);
        let outcome = browser.finish_fetch(stale, Ok(page(1, 10))).unwrap();
        assert_eq!(outcome, RefreshOutcome::Superseded);

        match browser.state() {
            PageState::Loaded(p) => assert_eq!(p.page, 2),
            other => panic!("expected loaded page, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_sets_error_state() {
        let mut browser = CatalogBrowser::new();
        let ticket = browser.go_to_page(4);
        let err = browser
            .finish_fetch(ticket, Err(WatchlistError::Api("HTTP 503".into())))
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(browser.state(), PageState::Failed(_)));
        assert!(browser.entries(&[]).is_empty());
        assert_eq!(browser.page(), 4);
    }

    #[test]
    fn test_entries_flag_exact_title_matches() {
        let mut browser = CatalogBrowser::new();
        let ticket = browser.go_to_page(1);
        browser.finish_fetch(ticket, Ok(page(1, 1))).unwrap();

        let list = vec![watchlist_movie("Dune: Part Two"), watchlist_movie("inside out 2")];
        let entries = browser.entries(&list);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].in_list);
        assert!(!entries[1].in_list);
        assert_eq!(entries[0].genres, vec!["Science Fiction", "Adventure", "Action"]);
        assert_eq!(entries[1].genres, vec!["Animation", "Family"]);
        assert_eq!(entries[0].year, Some(2024));
    }

    struct FakeApi {
        credits_fail: bool,
    }

    impl MetadataApi for FakeApi {
        async fn popular(&self, page_no: u32) -> Result<PopularPage> {
            Ok(page(page_no, 7))
        }

        async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
            Ok(serde_json::from_value(serde_json::json!({
                "id": id,
                "title": "Dune: Part Two",
                "runtime": 166,
                "genres": [{"id": 878, "name": "Science Fiction"}]
            }))?)
        }

        async fn movie_credits(&self, _id: u64) -> Result<Credits> {
            if self.credits_fail {
                return Err(WatchlistError::Api("HTTP 500".into()));
            }
            let cast = (0..20)
                .map(|i| CastMember {
                    id: i,
                    name: format!("Actor {i}"),
                    character: format!("Role {i}"),
                    profile_path: None,
                })
                .collect();
            Ok(Credits { cast })
        }
    }

    #[tokio::test]
    async fn test_load_fetches_current_page() {
        let api = FakeApi { credits_fail: false };
        let mut browser = CatalogBrowser::new();
        browser.load_page(&api, 3).await.unwrap();
        assert_eq!(browser.last_page(), 7);

        browser.load_page(&api, 50).await.unwrap();
        assert_eq!(browser.page(), 7);
        browser.load(&api).await.unwrap();
        match browser.state() {
            PageState::Loaded(p) => assert_eq!(p.page, 7),
            other => panic!("expected loaded page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_detail_keeps_top_cast() {
        let list = vec![watchlist_movie("Dune: Part Two")];
        let view = fetch_detail(&FakeApi { credits_fail: false }, 693134, &list)
            .await
            .unwrap();
        assert_eq!(view.cast.len(), TOP_CAST);
        assert_eq!(view.cast[0].name, "Actor 0");
        assert_eq!(view.runtime.as_deref(), Some("2h 46min"));
        assert!(view.in_list);
        assert!(view.credits_error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_detail_survives_missing_credits() {
        let view = fetch_detail(&FakeApi { credits_fail: true }, 693134, &[])
            .await
            .unwrap();
        assert!(view.cast.is_empty());
        assert!(view.credits_error.is_some());
        assert!(!view.in_list);
    }
}
