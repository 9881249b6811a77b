//! Movie metadata catalog.
//!
//! Read-only access to the external metadata API: the paged "popular"
//! listing, per-movie details and cast credits. The listing uses a compact
//! item shape that only carries genre ids, so names come from a local table.

pub mod browser;
pub mod tmdb;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::MovieDraft;

pub use browser::{CatalogBrowser, CatalogEntry, MovieDetailView, PageState, fetch_detail};
pub use tmdb::TmdbClient;

/// Highest page the metadata API will serve for any listing.
pub const MAX_CATALOG_PAGES: u32 = 500;

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const POSTER_SIZE: &str = "w300";

/// Number of genres shown per listing item.
pub const LISTED_GENRES: usize = 3;

/// Number of cast members shown on the detail view.
pub const TOP_CAST: usize = 12;

/// Compact listing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl CatalogMovie {
    pub fn year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(release_year)
    }

    /// Names of the first few genres that the local table knows.
    pub fn genre_names(&self) -> Vec<&'static str> {
        self.genre_ids
            .iter()
            .take(LISTED_GENRES)
            .filter_map(|id| genre_name(*id))
            .collect()
    }
}

/// One page of the popular listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularPage {
    pub page: u32,
    pub results: Vec<CatalogMovie>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl PopularPage {
    /// Last reachable page: the reported total, capped by the API limit.
    pub fn last_page(&self) -> u32 {
        self.total_pages.clamp(1, MAX_CATALOG_PAGES)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub name: String,
}

/// Full movie details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub original_language: String,
    /// Release status such as `Released` or `Post Production`.
    #[serde(default)]
    pub status: Option<String>,
    /// US dollars; 0 when unknown.
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
}

impl MovieDetail {
    pub fn year(&self) -> Option<i32> {
        self.release_date.as_deref().and_then(release_year)
    }

    /// Spoken language names, or the original language code when none are
    /// listed.
    pub fn languages(&self) -> Vec<&str> {
        let spoken: Vec<&str> = self
            .spoken_languages
            .iter()
            .map(|l| {
                if l.english_name.is_empty() {
                    l.name.as_str()
                } else {
                    l.english_name.as_str()
                }
            })
            .filter(|name| !name.is_empty())
            .collect();
        if spoken.is_empty() && !self.original_language.is_empty() {
            return vec![self.original_language.as_str()];
        }
        spoken
    }

    /// Draft for adding this movie to the watchlist.
    pub fn to_draft(&self) -> MovieDraft {
        MovieDraft {
            title: self.title.clone(),
            categories: self.genres.iter().map(|g| g.name.clone()).collect(),
            year: self.year(),
            poster_url: self.poster_path.as_deref().map(poster_url),
            notes: Some(self.overview.clone()).filter(|o| !o.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Common interface for metadata providers
pub trait MetadataApi: Send + Sync {
    /// Fetch one page (1-indexed) of the popular listing.
    fn popular(&self, page: u32) -> impl Future<Output = Result<PopularPage>> + Send;

    fn movie_detail(&self, id: u64) -> impl Future<Output = Result<MovieDetail>> + Send;

    fn movie_credits(&self, id: u64) -> impl Future<Output = Result<Credits>> + Send;
}

/// Genre names for the ids used by the compact listing shape.
pub fn genre_name(id: u32) -> Option<&'static str> {
    let name = match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        _ => return None,
    };
    Some(name)
}

/// Year part of a `YYYY-MM-DD` release date.
pub fn release_year(date: &str) -> Option<i32> {
    date.split('-').next()?.trim().parse().ok()
}

/// Absolute poster URL for an image path returned by the API.
pub fn poster_url(path: &str) -> String {
    format!("{IMAGE_BASE_URL}/{POSTER_SIZE}{path}")
}

/// Runtime in minutes as `2h 49min`.
pub fn format_runtime(minutes: Option<u32>) -> Option<String> {
    match minutes {
        None | Some(0) => None,
        Some(m) => Some(format!("{}h {}min", m / 60, m % 60)),
    }
}
