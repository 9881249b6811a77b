//! Movie record store.
//!
//! The store is the single source of truth for the user's movies. It is
//! consumed through [`MovieStore`]; rows travel in a snake_case wire shape
//! ([`MovieRow`]) that maps losslessly to the in-memory [`Movie`].

pub mod memory;
pub mod rest;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Movie, MovieId, MoviePayload};

pub use memory::InMemoryStore;
pub use rest::RestStore;

/// Name of the table holding movie rows.
pub const MOVIES_TABLE: &str = "movies";

/// Identifies whose rows are being read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScope {
    pub user_id: String,
}

impl UserScope {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// A movie row as stored remotely.
///
/// Optional fields are always serialized, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    #[serde(default)]
    pub watched: bool,
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl MovieRow {
    pub fn into_movie(self) -> Movie {
        Movie {
            id: MovieId::new(self.id),
            title: self.title,
            categories: self.categories,
            year: self.year,
            poster_url: self.poster_url,
            watched: self.watched,
            notes: self.notes,
        }
    }
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        row.into_movie()
    }
}

/// Insert body. `id`, `watched` and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMovieRow {
    pub user_id: String,
    pub title: String,
    pub categories: Vec<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub notes: Option<String>,
}

impl NewMovieRow {
    pub fn from_payload(scope: &UserScope, payload: MoviePayload) -> Self {
        Self {
            user_id: scope.user_id.clone(),
            title: payload.title,
            categories: payload.categories,
            year: payload.year,
            poster_url: payload.poster_url,
            notes: payload.notes,
        }
    }
}

/// Partial update body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MovieChanges {
    /// Every editable field except `watched`. Absent optionals clear the column.
    Fields {
        title: String,
        categories: Vec<String>,
        year: Option<i32>,
        poster_url: Option<String>,
        notes: Option<String>,
    },
    Watched { watched: bool },
}

impl MovieChanges {
    pub fn watched(value: bool) -> Self {
        MovieChanges::Watched { watched: value }
    }

    /// Apply the changes to a row in place.
    pub fn apply_to(&self, row: &mut MovieRow) {
        match self {
            MovieChanges::Fields {
                title,
                categories,
                year,
                poster_url,
                notes,
            } => {
                row.title = title.clone();
                row.categories = categories.clone();
                row.year = *year;
                row.poster_url = poster_url.clone();
                row.notes = notes.clone();
            }
            MovieChanges::Watched { watched } => row.watched = *watched,
        }
    }
}

impl From<MoviePayload> for MovieChanges {
    fn from(payload: MoviePayload) -> Self {
        MovieChanges::Fields {
            title: payload.title,
            categories: payload.categories,
            year: payload.year,
            poster_url: payload.poster_url,
            notes: payload.notes,
        }
    }
}

/// Common interface for movie stores.
pub trait MovieStore: Send + Sync {
    /// All rows belonging to `scope`, newest first.
    fn list_all(&self, scope: &UserScope) -> impl Future<Output = Result<Vec<MovieRow>>> + Send;

    /// Insert a row and return it as stored.
    fn insert(
        &self,
        scope: &UserScope,
        row: NewMovieRow,
    ) -> impl Future<Output = Result<MovieRow>> + Send;

    /// Update the row with `id`. Fails with `NotFound` when no row matched.
    fn update(
        &self,
        id: &MovieId,
        changes: MovieChanges,
    ) -> impl Future<Output = Result<MovieRow>> + Send;

    /// Delete the row with `id`. Fails with `NotFound` when no row matched.
    fn delete(&self, id: &MovieId) -> impl Future<Output = Result<()>> + Send;
}

impl<S: MovieStore> MovieStore for std::sync::Arc<S> {
    fn list_all(&self, scope: &UserScope) -> impl Future<Output = Result<Vec<MovieRow>>> + Send {
        (**self).list_all(scope)
    }

    fn insert(
        &self,
        scope: &UserScope,
        row: NewMovieRow,
    ) -> impl Future<Output = Result<MovieRow>> + Send {
        (**self).insert(scope, row)
    }

    fn update(
        &self,
        id: &MovieId,
        changes: MovieChanges,
    ) -> impl Future<Output = Result<MovieRow>> + Send {
        (**self).update(id, changes)
    }

    fn delete(&self, id: &MovieId) -> impl Future<Output = Result<()>> + Send {
        (**self).delete(id)
    }
}
