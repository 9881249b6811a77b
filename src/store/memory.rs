//! Process-local movie store.
//!
//! Follows the same contract as the hosted table: ids are assigned on insert,
//! listings are newest first and scoped per user, and updates or deletes of a
//! missing id fail with `NotFound`. Failures can be injected to exercise the
//! error paths of callers.

use std::collections::VecDeque;

use jiff::Timestamp;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{Result, WatchlistError};
use crate::types::MovieId;

use super::{MovieChanges, MovieRow, MovieStore, NewMovieRow, UserScope};

/// A failure to return from the next store call instead of running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    Network,
    Rejected { status: u16, message: String },
}

impl InjectedFailure {
    fn into_error(self) -> WatchlistError {
        match self {
            InjectedFailure::Network => {
                WatchlistError::Network("connection reset by peer".to_string())
            }
            InjectedFailure::Rejected { status, message } => {
                WatchlistError::Rejected { status, message }
            }
        }
    }
}

/// Number of calls the store has received, by operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub list: usize,
    pub insert: usize,
    pub update: usize,
    pub delete: usize,
}

impl StoreCalls {
    pub fn total(&self) -> usize {
        self.list + self.insert + self.update + self.delete
    }

    pub fn writes(&self) -> usize {
        self.insert + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct State {
    /// Newest first.
    rows: Vec<MovieRow>,
    calls: StoreCalls,
    failures: VecDeque<InjectedFailure>,
    listing_failures: VecDeque<InjectedFailure>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a failure for the next call, whatever operation it is.
    pub fn fail_next(&self, failure: InjectedFailure) {
        self.state.lock().failures.push_back(failure);
    }

    /// Queue a failure for the next listing only. Writes are unaffected.
    pub fn fail_next_listing(&self, failure: InjectedFailure) {
        self.state.lock().listing_failures.push_back(failure);
    }

    pub fn calls(&self) -> StoreCalls {
        self.state.lock().calls
    }

    /// Snapshot of every stored row, newest first.
    pub fn rows(&self) -> Vec<MovieRow> {
        self.state.lock().rows.clone()
    }

    /// Insert a row directly, bypassing call counting and injected failures.
    pub fn seed(&self, scope: &UserScope, row: NewMovieRow) -> MovieRow {
        let mut state = self.state.lock();
        let stored = Self::build_row(scope, row);
        state.rows.insert(0, stored.clone());
        stored
    }

    /// Remove a row directly, as another session would.
    pub fn remove_externally(&self, id: &MovieId) -> bool {
        let mut state = self.state.lock();
        let before = state.rows.len();
        state.rows.retain(|r| r.id != id.as_str());
        state.rows.len() != before
    }

    fn build_row(scope: &UserScope, row: NewMovieRow) -> MovieRow {
        let now = Timestamp::now().to_string();
        MovieRow {
            id: Uuid::new_v4().to_string(),
            user_id: scope.user_id.clone(),
            title: row.title,
            categories: row.categories,
            year: row.year,
            poster_url: row.poster_url,
            watched: false,
            notes: row.notes,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        }
    }

    fn take_failure(state: &mut State) -> Result<()> {
        match state.failures.pop_front() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(()),
        }
    }
}

impl MovieStore for InMemoryStore {
    async fn list_all(&self, scope: &UserScope) -> Result<Vec<MovieRow>> {
        let mut state = self.state.lock();
        state.calls.list += 1;
        Self::take_failure(&mut state)?;
        if let Some(failure) = state.listing_failures.pop_front() {
            return Err(failure.into_error());
        }

        Ok(state
            .rows
            .iter()
            .filter(|r| r.user_id == scope.user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, scope: &UserScope, row: NewMovieRow) -> Result<MovieRow> {
        let mut state = self.state.lock();
        state.calls.insert += 1;
        Self::take_failure(&mut state)?;

        if row.user_id != scope.user_id {
            return Err(WatchlistError::Rejected {
                status: 403,
                message: "row does not belong to the current user".to_string(),
            });
        }

        let stored = Self::build_row(scope, row);
        state.rows.insert(0, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &MovieId, changes: MovieChanges) -> Result<MovieRow> {
        let mut state = self.state.lock();
        state.calls.update += 1;
        Self::take_failure(&mut state)?;

        let row = state
            .rows
            .iter_mut()
            .find(|r| r.id == id.as_str())
            .ok_or_else(|| WatchlistError::NotFound(id.clone()))?;
        changes.apply_to(row);
        row.updated_at = Some(Timestamp::now().to_string());
        Ok(row.clone())
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.delete += 1;
        Self::take_failure(&mut state)?;

        let before = state.rows.len();
        state.rows.retain(|r| r.id != id.as_str());
        if state.rows.len() == before {
            return Err(WatchlistError::NotFound(id.clone()));
        }
        Ok(())
    }
}
