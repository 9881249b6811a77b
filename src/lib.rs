pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod list;
pub mod mutation;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_guards;

pub use catalog::{CatalogBrowser, MetadataApi, MovieDetail, PopularPage, TmdbClient};
pub use config::Config;
pub use error::{FailureKind, Result, WatchlistError};
pub use list::{ListController, ListFilter, ListView, LoadState, Pagination, derive_view};
pub use mutation::MutationCoordinator;
pub use store::{InMemoryStore, MovieRow, MovieStore, RestStore, UserScope};
pub use types::{DEFAULT_CATEGORIES, DEFAULT_PAGE_SIZE, Movie, MovieDraft, MovieId, MoviePayload};
