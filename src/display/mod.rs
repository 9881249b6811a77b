//! Terminal rendering of watchlist rows, catalog items and movie details.
//!
//! `data_formatting` builds plain text; `cli_formatting` adds colors when
//! stdout supports them.

pub mod cli_formatting;
pub mod data_formatting;

pub use cli_formatting::*;
pub use data_formatting::*;
