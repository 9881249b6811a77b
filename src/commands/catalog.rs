//! Catalog commands.
//!
//! - `popular`: browse the popular listing
//! - `show`: details and cast of one catalog movie
//! - `adopt`: add a catalog movie to the watchlist

use serde_json::json;

use crate::catalog::{CatalogBrowser, MetadataApi, TmdbClient, fetch_detail};
use crate::cli::OutputOptions;
use crate::display::{format_catalog_line, format_movie_card, format_movie_detail};
use crate::error::Result;

use super::{CommandOutput, Session};

/// Show one page of popular movies, flagging those already on the watchlist
pub async fn cmd_popular(page: u32, output: OutputOptions) -> Result<()> {
    let session = Session::open().await?;
    let api = TmdbClient::from_config(&session.config)?;

    let mut browser = CatalogBrowser::new();
    browser.load_page(&api, page).await?;
    let entries = browser.entries(session.list.movies());

    let mut lines: Vec<String> = entries.iter().map(format_catalog_line).collect();
    if lines.is_empty() {
        lines.push("No movies on this page.".to_string());
    }
    if browser.last_page() > 1 {
        lines.push(String::new());
        lines.push(format!("Page {} of {}", browser.page(), browser.last_page()));
    }

    CommandOutput::new(json!({
        "page": browser.page(),
        "last_page": browser.last_page(),
        "results": entries,
    }))
    .with_text(lines.join("\n"))
    .print(output)
}

/// Show catalog details and leading cast of a movie
pub async fn cmd_show(catalog_id: u64, output: OutputOptions) -> Result<()> {
    let session = Session::open().await?;
    let api = TmdbClient::from_config(&session.config)?;

    let view = fetch_detail(&api, catalog_id, session.list.movies()).await?;

    CommandOutput::new(serde_json::to_value(&view)?)
        .with_text(format_movie_detail(&view))
        .print(output)
}

/// Add a catalog movie to the watchlist
pub async fn cmd_adopt(catalog_id: u64, output: OutputOptions) -> Result<()> {
    let mut session = Session::open().await?;
    let api = TmdbClient::from_config(&session.config)?;

    let detail = api.movie_detail(catalog_id).await?;
    let movie = session
        .coordinator
        .add_from_catalog(&mut session.list, &detail)
        .await?;

    CommandOutput::new(json!({
        "action": "adopted",
        "catalog_id": catalog_id,
        "movie": movie,
    }))
    .with_text(format!("Added {}", format_movie_card(&movie)))
    .print(output)
}
