use serde_json::json;

use crate::cli::OutputOptions;
use crate::display::format_movie_card;
use crate::error::Result;
use crate::types::MovieDraft;

use super::{CommandOutput, Session};

/// Fields for a new movie
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub title: String,
    pub categories: Vec<String>,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub notes: Option<String>,
}

impl From<AddOptions> for MovieDraft {
    fn from(options: AddOptions) -> Self {
        MovieDraft {
            title: options.title,
            categories: options.categories,
            year: options.year,
            poster_url: options.poster_url,
            notes: options.notes,
        }
    }
}

/// Add a movie to the watchlist
pub async fn cmd_add(options: AddOptions, output: OutputOptions) -> Result<()> {
    // Reject bad input before touching configuration or the network
    MovieDraft::from(options.clone()).validate()?;

    let mut session = Session::open().await?;
    let movie = session
        .coordinator
        .create(&mut session.list, options.into())
        .await?;

    CommandOutput::new(json!({
        "action": "added",
        "movie": movie,
    }))
    .with_text(format!("Added {}", format_movie_card(&movie)))
    .print(output)
}
