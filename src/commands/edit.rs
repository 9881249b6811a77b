use serde_json::json;

use crate::cli::OutputOptions;
use crate::display::format_movie_card;
use crate::error::{Result, WatchlistError};
use crate::types::MovieDraft;

use super::{CommandOutput, Session};

/// Field changes for `edit`. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    pub title: Option<String>,
    pub categories: Option<Vec<String>>,
    /// `Some(None)` removes the year.
    pub year: Option<Option<i32>>,
    /// An empty string removes the poster.
    pub poster_url: Option<String>,
    /// An empty string removes the notes.
    pub notes: Option<String>,
}

impl EditOptions {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.categories.is_none()
            && self.year.is_none()
            && self.poster_url.is_none()
            && self.notes.is_none()
    }

    /// Overlay these changes on an existing draft.
    pub fn apply(self, mut draft: MovieDraft) -> MovieDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(categories) = self.categories {
            draft.categories = categories;
        }
        if let Some(year) = self.year {
            draft.year = year;
        }
        if let Some(poster_url) = self.poster_url {
            draft.poster_url = Some(poster_url);
        }
        if let Some(notes) = self.notes {
            draft.notes = Some(notes);
        }
        draft
    }
}

/// Edit a movie's fields
pub async fn cmd_edit(id: &str, options: EditOptions, output: OutputOptions) -> Result<()> {
    if options.is_empty() {
        return Err(WatchlistError::Validation(
            "nothing to change. Pass at least one of --title, --category, --year, --poster, --notes"
                .to_string(),
        ));
    }

    let mut session = Session::open().await?;
    let id = session.list.resolve_id(id)?;
    let current = session
        .list
        .get(&id)
        .ok_or_else(|| WatchlistError::NotFound(id.clone()))?
        .to_draft();

    let movie = session
        .coordinator
        .update(&mut session.list, &id, options.apply(current))
        .await?;

    CommandOutput::new(json!({
        "action": "updated",
        "movie": movie,
    }))
    .with_text(format!("Updated {}", format_movie_card(&movie)))
    .print(output)
}
