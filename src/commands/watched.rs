use serde_json::json;

use crate::cli::OutputOptions;
use crate::error::Result;

use super::{CommandOutput, Session};

/// Set the watched flag of a movie
pub async fn cmd_set_watched(id: &str, watched: bool, output: OutputOptions) -> Result<()> {
    let mut session = Session::open().await?;
    let id = session.list.resolve_id(id)?;

    let movie = session
        .coordinator
        .toggle_watched(&mut session.list, &id, watched)
        .await?;

    let state = if watched { "watched" } else { "not watched" };
    CommandOutput::new(json!({
        "action": "watched_changed",
        "id": movie.id,
        "title": movie.title,
        "watched": movie.watched,
    }))
    .with_text(format!("Marked '{}' as {state}", movie.title))
    .print(output)
}
