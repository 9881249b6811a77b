use serde_json::json;

use crate::cli::OutputOptions;
use crate::error::Result;

use super::{CommandOutput, Session};

/// Remove a movie from the watchlist
pub async fn cmd_rm(id: &str, output: OutputOptions) -> Result<()> {
    let mut session = Session::open().await?;
    let id = session.list.resolve_id(id)?;
    let title = session
        .list
        .get(&id)
        .map(|m| m.title.clone())
        .unwrap_or_default();

    session.coordinator.delete(&mut session.list, &id).await?;

    CommandOutput::new(json!({
        "action": "removed",
        "id": id,
        "title": title,
        "remaining": session.list.movies().len(),
    }))
    .with_text(format!("Removed '{title}'"))
    .print(output)
}
