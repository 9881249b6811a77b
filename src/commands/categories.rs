use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::json;

use crate::cli::OutputOptions;
use crate::error::Result;

use super::{CommandOutput, Session};

/// List the categories available for filtering, with usage counts
pub async fn cmd_categories(output: OutputOptions) -> Result<()> {
    let session = Session::open().await?;
    let counts = session.list.category_counts();

    let width = counts.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);
    let text = counts
        .iter()
        .map(|(name, count)| {
            let line = format!("{name:<width$}  {count}");
            if *count == 0 {
                line.if_supports_color(Stdout, |t| t.dimmed()).to_string()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let json_counts: Vec<_> = counts
        .iter()
        .map(|(name, count)| json!({ "category": name, "movies": count }))
        .collect();

    CommandOutput::new(json!({ "categories": json_counts }))
        .with_text(text)
        .print(output)
}
