use crate::cli::OutputOptions;
use crate::display::{empty_list_message, format_movie_line, page_footer};
use crate::error::Result;

use super::{CommandOutput, Session};

/// Filter and page selection for `ls`
#[derive(Debug, Clone, Default)]
pub struct LsOptions {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub page: usize,
}

/// List one page of the watchlist
pub async fn cmd_ls(options: LsOptions, output: OutputOptions) -> Result<()> {
    let mut session = Session::open().await?;
    let list = &mut session.list;

    if let Some(search) = options.search {
        list.set_search(search);
    }
    if !options.categories.is_empty() {
        list.set_categories(options.categories);
    }
    list.set_page(options.page.max(1));

    let view = list.view();

    let text = if view.is_empty() {
        empty_list_message(list.filter().is_active(), view.total_pages, view.page)
    } else {
        let mut lines: Vec<String> = view.items.iter().map(format_movie_line).collect();
        if let Some(footer) = page_footer(&view) {
            lines.push(String::new());
            lines.push(footer);
        }
        lines.join("\n")
    };

    CommandOutput::new(serde_json::to_value(&view)?)
        .with_text(text)
        .print(output)
}
