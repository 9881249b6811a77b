use owo_colors::{OwoColorize, Stream::Stdout};

use crate::catalog::{CatalogEntry, MovieDetailView, poster_url};
use crate::list::ViewItem;
use crate::types::Movie;

use super::data_formatting::{
    cast_table, categories_label, rating_label, short_id, usd_label, year_suffix,
};

fn watched_badge(watched: bool) -> String {
    if watched {
        "[watched]"
            .if_supports_color(Stdout, |t| t.green())
            .to_string()
    } else {
        "[to watch]"
            .if_supports_color(Stdout, |t| t.yellow())
            .to_string()
    }
}

/// Format a watchlist row for single-line display with colors
pub fn format_movie_line(item: &ViewItem<'_>) -> String {
    let movie = item.movie;
    let id = format!("{:8}", short_id(&movie.id));

    let mut line = format!(
        "{} {} {}{}",
        id.if_supports_color(Stdout, |t| t.cyan()),
        watched_badge(movie.watched),
        movie.title.if_supports_color(Stdout, |t| t.bold()),
        year_suffix(movie.year),
    );

    if !movie.categories.is_empty() {
        let categories = format!("- {}", categories_label(&movie.categories));
        line.push_str(&format!(
            " {}",
            categories.if_supports_color(Stdout, |t| t.dimmed())
        ));
    }
    if item.pending {
        line.push_str(&format!(
            " {}",
            "(saving)".if_supports_color(Stdout, |t| t.magenta())
        ));
    }
    line
}

/// Format a single movie with all of its fields
pub fn format_movie_card(movie: &Movie) -> String {
    let mut out = format!(
        "{}{}\n",
        movie.title.if_supports_color(Stdout, |t| t.bold()),
        year_suffix(movie.year)
    );

    let label = |name: &str| format!("{name}:").if_supports_color(Stdout, |t| t.cyan()).to_string();

    out.push_str(&format!("  {} {}\n", label("id"), movie.id));
    out.push_str(&format!("  {} {}\n", label("status"), watched_badge(movie.watched)));
    if !movie.categories.is_empty() {
        out.push_str(&format!(
            "  {} {}\n",
            label("categories"),
            categories_label(&movie.categories)
        ));
    }
    if let Some(poster) = &movie.poster_url {
        out.push_str(&format!("  {} {poster}\n", label("poster")));
    }
    if let Some(notes) = &movie.notes {
        out.push_str(&format!("  {} {notes}\n", label("notes")));
    }

    out.trim_end().to_string()
}

/// Format a popular-listing item for single-line display with colors
pub fn format_catalog_line(entry: &CatalogEntry<'_>) -> String {
    let id = format!("{:>8}", entry.movie.id);
    let mut line = format!(
        "{} {}{} {}",
        id.if_supports_color(Stdout, |t| t.cyan()),
        entry.movie.title.if_supports_color(Stdout, |t| t.bold()),
        year_suffix(entry.year),
        rating_label(entry.movie.vote_average).if_supports_color(Stdout, |t| t.yellow()),
    );

    if !entry.genres.is_empty() {
        let genres = format!("- {}", categories_label(&entry.genres));
        line.push_str(&format!(" {}", genres.if_supports_color(Stdout, |t| t.dimmed())));
    }
    if entry.in_list {
        line.push_str(&format!(
            " {}",
            "[in list]".if_supports_color(Stdout, |t| t.green())
        ));
    }
    line
}

/// Format the full catalog page of one movie
pub fn format_movie_detail(view: &MovieDetailView) -> String {
    let detail = &view.detail;
    let mut out = format!(
        "{}{}\n",
        detail.title.if_supports_color(Stdout, |t| t.bold()),
        year_suffix(detail.year())
    );

    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("{}\n", tagline.if_supports_color(Stdout, |t| t.italic())));
    }

    let mut facts = Vec::new();
    if let Some(runtime) = &view.runtime {
        facts.push(runtime.clone());
    }
    if !detail.genres.is_empty() {
        let names: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
        facts.push(categories_label(&names));
    }
    facts.push(format!(
        "{} ({} votes)",
        rating_label(detail.vote_average),
        detail.vote_count
    ));
    out.push_str(&format!("{}\n", facts.join(" | ").if_supports_color(Stdout, |t| t.dimmed())));

    if view.in_list {
        out.push_str(&format!(
            "{}\n",
            "Already on your watchlist".if_supports_color(Stdout, |t| t.green())
        ));
    }

    if !detail.overview.is_empty() {
        out.push_str(&format!("\n{}\n", detail.overview));
    }

    if let Some(poster) = &detail.poster_path {
        out.push_str(&format!("\nPoster: {}\n", poster_url(poster)));
    }
    if !detail.production_companies.is_empty() {
        let names: Vec<&str> = detail
            .production_companies
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        out.push_str(&format!("Produced by: {}\n", categories_label(&names)));
    }
    let languages = detail.languages();
    if !languages.is_empty() {
        out.push_str(&format!("Languages: {}\n", categories_label(&languages)));
    }
    if let Some(status) = detail.status.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("Status: {status}\n"));
    }
    if let Some(budget) = usd_label(detail.budget) {
        out.push_str(&format!("Budget: {budget}\n"));
    }
    if let Some(revenue) = usd_label(detail.revenue) {
        out.push_str(&format!("Revenue: {revenue}\n"));
    }

    if !view.cast.is_empty() {
        out.push_str(&format!(
            "\n{}\n{}\n",
            "Cast".if_supports_color(Stdout, |t| t.cyan()),
            cast_table(&view.cast)
        ));
    } else if let Some(error) = &view.credits_error {
        out.push_str(&format!(
            "\n{}\n",
            format!("Cast unavailable: {error}").if_supports_color(Stdout, |t| t.dimmed())
        ));
    }

    out.trim_end().to_string()
}
