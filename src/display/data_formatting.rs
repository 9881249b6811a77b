use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::catalog::CastMember;
use crate::list::ListView;
use crate::types::MovieId;

/// Characters of an ID shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Leading characters of a movie ID, enough to pass back to commands that
/// accept a partial ID.
///
/// # Examples
///
/// ```
/// use watchlist::display::short_id;
/// use watchlist::MovieId;
///
/// let id = MovieId::from("3f2a9c1e-0b7d-4c55-9d51-2a5cbe0e8f7a");
/// assert_eq!(short_id(&id), "3f2a9c1e");
/// assert_eq!(short_id(&MovieId::from("abc")), "abc");
/// ```
pub fn short_id(id: &MovieId) -> &str {
    let s = id.as_str();
    match s.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Release year in parentheses, prefixed with a space, or nothing.
///
/// # Examples
///
/// ```
/// use watchlist::display::year_suffix;
///
/// assert_eq!(year_suffix(Some(2014)), " (2014)");
/// assert_eq!(year_suffix(None), "");
/// ```
pub fn year_suffix(year: Option<i32>) -> String {
    year.map(|y| format!(" ({y})")).unwrap_or_default()
}

pub fn categories_label<S: AsRef<str>>(categories: &[S]) -> String {
    categories
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Footer shown under a listing. `None` when everything fits on one page.
pub fn page_footer(view: &ListView<'_>) -> Option<String> {
    if !view.shows_pagination() {
        return None;
    }
    let noun = if view.total_matches == 1 { "movie" } else { "movies" };
    Some(format!(
        "Page {} of {} ({} {noun})",
        view.page, view.total_pages, view.total_matches
    ))
}

/// Message for a listing page with nothing on it.
pub fn empty_list_message(filter_active: bool, total_pages: usize, page: usize) -> String {
    if page > total_pages {
        format!("Page {page} is past the end (last page is {total_pages}).")
    } else if filter_active {
        "No movies match the current filters.".to_string()
    } else {
        "Your watchlist is empty. Add a movie with `watchlist add <title>`.".to_string()
    }
}

/// Average rating out of ten with one decimal.
pub fn rating_label(vote_average: f64) -> String {
    format!("{vote_average:.1}/10")
}

/// Whole US dollars with thousands separators. `None` for unknown (zero)
/// amounts.
///
/// ```
/// use watchlist::display::usd_label;
/// assert_eq!(usd_label(165_000_000).as_deref(), Some("$165,000,000"));
/// assert_eq!(usd_label(0), None);
/// ```
pub fn usd_label(amount: u64) -> Option<String> {
    if amount == 0 {
        return None;
    }
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    Some(format!("${grouped}"))
}

#[derive(Tabled)]
struct CastRow {
    #[tabled(rename = "Actor")]
    name: String,
    #[tabled(rename = "Character")]
    character: String,
}

/// Cast as a table. Empty input gives an empty string.
pub fn cast_table(cast: &[CastMember]) -> String {
    if cast.is_empty() {
        return String::new();
    }
    let rows = cast.iter().map(|member| CastRow {
        name: member.name.clone(),
        character: member.character.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}
