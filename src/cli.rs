use clap::{Parser, Subcommand};

use crate::types::{MAX_SUGGESTED_YEAR, MIN_SUGGESTED_YEAR};

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Keep track of the movies you want to watch")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How a command prints its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List movies on the watchlist
    #[command(visible_alias = "l")]
    Ls {
        /// Only show titles containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Only show movies in any of these categories (repeatable; see `watchlist categories`)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Page to show (1-indexed)
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories to filter by, with how many movies use each
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a movie to the watchlist
    #[command(visible_alias = "a")]
    Add {
        /// Movie title
        title: String,

        /// Category (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Release year
        #[arg(short, long, value_parser = parse_year)]
        year: Option<i32>,

        /// Absolute URL of a poster image
        #[arg(long)]
        poster: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a movie's fields
    #[command(visible_alias = "e")]
    Edit {
        /// Movie ID (can be partial)
        #[arg(value_parser = parse_movie_id)]
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// Replace categories (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Remove all categories
        #[arg(long, conflicts_with = "categories")]
        clear_categories: bool,

        /// New release year
        #[arg(short, long, value_parser = parse_year)]
        year: Option<i32>,

        /// Remove the release year
        #[arg(long, conflicts_with = "year")]
        clear_year: bool,

        /// New poster URL (an empty value removes it)
        #[arg(long)]
        poster: Option<String>,

        /// New notes (an empty value removes them)
        #[arg(short, long)]
        notes: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a movie as watched
    #[command(visible_alias = "w")]
    Watched {
        /// Movie ID (can be partial)
        #[arg(value_parser = parse_movie_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a movie as not watched yet
    Unwatched {
        /// Movie ID (can be partial)
        #[arg(value_parser = parse_movie_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a movie from the watchlist
    Rm {
        /// Movie ID (can be partial)
        #[arg(value_parser = parse_movie_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse popular movies from the catalog
    #[command(visible_alias = "p")]
    Popular {
        /// Catalog page (clamped to the available range)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show catalog details for a movie
    #[command(visible_alias = "s")]
    Show {
        /// Catalog movie ID
        catalog_id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a catalog movie to the watchlist
    Adopt {
        /// Catalog movie ID
        catalog_id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (store.url, session.user_id, catalog.token, page_size, ...)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (store.url, session.user_id, catalog.token, page_size, ...)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            AddOptions, EditOptions, LsOptions, cmd_add, cmd_adopt, cmd_categories, cmd_config_get,
            cmd_config_set, cmd_config_show, cmd_edit, cmd_ls, cmd_popular, cmd_rm, cmd_set_watched,
            cmd_show,
        };

        match self {
            Commands::Ls {
                search,
                categories,
                page,
                json,
            } => {
                let options = LsOptions {
                    search,
                    categories,
                    page: page as usize,
                };
                cmd_ls(options, OutputOptions::new(json)).await
            }

            Commands::Categories { json } => cmd_categories(OutputOptions::new(json)).await,

            Commands::Add {
                title,
                categories,
                year,
                poster,
                notes,
                json,
            } => {
                let options = AddOptions {
                    title,
                    categories,
                    year,
                    poster_url: poster,
                    notes,
                };
                cmd_add(options, OutputOptions::new(json)).await
            }

            Commands::Edit {
                id,
                title,
                categories,
                clear_categories,
                year,
                clear_year,
                poster,
                notes,
                json,
            } => {
                let categories = if clear_categories {
                    Some(Vec::new())
                } else if categories.is_empty() {
                    None
                } else {
                    Some(categories)
                };
                let year = if clear_year { Some(None) } else { year.map(Some) };
                let options = EditOptions {
                    title,
                    categories,
                    year,
                    poster_url: poster,
                    notes,
                };
                cmd_edit(&id, options, OutputOptions::new(json)).await
            }

            Commands::Watched { id, json } => {
                cmd_set_watched(&id, true, OutputOptions::new(json)).await
            }
            Commands::Unwatched { id, json } => {
                cmd_set_watched(&id, false, OutputOptions::new(json)).await
            }
            Commands::Rm { id, json } => cmd_rm(&id, OutputOptions::new(json)).await,

            Commands::Popular { page, json } => cmd_popular(page, OutputOptions::new(json)).await,
            Commands::Show { catalog_id, json } => {
                cmd_show(catalog_id, OutputOptions::new(json)).await
            }
            Commands::Adopt { catalog_id, json } => {
                cmd_adopt(catalog_id, OutputOptions::new(json)).await
            }

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions::new(json)),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions::new(json))
                }
                ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions::new(json)),
            },
        }
    }
}

fn parse_movie_id(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("ID cannot be empty".to_string());
    }
    if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(format!(
            "Invalid ID '{s}'. IDs contain only letters, digits and hyphens"
        ));
    }
    Ok(s.to_string())
}

fn parse_year(s: &str) -> Result<i32, String> {
    let year: i32 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid year '{s}'. Must be a number"))?;
    if !(MIN_SUGGESTED_YEAR..=MAX_SUGGESTED_YEAR).contains(&year) {
        return Err(format!(
            "Year {year} out of range. Must be between {MIN_SUGGESTED_YEAR} and {MAX_SUGGESTED_YEAR}"
        ));
    }
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_year_bounds() {
        assert_eq!(parse_year("1888").unwrap(), 1888);
        assert_eq!(parse_year(" 2030 ").unwrap(), 2030);
        assert!(parse_year("1887").is_err());
        assert!(parse_year("2031").is_err());
        assert!(parse_year("soon").is_err());
    }

    #[test]
    fn test_parse_year_error_lists_range() {
        let err = parse_year("1700").unwrap_err();
        assert!(err.contains("1888") && err.contains("2030"), "got: {err}");
    }

    #[test]
    fn test_parse_movie_id() {
        assert_eq!(
            parse_movie_id("3f2a9c1e-0b7d").unwrap(),
            "3f2a9c1e-0b7d".to_string()
        );
        assert!(parse_movie_id("").is_err());
        assert!(parse_movie_id("   ").is_err());
        assert!(parse_movie_id("abc/../x").is_err());
    }

    #[test]
    fn test_ls_flags() {
        let cli = Cli::try_parse_from([
            "watchlist", "ls", "-s", "dune", "-c", "Drama", "-c", "Action", "--page", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Ls {
                search,
                categories,
                page,
                json,
            } => {
                assert_eq!(search.as_deref(), Some("dune"));
                assert_eq!(categories, vec!["Drama", "Action"]);
                assert_eq!(page, 2);
                assert!(!json);
            }
            _ => panic!("expected ls"),
        }
    }

    #[test]
    fn test_ls_rejects_page_zero() {
        assert!(Cli::try_parse_from(["watchlist", "ls", "--page", "0"]).is_err());
    }

    #[test]
    fn test_edit_clear_flags_conflict_with_values() {
        assert!(
            Cli::try_parse_from(["watchlist", "edit", "abc", "--year", "2000", "--clear-year"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "watchlist",
                "edit",
                "abc",
                "-c",
                "Drama",
                "--clear-categories"
            ])
            .is_err()
        );
    }
}
