//! Command handlers behind the CLI.

mod add;
mod catalog;
mod categories;
mod config;
mod edit;
mod ls;
mod rm;
mod watched;

pub use add::{AddOptions, cmd_add};
pub use catalog::{cmd_adopt, cmd_popular, cmd_show};
pub use categories::cmd_categories;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use edit::{EditOptions, cmd_edit};
pub use ls::{LsOptions, cmd_ls};
pub use rm::cmd_rm;
pub use watched::cmd_set_watched;

use serde_json::Value;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::{Result, WatchlistError};
use crate::list::ListController;
use crate::mutation::MutationCoordinator;
use crate::store::{RestStore, UserScope};

/// Result of a command, printed either as JSON or as text.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print to stdout. Without a text form, the JSON is printed either way.
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => println!("{text}"),
            _ => println!("{}", serde_json::to_string_pretty(&self.json)?),
        }
        Ok(())
    }
}

/// A signed-in user's watchlist, loaded from the hosted store.
pub struct Session {
    pub config: Config,
    pub coordinator: MutationCoordinator<RestStore>,
    pub list: ListController,
}

impl Session {
    /// Load configuration, connect to the store and read the canonical list.
    pub async fn open() -> Result<Self> {
        let config = Config::load()?;
        let store = RestStore::from_config(&config)?;
        let user_id = config.user_id().ok_or_else(|| {
            WatchlistError::Auth(
                "not signed in. Set WATCHLIST_USER_ID or run: watchlist config set session.user_id <id>"
                    .to_string(),
            )
        })?;

        let coordinator = MutationCoordinator::new(store, UserScope::new(user_id));
        let mut list = ListController::with_page_size(config.page_size)?;
        coordinator.load(&mut list).await?;

        Ok(Self {
            config,
            coordinator,
            list,
        })
    }
}
