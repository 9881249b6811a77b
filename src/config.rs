//! Application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or `$WATCHLIST_CONFIG_DIR`) and includes:
//! - Movie store location and project key
//! - The signed-in session (user id and access token)
//! - Metadata API credentials and endpoints
//! - Page size and network timeout
//!
//! Credentials can also be supplied through environment variables, which take
//! precedence over the file.

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchlistError};
use crate::types::DEFAULT_PAGE_SIZE;

pub const CONFIG_DIR_ENV: &str = "WATCHLIST_CONFIG_DIR";
pub const STORE_URL_ENV: &str = "WATCHLIST_STORE_URL";
pub const ANON_KEY_ENV: &str = "WATCHLIST_ANON_KEY";
pub const USER_ID_ENV: &str = "WATCHLIST_USER_ID";
pub const ACCESS_TOKEN_ENV: &str = "WATCHLIST_ACCESS_TOKEN";
pub const TMDB_TOKEN_ENV: &str = "TMDB_TOKEN";

pub const DEFAULT_CATALOG_API_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_CATALOG_LANGUAGE: &str = "en-US";

/// Keys accepted by `config get` / `config set`.
pub const VALID_KEYS: &[&str] = &[
    "store.url",
    "store.anon_key",
    "session.user_id",
    "session.access_token",
    "catalog.api_url",
    "catalog.token",
    "catalog.popular_url",
    "catalog.language",
    "page_size",
    "remote_timeout",
];

/// Keys whose values are masked when displayed.
pub const SENSITIVE_KEYS: &[&str] = &["store.anon_key", "session.access_token", "catalog.token"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Movies per page of the watchlist (default: 6)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Remote operation timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_remote_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            session: SessionConfig::default(),
            catalog: CatalogConfig::default(),
            page_size: default_page_size(),
            remote_timeout: default_remote_timeout(),
        }
    }
}

/// Hosted movie table
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Signed-in session
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("user_id", &self.user_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Movie metadata API
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Relay endpoint serving the popular listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popular_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("popular_url", &self.popular_url)
            .field("language", &self.language)
            .finish()
    }
}

/// Read a non-empty environment variable.
fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Directory holding the config file
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = env_value(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        directories::ProjectDirs::from("com", "watchlist", "watchlist")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                WatchlistError::Config(format!(
                    "could not determine a config directory; set {CONFIG_DIR_ENV}"
                ))
            })
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            WatchlistError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.check()?;
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;

        // Owner read/write only; the file holds tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(WatchlistError::Config(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Store URL from environment or config file
    pub fn store_url(&self) -> Option<String> {
        env_value(STORE_URL_ENV).or_else(|| self.store.url.clone())
    }

    /// Store project key from environment or config file
    pub fn anon_key(&self) -> Option<String> {
        env_value(ANON_KEY_ENV).or_else(|| self.store.anon_key.clone())
    }

    /// Signed-in user from environment or config file
    pub fn user_id(&self) -> Option<String> {
        env_value(USER_ID_ENV).or_else(|| self.session.user_id.clone())
    }

    /// Session token from environment or config file
    pub fn access_token(&self) -> Option<String> {
        env_value(ACCESS_TOKEN_ENV).or_else(|| self.session.access_token.clone())
    }

    /// Metadata API token from environment or config file
    pub fn catalog_token(&self) -> Option<String> {
        env_value(TMDB_TOKEN_ENV).or_else(|| self.catalog.token.clone())
    }

    pub fn catalog_api_url(&self) -> String {
        self.catalog
            .api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CATALOG_API_URL.to_string())
    }

    pub fn catalog_popular_url(&self) -> Option<String> {
        self.catalog.popular_url.clone()
    }

    pub fn catalog_language(&self) -> String {
        self.catalog
            .language
            .clone()
            .unwrap_or_else(|| DEFAULT_CATALOG_LANGUAGE.to_string())
    }

    /// Read a value by dotted key. Returns the file value, not env overrides.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "store.url" => self.store.url.clone(),
            "store.anon_key" => self.store.anon_key.clone(),
            "session.user_id" => self.session.user_id.clone(),
            "session.access_token" => self.session.access_token.clone(),
            "catalog.api_url" => self.catalog.api_url.clone(),
            "catalog.token" => self.catalog.token.clone(),
            "catalog.popular_url" => self.catalog.popular_url.clone(),
            "catalog.language" => self.catalog.language.clone(),
            "page_size" => Some(self.page_size.to_string()),
            "remote_timeout" => Some(self.remote_timeout.to_string()),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Set a value by dotted key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let text = Some(value.to_string());
        match key {
            "store.url" => self.store.url = Some(check_url(key, value)?),
            "store.anon_key" => self.store.anon_key = text,
            "session.user_id" => self.session.user_id = text,
            "session.access_token" => self.session.access_token = text,
            "catalog.api_url" => self.catalog.api_url = Some(check_url(key, value)?),
            "catalog.token" => self.catalog.token = text,
            "catalog.popular_url" => self.catalog.popular_url = Some(check_url(key, value)?),
            "catalog.language" => self.catalog.language = text,
            "page_size" => {
                let size: usize = value.parse().map_err(|_| {
                    WatchlistError::Config(format!("page_size must be a number, got '{value}'"))
                })?;
                if size == 0 {
                    return Err(WatchlistError::Config(
                        "page_size must be greater than zero".to_string(),
                    ));
                }
                self.page_size = size;
            }
            "remote_timeout" => {
                self.remote_timeout = value.parse().map_err(|_| {
                    WatchlistError::Config(format!(
                        "remote_timeout must be a number of seconds, got '{value}'"
                    ))
                })?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> WatchlistError {
    WatchlistError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}

fn check_url(key: &str, value: &str) -> Result<String> {
    url::Url::parse(value)
        .map_err(|e| WatchlistError::Config(format!("{key} must be an absolute URL: {e}")))?;
    Ok(value.trim_end_matches('/').to_string())
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
