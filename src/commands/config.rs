//! Configuration commands.
//!
//! - `config show`: display current configuration
//! - `config get`: read one value
//! - `config set`: change one value

use owo_colors::{OwoColorize, Stream::Stdout};
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{Config, SENSITIVE_KEYS, VALID_KEYS, mask_sensitive_value};
use crate::error::{Result, WatchlistError};

/// Suggest dot notation for keys written with underscores (e.g. `store_url`).
fn validate_config_key(key: &str) -> Result<&str> {
    if VALID_KEYS.contains(&key) {
        return Ok(key);
    }

    if let Some(pos) = key.find('_') {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        if VALID_KEYS.contains(&dot_version.as_str()) {
            return Err(WatchlistError::Config(format!(
                "invalid config key '{key}'. Use dot notation: '{dot_version}'"
            )));
        }
    }
    Ok(key)
}

fn display_value(key: &str, value: &str) -> String {
    if SENSITIVE_KEYS.contains(&key) {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    }
}

fn status_label(configured: bool) -> String {
    if configured {
        "configured"
            .if_supports_color(Stdout, |t| t.green())
            .to_string()
    } else {
        "not configured"
            .if_supports_color(Stdout, |t| t.dimmed())
            .to_string()
    }
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path()?;

    let json_output = json!({
        "store": {
            "url": config.store_url(),
            "anon_key_configured": config.anon_key().is_some(),
        },
        "session": {
            "user_id": config.user_id(),
            "access_token_configured": config.access_token().is_some(),
        },
        "catalog": {
            "api_url": config.catalog_api_url(),
            "token_configured": config.catalog_token().is_some(),
            "popular_url": config.catalog_popular_url(),
            "language": config.catalog_language(),
        },
        "page_size": config.page_size,
        "remote_timeout": config.remote_timeout,
        "config_file": path.to_string_lossy(),
    });

    let heading = |name: &str| name.if_supports_color(Stdout, |t| t.cyan()).to_string();
    let or_unset = |value: Option<String>| {
        value.unwrap_or_else(|| {
            "not configured"
                .if_supports_color(Stdout, |t| t.dimmed())
                .to_string()
        })
    };

    let mut text = format!(
        "{}\n\n",
        "Configuration:".if_supports_color(Stdout, |t| t.bold())
    );

    text.push_str(&format!("{}:\n", heading("store")));
    text.push_str(&format!("  url: {}\n", or_unset(config.store_url())));
    text.push_str(&format!(
        "  anon_key: {}\n\n",
        status_label(config.anon_key().is_some())
    ));

    text.push_str(&format!("{}:\n", heading("session")));
    text.push_str(&format!("  user_id: {}\n", or_unset(config.user_id())));
    text.push_str(&format!(
        "  access_token: {}\n\n",
        status_label(config.access_token().is_some())
    ));

    text.push_str(&format!("{}:\n", heading("catalog")));
    text.push_str(&format!("  api_url: {}\n", config.catalog_api_url()));
    text.push_str(&format!(
        "  token: {}\n",
        status_label(config.catalog_token().is_some())
    ));
    text.push_str(&format!(
        "  popular_url: {}\n",
        or_unset(config.catalog_popular_url())
    ));
    text.push_str(&format!("  language: {}\n\n", config.catalog_language()));

    text.push_str(&format!("{}: {}\n", heading("page_size"), config.page_size));
    text.push_str(&format!(
        "{}: {}s\n\n",
        heading("remote_timeout"),
        config.remote_timeout
    ));
    text.push_str(&format!(
        "{}",
        format!("Config file: {}", path.display()).if_supports_color(Stdout, |t| t.dimmed())
    ));

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let key = validate_config_key(key)?;
    let config = Config::load()?;

    let value = config.get(key)?;
    let shown = value.as_deref().map(|v| display_value(key, v));

    let text = shown.clone().unwrap_or_else(|| "not set".to_string());
    CommandOutput::new(json!({
        "key": key,
        "value": shown,
    }))
    .with_text(text)
    .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let key = validate_config_key(key)?;
    let mut config = Config::load()?;

    config.set(key, value)?;
    config.save()?;
    tracing::debug!(key, "config value saved");

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": display_value(key, value),
        "success": true,
    }))
    .with_text(format!(
        "Set {} = {}",
        key.if_supports_color(Stdout, |t| t.cyan()),
        display_value(key, value)
    ))
    .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_key_suggests_dot_notation() {
        let err = validate_config_key("store_url").unwrap_err();
        assert!(err.to_string().contains("'store.url'"));
        assert_eq!(validate_config_key("page_size").unwrap(), "page_size");
        assert_eq!(validate_config_key("catalog.token").unwrap(), "catalog.token");
    }

    #[test]
    fn test_unknown_keys_pass_through_to_config() {
        // Reported by Config::get/set with the list of valid keys
        assert_eq!(validate_config_key("bogus").unwrap(), "bogus");
    }

    #[test]
    fn test_display_value_masks_secrets() {
        assert_eq!(display_value("catalog.token", "abcdef123456"), "ab...56");
        assert_eq!(display_value("store.url", "https://x.example"), "https://x.example");
    }
}
