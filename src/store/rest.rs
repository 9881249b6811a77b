//! Hosted movie table, reached over its PostgREST-style HTTP interface.
//!
//! Every request carries the project's public `apikey` header and the user's
//! session token as a bearer credential; row-level security on the table
//! limits each session to its own rows. Both secrets are wrapped in
//! [`SecretBox`] and never appear in `Debug` output.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use secrecy::{ExposeSecret, SecretBox};
use url::Url;

use crate::config::Config;
use crate::error::{Result, WatchlistError};
use crate::types::MovieId;

use super::{MOVIES_TABLE, MovieChanges, MovieRow, MovieStore, NewMovieRow, UserScope};

pub struct RestStore {
    client: Client,
    base_url: Url,
    anon_key: SecretBox<String>,
    access_token: SecretBox<String>,
}

impl fmt::Debug for RestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl RestStore {
    /// Create a store client from configuration.
    ///
    /// Requires the store URL, the project key and a session token.
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.store_url().ok_or_else(|| {
            WatchlistError::Config(
                "store URL not configured. Set WATCHLIST_STORE_URL or run: watchlist config set store.url <url>".to_string(),
            )
        })?;
        let anon_key = config.anon_key().ok_or_else(|| {
            WatchlistError::Config(
                "store key not configured. Set WATCHLIST_ANON_KEY or run: watchlist config set store.anon_key <key>".to_string(),
            )
        })?;
        let token = config.access_token().ok_or_else(|| {
            WatchlistError::Auth(
                "not signed in. Set WATCHLIST_ACCESS_TOKEN or run: watchlist config set session.access_token <token>".to_string(),
            )
        })?;

        Self::new(&url, &anon_key, &token, Duration::from_secs(config.remote_timeout))
    }

    pub fn new(base_url: &str, anon_key: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            anon_key: SecretBox::new(Box::new(anon_key.to_string())),
            access_token: SecretBox::new(Box::new(access_token.to_string())),
        })
    }

    fn table_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&format!("rest/v1/{MOVIES_TABLE}"))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(self.access_token.expose_secret())
            .header(header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| WatchlistError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_to_error(status, &body))
    }

    async fn rows(&self, response: Response) -> Result<Vec<MovieRow>> {
        response
            .json::<Vec<MovieRow>>()
            .await
            .map_err(|e| WatchlistError::Network(format!("malformed store response: {e}")))
    }
}

impl MovieStore for RestStore {
    async fn list_all(&self, scope: &UserScope) -> Result<Vec<MovieRow>> {
        let url = self.table_url()?;
        let request = self.client.get(url).query(&[
            ("select", "*".to_string()),
            ("user_id", format!("eq.{}", scope.user_id)),
            ("order", "created_at.desc".to_string()),
        ]);

        let rows = self.rows(self.send(request).await?).await?;
        tracing::debug!(count = rows.len(), "listed movies");
        Ok(rows)
    }

    async fn insert(&self, _scope: &UserScope, row: NewMovieRow) -> Result<MovieRow> {
        let url = self.table_url()?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(&row);

        self.rows(self.send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WatchlistError::Rejected {
                status: StatusCode::CREATED.as_u16(),
                message: "insert returned no row".to_string(),
            })
    }

    async fn update(&self, id: &MovieId, changes: MovieChanges) -> Result<MovieRow> {
        let url = self.table_url()?;
        let request = self
            .client
            .patch(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&changes);

        // An empty representation means no visible row matched the filter.
        self.rows(self.send(request).await?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WatchlistError::NotFound(id.clone()))
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        let url = self.table_url()?;
        let request = self
            .client
            .delete(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");

        let deleted = self.rows(self.send(request).await?).await?;
        if deleted.is_empty() {
            return Err(WatchlistError::NotFound(id.clone()));
        }
        Ok(())
    }
}

/// Make sure relative joins land under the configured path.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Server errors are transient and reported as network failures; anything
/// else is a rejection by the store.
fn status_to_error(status: StatusCode, body: &str) -> WatchlistError {
    let message = store_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    if status.is_server_error() {
        WatchlistError::Network(format!("store unavailable (HTTP {}): {message}", status.as_u16()))
    } else {
        WatchlistError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Extract the `message` field of a store error body, if it has one.
fn store_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("https://abc.example.co").unwrap();
        assert_eq!(url.as_str(), "https://abc.example.co/");
        let url = parse_base_url("https://proxy.example.com/db").unwrap();
        assert_eq!(
            url.join("rest/v1/movies").unwrap().as_str(),
            "https://proxy.example.com/db/rest/v1/movies"
        );
    }

    #[test]
    fn test_status_mapping() {
        let err = status_to_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.kind(), FailureKind::Network);

        let err = status_to_error(
            StatusCode::BAD_REQUEST,
            r#"{"code":"22P02","message":"invalid input syntax for type uuid"}"#,
        );
        assert_eq!(err.kind(), FailureKind::Rejected);
        assert!(err.to_string().contains("invalid input syntax"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let store = RestStore::new(
            "https://abc.example.co",
            "anon-secret",
            "token-secret",
            Duration::from_secs(5),
        )
        .unwrap();
        let debug = format!("{store:?}");
        assert!(!debug.contains("anon-secret"));
        assert!(!debug.contains("token-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
