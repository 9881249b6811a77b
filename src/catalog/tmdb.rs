//! HTTP client for the movie metadata API.
//!
//! Details and credits are fetched directly with the API read token. The
//! popular listing goes through a relay endpoint that holds the API token
//! itself and authenticates callers by their store session token.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretBox};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{Config, TMDB_TOKEN_ENV};
use crate::error::{Result, WatchlistError};

use super::{Credits, MetadataApi, MovieDetail, PopularPage};

pub struct TmdbClient {
    client: Client,
    api_url: Url,
    language: String,
    token: Option<SecretBox<String>>,
    relay_url: Option<Url>,
    session_token: Option<SecretBox<String>>,
}

impl fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TmdbClient")
            .field("api_url", &self.api_url.as_str())
            .field("language", &self.language)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("relay_url", &self.relay_url.as_ref().map(Url::as_str))
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl TmdbClient {
    /// Create a client from configuration.
    ///
    /// Credentials are optional here; a call that needs a missing one fails
    /// with an authentication or configuration error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::new(
            &config.catalog_api_url(),
            Duration::from_secs(config.remote_timeout),
        )?
        .with_language(config.catalog_language());

        if let Some(token) = config.catalog_token() {
            client = client.with_token(&token);
        }
        if let Some(relay) = config.catalog_popular_url() {
            client = client.with_popular_relay(&relay, config.access_token().as_deref())?;
        }
        Ok(client)
    }

    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: with_trailing_slash(api_url)?,
            language: crate::config::DEFAULT_CATALOG_LANGUAGE.to_string(),
            token: None,
            relay_url: None,
            session_token: None,
        })
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(SecretBox::new(Box::new(token.to_string())));
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Route the popular listing through `relay_url`, authenticated with the
    /// store session token.
    pub fn with_popular_relay(mut self, relay_url: &str, session_token: Option<&str>) -> Result<Self> {
        self.relay_url = Some(Url::parse(relay_url)?);
        self.session_token = session_token.map(|t| SecretBox::new(Box::new(t.to_string())));
        Ok(self)
    }

    fn api_token(&self) -> Result<&str> {
        self.token
            .as_ref()
            .map(|t| t.expose_secret().as_str())
            .ok_or_else(|| {
                WatchlistError::Auth(format!(
                    "metadata API token not configured. Set {TMDB_TOKEN_ENV} or run: watchlist config set catalog.token <token>"
                ))
            })
    }

    fn movie_url(&self, id: u64, suffix: &str) -> Result<Url> {
        let mut url = self.api_url.join(&format!("movie/{id}{suffix}"))?;
        url.query_pairs_mut().append_pair("language", &self.language);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, what: &str, request: RequestBuilder) -> Result<T> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| WatchlistError::Network(format!("{what}: {e}")))?;

        decode(what, response).await
    }
}

async fn decode<T: DeserializeOwned>(what: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%status, body = %body, "metadata request failed");
        return Err(WatchlistError::Api(format!("{what} returned HTTP {status}")));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| WatchlistError::Api(format!("malformed {what} response: {e}")))
}

fn with_trailing_slash(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}

impl MetadataApi for TmdbClient {
    async fn popular(&self, page: u32) -> Result<PopularPage> {
        let relay = self.relay_url.as_ref().ok_or_else(|| {
            WatchlistError::Config(
                "popular listing endpoint not configured. Run: watchlist config set catalog.popular_url <url>"
                    .to_string(),
            )
        })?;
        let session = self.session_token.as_ref().ok_or_else(|| {
            WatchlistError::Auth("not signed in; the popular listing needs a session token".to_string())
        })?;

        tracing::debug!(page, "fetching popular listing");
        let request = self
            .client
            .post(relay.clone())
            .query(&[("page", page)])
            .bearer_auth(session.expose_secret());
        self.fetch("popular listing", request).await
    }

    async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let url = self.movie_url(id, "")?;
        tracing::debug!(id, "fetching movie detail");
        let request = self.client.get(url).bearer_auth(self.api_token()?);
        self.fetch("movie detail", request).await
    }

    async fn movie_credits(&self, id: u64) -> Result<Credits> {
        let url = self.movie_url(id, "/credits")?;
        tracing::debug!(id, "fetching movie credits");
        let request = self.client.get(url).bearer_auth(self.api_token()?);
        self.fetch("movie credits", request).await
    }
}
