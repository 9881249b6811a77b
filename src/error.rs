use std::fmt;

use thiserror::Error;

use crate::types::MovieId;

/// Coarse classification of a failure, used by the presentation layer to
/// decide between inline text, a retry action, or a plain error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected locally before any network call.
    Validation,
    /// Transport failure or a non-success response from a remote service.
    Network,
    /// The store refused the request (including missing rows).
    Rejected,
    /// Local setup problem: configuration, credentials, filesystem.
    Setup,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Network => write!(f, "network"),
            FailureKind::Rejected => write!(f, "rejected"),
            FailureKind::Setup => write!(f, "setup"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("movie '{0}' not found")]
    NotFound(MovieId),

    #[error("ambiguous ID '{0}' matches multiple movies")]
    AmbiguousId(String),

    #[error("store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("metadata API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl WatchlistError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WatchlistError::Validation(_) | WatchlistError::AmbiguousId(_) => {
                FailureKind::Validation
            }
            WatchlistError::NotFound(_) | WatchlistError::Rejected { .. } => FailureKind::Rejected,
            WatchlistError::Network(_) | WatchlistError::Api(_) | WatchlistError::Http(_) => {
                FailureKind::Network
            }
            WatchlistError::Config(_)
            | WatchlistError::Auth(_)
            | WatchlistError::Io(_)
            | WatchlistError::YamlParse(_)
            | WatchlistError::Json(_)
            | WatchlistError::Url(_) => FailureKind::Setup,
        }
    }

    /// Whether a manual retry of the same action could succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == FailureKind::Network
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WatchlistError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, WatchlistError>;
