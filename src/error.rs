//! Error types for the TeamSync client
//!
//! Errors are layered:
//! - `ApiError`: what the HTTP client saw (transport, status code, decode)
//! - `FetchError` / `MutationError`: what a page sees. Opaque beyond "failed",
//!   the underlying cause is kept only for logs.
//! - `ConfigError`: config file and base URL problems at startup

use std::path::PathBuf;

use thiserror::Error;

/// Errors from a single call against the TeamSync API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if repeating the same call could succeed.
    ///
    /// Nothing in the client retries on its own; this only feeds logs and
    /// the recovery hint.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => false,
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Check that the TeamSync API is reachable and try again.",
            ApiError::Http { status, .. } if *status >= 500 => {
                "The TeamSync API failed. Try again shortly."
            }
            ApiError::Http { .. } => "The request was rejected. Check the values you sent.",
            ApiError::Decode(_) => "The API returned an unexpected payload. Check the API version.",
            ApiError::InvalidUrl(_) => "Check apiUrl in ~/.teamsync/config.json or TEAMSYNC_API_URL.",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ApiError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// A failed query read. Pages render a static message for any of these.
#[derive(Debug, Clone, Error)]
#[error("fetch failed: {cause}")]
pub struct FetchError {
    cause: String,
}

impl FetchError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        log::warn!("fetch failed ({}): {}", err.recovery_suggestion(), err);
        FetchError::new(err.to_string())
    }
}

/// A failed PUT/POST. Success side effects are skipped when this is returned.
#[derive(Debug, Clone, Error)]
#[error("mutation failed: {cause}")]
pub struct MutationError {
    cause: String,
}

impl MutationError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl From<ApiError> for MutationError {
    fn from(err: ApiError) -> Self {
        log::warn!("mutation failed ({}): {}", err.recovery_suggestion(), err);
        MutationError::new(err.to_string())
    }
}

/// Errors while resolving the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL '{url}': {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] ApiError),
}
