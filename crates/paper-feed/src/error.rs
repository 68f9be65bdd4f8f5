//! Error types for the paper feed.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! [`ClientError`] covers the arXiv HTTP layer; [`FeedError`] covers a whole run.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from the search client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error, including retry exhaustion
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the search service (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Invalid query (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from the service
        message: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Atom feed could not be parsed
    #[error("Malformed feed: {0}")]
    Feed(String),

    /// A page came back empty before the reported total was reached, on every attempt
    #[error("Empty page at offset {start} of {total} results after {attempts} attempts")]
    IncompletePage {
        /// Offset of the empty page
        start: usize,
        /// `totalResults` reported by the service
        total: usize,
        /// Requests made for this page
        attempts: u32,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create a malformed feed error.
    #[must_use]
    pub fn feed(message: impl Into<String>) -> Self {
        Self::Feed(message.into())
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for ClientError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Feed(err.to_string())
    }
}

/// Errors that abort a feed run.
#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    /// Roster could not be fetched or contained no names
    #[error("Roster unavailable: {0}")]
    RosterUnavailable(String),

    /// Roster content does not match the expected schema (a JSON array of names)
    #[error("Roster malformed: {0}")]
    RosterMalformed(String),

    /// A query against the search service failed after retries
    #[error("Search failed for {query}: {source}")]
    SearchServiceFailure {
        /// Query expression that failed
        query: String,
        /// Underlying client error
        #[source]
        source: ClientError,
    },

    /// Page template is missing or has inconsistent slot markers
    #[error("Template error: {0}")]
    Template(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    /// Create a roster unavailable error.
    #[must_use]
    pub fn roster_unavailable(message: impl Into<String>) -> Self {
        Self::RosterUnavailable(message.into())
    }

    /// Create a roster malformed error.
    #[must_use]
    pub fn roster_malformed(message: impl Into<String>) -> Self {
        Self::RosterMalformed(message.into())
    }

    /// Create a search failure for the given query expression.
    #[must_use]
    pub fn search(query: impl Into<String>, source: ClientError) -> Self {
        Self::SearchServiceFailure { query: query.into(), source }
    }

    /// Create a template error.
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template(message.into())
    }

    /// Create an I/O error bound to a path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Returns true if this error came from the roster source.
    #[must_use]
    pub const fn is_roster_error(&self) -> bool {
        matches!(self, Self::RosterUnavailable(_) | Self::RosterMalformed(_))
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
