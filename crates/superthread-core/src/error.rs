//! Error types for superthread-mcp.

use thiserror::Error;

/// Failure of a call to the upstream REST API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The API answered with a non-2xx status.
    #[error("{status} {status_text} - {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("{0}")]
    Transport(String),
}

/// Main error type for superthread operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No personal access token available for an upstream call
    #[error(
        "Authorization token is required. Please provide a valid Superthread Personal Access Token."
    )]
    MissingToken,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream call failed
    #[error("API request failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// Tool arguments rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Search-backed lookup matched nothing
    #[error("{0}")]
    NoResults(String),

    /// Caller lacks the team role required for the operation
    #[error("{0}")]
    Permission(String),

    /// Upstream payload did not have the expected shape
    #[error("{0}")]
    InvalidResponse(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Build an upstream error from an HTTP status line and raw body.
    pub fn from_status(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Error::Upstream(UpstreamError::Status {
            status,
            status_text: status_text.into(),
            body: body.into(),
        })
    }

    /// Whether this error came from the upstream API rather than local checks.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream(_))
    }

    /// HTTP status of an upstream failure, if the API answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream(UpstreamError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for superthread operations.
pub type Result<T> = std::result::Result<T, Error>;
