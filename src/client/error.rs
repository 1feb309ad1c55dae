//! Error types for the remote-config client.

use reqwest::StatusCode;

use crate::config::loader::join_errors;
use crate::config::ValidationError;

/// Failure while fetching one namespace.
///
/// Any of these aborts the remaining fetches of the current refresh cycle.
/// None of them ever reaches the request path.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Server answered 404 or 500 for the namespace.
    #[error("config server returned {status} for namespace {namespace:?}")]
    ConfigFetchFailure { namespace: String, status: StatusCode },

    /// Server answered 200 but the body is not a JSON object.
    #[error("malformed config document for namespace {namespace:?}: {source}")]
    MalformedResponse {
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    /// Connection, timeout or body read failure.
    #[error("request for namespace {namespace:?} failed: {source}")]
    Transport {
        namespace: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn namespace(&self) -> &str {
        match self {
            FetchError::ConfigFetchFailure { namespace, .. }
            | FetchError::MalformedResponse { namespace, .. }
            | FetchError::Transport { namespace, .. } => namespace,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::ConfigFetchFailure { .. } => "fetch_failure",
            FetchError::MalformedResponse { .. } => "malformed",
            FetchError::Transport { .. } => "transport",
        }
    }
}

/// Failure while constructing a client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid client configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
