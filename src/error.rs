// Error types for ghsearch.
// Handles GitHub API errors, credential errors, cache errors, and the
// caller-facing error taxonomy reported in search outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Literal reported for failures that fit no other category.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Authentication failed: no GitHub token found (set GITHUB_TOKEN or run `gh auth login`)")]
    MissingToken,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("GitHub rejected the search: {0}")]
    Remote(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Category of a failure as seen by a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Credentials are missing or were rejected; the user must re-authenticate.
    Authentication,
    /// The search backend errored or returned something unusable.
    Search,
    /// A required parameter is missing or invalid.
    Configuration,
    Unknown,
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Unauthorized | SearchError::MissingToken | SearchError::Auth(_) => {
                ErrorKind::Authentication
            }
            SearchError::Api(_)
            | SearchError::NotFound(_)
            | SearchError::RateLimited { .. }
            | SearchError::Remote(_)
            | SearchError::Json(_) => ErrorKind::Search,
            SearchError::Config(_) => ErrorKind::Configuration,
            SearchError::Io(_) | SearchError::Other(_) => ErrorKind::Unknown,
        }
    }

    /// Message placed in an outcome's `error` field.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unknown => UNKNOWN_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
