//! Catalog error types.
//!
//! Provider clients convert every transport, HTTP and payload problem into
//! a [`CatalogError`]. Callers building a pool normally never see these:
//! [`super::CatalogProvider::search`] logs them and returns no tracks.

/// Errors that can occur while querying a music catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Missing credentials for {0}")]
    MissingCredentials(&'static str),

    #[error("Source blocked: {0}")]
    Blocked(String),

    #[error("Rate limited - try again later")]
    RateLimited,
}

impl CatalogError {
    /// Whether retrying the same source later might help.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Network(_) | CatalogError::RateLimited => true,
            CatalogError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
