//! Shared HTTP plumbing for catalog clients.

use serde::de::DeserializeOwned;
use std::time::Duration;

use super::domain::CatalogError;

/// Request timeout for catalog searches
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Build the HTTP client used by every catalog backend.
///
/// The client is configured to:
/// - Accept gzip-compressed responses (reduces bandwidth)
/// - Send User-Agent header identifying the application
/// - Give up on slow catalogs instead of stalling pool building
pub(crate) fn http_client() -> Result<reqwest::Client, CatalogError> {
    reqwest::Client::builder()
        .gzip(true)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| CatalogError::Network(e.to_string()))
}

/// Map a transport failure.
pub(crate) fn network_error(e: reqwest::Error) -> CatalogError {
    CatalogError::Network(e.to_string())
}

/// Check the status and decode a JSON body.
///
/// 429 becomes `RateLimited`; other failures keep the first 200 characters
/// of the body for diagnostics.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CatalogError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(CatalogError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Http {
            status: status.as_u16(),
            message: format!(
                "{} - {}",
                status.canonical_reason().unwrap_or("Unknown"),
                body.chars().take(200).collect::<String>()
            ),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CatalogError::Parse(e.to_string()))
}
