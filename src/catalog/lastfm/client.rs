//! Last.fm HTTP client

use std::fmt;

use async_trait::async_trait;

use super::{adapter, dto};
use crate::catalog::domain::CatalogError;
use crate::catalog::http::{http_client, network_error};
use crate::catalog::{CatalogProvider, ProviderKind};
use crate::model::RawTrack;

const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Error codes: invalid key, suspended key, rate limit
const ERROR_INVALID_KEY: u32 = 10;
const ERROR_SUSPENDED_KEY: u32 = 26;
const ERROR_RATE_LIMIT: u32 = 29;

/// Last.fm API client
pub struct LastFmClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for LastFmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastFmClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LastFmClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against another base URL (test server)
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            api_key: api_key.into(),
            http_client: http_client()?,
            base_url: base_url.into(),
        })
    }

    /// Search tracks by name
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RawTrack>, CatalogError> {
        let limit = limit.max(1).to_string();
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("method", "track.search"),
                ("track", query),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }

        // Errors arrive as JSON bodies with either 200 or 4xx statuses
        let text = response.text().await.map_err(network_error)?;
        if let Ok(error) = serde_json::from_str::<dto::ErrorResponse>(&text) {
            return Err(api_error(error));
        }

        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        let body: dto::SearchResponse =
            serde_json::from_str(&text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(adapter::to_raw_tracks(body))
    }
}

fn api_error(error: dto::ErrorResponse) -> CatalogError {
    match error.error {
        ERROR_INVALID_KEY | ERROR_SUSPENDED_KEY => CatalogError::Auth(error.message),
        ERROR_RATE_LIMIT => CatalogError::RateLimited,
        _ => CatalogError::ApiError(format!("{} (code {})", error.message, error.error)),
    }
}

#[async_trait]
impl CatalogProvider for LastFmClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Lastfm
    }

    async fn try_search(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>, CatalogError> {
        self.search_tracks(query, limit).await
    }
}
