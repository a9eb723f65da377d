//! YouTube HTTP client

use std::fmt;

use async_trait::async_trait;

use super::{adapter, dto};
use crate::catalog::domain::CatalogError;
use crate::catalog::http::{http_client, network_error, read_json};
use crate::catalog::{CatalogProvider, ProviderKind};
use crate::model::RawTrack;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// "Music" video category
const MUSIC_CATEGORY_ID: &str = "10";

/// Largest page `search.list` accepts
const MAX_RESULTS: u32 = 50;

/// Appended to every query to favour studio recordings
const QUERY_SUFFIX: &str = "official audio";

/// YouTube Data API client
pub struct YouTubeClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl YouTubeClient {
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
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Search music videos by free text
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RawTrack>, CatalogError> {
        let q = format!("{} {}", query, QUERY_SUFFIX);
        let max_results = limit.clamp(1, MAX_RESULTS).to_string();

        let response = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
                ("q", q.as_str()),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(forbidden_error(&body));
        }

        let body: dto::SearchResponse = read_json(response).await?;
        Ok(adapter::to_raw_tracks(body))
    }
}

/// 403 covers both an exhausted daily quota and a bad key.
fn forbidden_error(body: &str) -> CatalogError {
    let Ok(error) = serde_json::from_str::<dto::ErrorResponse>(body) else {
        return CatalogError::Auth("request forbidden".to_string());
    };

    let quota = error
        .error
        .errors
        .iter()
        .filter_map(|e| e.reason.as_deref())
        .any(|reason| reason == "quotaExceeded" || reason == "rateLimitExceeded");

    if quota {
        CatalogError::RateLimited
    } else {
        CatalogError::Auth(error.error.message)
    }
}

#[async_trait]
impl CatalogProvider for YouTubeClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Youtube
    }

    async fn try_search(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>, CatalogError> {
        self.search_tracks(query, limit).await
    }
}
