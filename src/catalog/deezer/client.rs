//! Deezer HTTP client
//!
//! ## Blocking
//! Deezer answers 403 when a region or proxy is blocked. Once that happens
//! the client stops issuing requests for its lifetime and fails fast with
//! [`CatalogError::Blocked`], so pool building moves on immediately.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::{adapter, dto};
use crate::catalog::domain::CatalogError;
use crate::catalog::http::{http_client, network_error, read_json};
use crate::catalog::{CatalogProvider, ProviderKind};
use crate::model::RawTrack;

const DEFAULT_BASE_URL: &str = "https://api.deezer.com";

/// Deezer API client
pub struct DeezerClient {
    http_client: reqwest::Client,
    base_url: String,
    blocked: AtomicBool,
}

impl DeezerClient {
    /// Create a client for the public Deezer API
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against another base URL (proxy or test server)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Ok(Self {
            http_client: http_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blocked: AtomicBool::new(false),
        })
    }

    /// Whether a 403 has disabled this client
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Relaxed)
    }

    /// Search tracks by free text
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RawTrack>, CatalogError> {
        if self.is_blocked() {
            return Err(CatalogError::Blocked("deezer".to_string()));
        }

        let response = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            self.blocked.store(true, Ordering::Relaxed);
            tracing::warn!("Deezer refused the request (403); disabling source");
            return Err(CatalogError::Blocked("deezer".to_string()));
        }

        let body: dto::SearchResponse = read_json(response).await?;
        adapter::to_raw_tracks(body)
    }
}

#[async_trait]
impl CatalogProvider for DeezerClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Deezer
    }

    async fn try_search(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>, CatalogError> {
        self.search_tracks(query, limit).await
    }
}
