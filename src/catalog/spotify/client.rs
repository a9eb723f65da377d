//! Spotify HTTP client
//!
//! ## Access tokens
//! A client-credentials token is requested on first use and reused until
//! 60 seconds before it expires. Concurrent searches share one refresh.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{adapter, dto};
use crate::catalog::domain::CatalogError;
use crate::catalog::http::{http_client, network_error, read_json};
use crate::catalog::{CatalogProvider, ProviderKind};
use crate::model::RawTrack;

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Market used for search (availability and previews vary per market)
const MARKET: &str = "ES";

/// Largest page the search endpoint accepts
const MAX_LIMIT: u32 = 50;

/// Refresh this long before the token actually expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct AccessToken {
    value: String,
    refresh_at: Instant,
}

/// Spotify Web API client
pub struct SpotifyClient {
    client_id: String,
    client_secret: String,
    http_client: reqwest::Client,
    api_url: String,
    accounts_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl SpotifyClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        Self::with_base_urls(client_id, client_secret, DEFAULT_API_URL, DEFAULT_ACCOUNTS_URL)
    }

    /// Create a client against other API and accounts hosts (test server)
    pub fn with_base_urls(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_url: impl Into<String>,
        accounts_url: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http_client: http_client()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            accounts_url: accounts_url.into().trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        })
    }

    /// Search tracks by free text
    pub async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<RawTrack>, CatalogError> {
        let token = self.access_token().await?;
        let limit = limit.clamp(1, MAX_LIMIT).to_string();

        let response = self
            .http_client
            .get(format!("{}/search", self.api_url))
            .bearer_auth(&token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", limit.as_str()),
                ("market", MARKET),
            ])
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Token revoked early; the next call fetches a fresh one
            *self.token.lock().await = None;
            return Err(CatalogError::Auth("access token rejected".to_string()));
        }

        let body: dto::SearchResponse = read_json(response).await?;
        Ok(adapter::to_raw_tracks(body))
    }

    /// Current token, requesting a new one when missing or about to expire.
    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        tracing::debug!("Requesting Spotify access token");
        let response = self
            .http_client
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(CatalogError::Auth(format!(
                "token request rejected ({})",
                status.as_u16()
            )));
        }

        let token: dto::TokenResponse = read_json(response).await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(AccessToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl CatalogProvider for SpotifyClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Spotify
    }

    async fn try_search(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>, CatalogError> {
        self.search_tracks(query, limit).await
    }
}
