//! Music catalog integration.
//!
//! Every backend is split the same way:
//! - `dto`: wire types matching the remote JSON, never used outside the backend
//! - `adapter`: DTO to [`RawTrack`] conversion
//! - `client`: the `reqwest` client implementing [`CatalogProvider`]
//!
//! [`HybridProvider`] layers two backends instead of wrapping an API.
//!
//! Pool building talks to a single `Arc<dyn CatalogProvider>` chosen once
//! from configuration with [`provider_for`], then fans the category
//! queries out with [`gather`].

pub mod deezer;
pub mod domain;
mod http;
pub mod hybrid;
pub mod lastfm;
pub mod provider;
pub mod queries;
pub mod spotify;
pub mod youtube;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::config::Credentials;
use crate::model::RawTrack;

pub use domain::CatalogError;
pub use hybrid::HybridProvider;
pub use provider::CatalogProvider;
pub use queries::{category_queries, queries_for};

/// Available catalog backends.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Public Deezer search, no credentials
    #[default]
    Deezer,
    /// Spotify Web API, client credentials
    Spotify,
    /// YouTube Data API, API key
    Youtube,
    /// Last.fm track search, API key
    Lastfm,
    /// Spotify previews, topped up from Last.fm
    Hybrid,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Deezer => "deezer",
            ProviderKind::Spotify => "spotify",
            ProviderKind::Youtube => "youtube",
            ProviderKind::Lastfm => "lastfm",
            ProviderKind::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the client for `kind`.
///
/// Fails with [`CatalogError::MissingCredentials`] when the backend needs
/// a key that is not configured.
pub fn provider_for(
    kind: ProviderKind,
    credentials: &Credentials,
) -> Result<Arc<dyn CatalogProvider>, CatalogError> {
    let provider: Arc<dyn CatalogProvider> = match kind {
        ProviderKind::Deezer => Arc::new(deezer::DeezerClient::new()?),
        ProviderKind::Spotify => {
            let client_id = non_blank(&credentials.spotify_client_id)
                .ok_or(CatalogError::MissingCredentials("spotify"))?;
            let client_secret = non_blank(&credentials.spotify_client_secret)
                .ok_or(CatalogError::MissingCredentials("spotify"))?;
            Arc::new(spotify::SpotifyClient::new(client_id, client_secret)?)
        }
        ProviderKind::Youtube => {
            let api_key = non_blank(&credentials.youtube_api_key)
                .ok_or(CatalogError::MissingCredentials("youtube"))?;
            Arc::new(youtube::YouTubeClient::new(api_key)?)
        }
        ProviderKind::Lastfm => {
            let api_key = non_blank(&credentials.lastfm_api_key)
                .ok_or(CatalogError::MissingCredentials("lastfm"))?;
            Arc::new(lastfm::LastFmClient::new(api_key)?)
        }
        ProviderKind::Hybrid => Arc::new(HybridProvider::new(
            provider_for(ProviderKind::Spotify, credentials)?,
            provider_for(ProviderKind::Lastfm, credentials)?,
        )),
    };

    tracing::debug!(source = %kind, "Catalog provider ready");
    Ok(provider)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Run every query against `provider`, at most `concurrency` at a time.
///
/// Results come back in query order, one batch per query. Failed queries
/// contribute an empty batch.
pub async fn gather(
    provider: &dyn CatalogProvider,
    queries: &[String],
    limit: u32,
    concurrency: usize,
) -> Vec<Vec<RawTrack>> {
    let batches: Vec<Vec<RawTrack>> = stream::iter(queries)
        .map(|query| provider.search(query, limit))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let found: usize = batches.iter().map(Vec::len).sum();
    let empty = batches.iter().filter(|b| b.is_empty()).count();
    tracing::info!(
        source = %provider.kind(),
        queries = queries.len(),
        empty,
        found,
        "Gathered catalog results"
    );

    batches
}

#[cfg(test)]
mod tests {
    use super::provider::mocks::ScriptedProvider;
    use super::*;
    use crate::test_utils::{raw_track, raw_tracks};

    #[test]
    fn test_provider_kind_serde() {
        let json = serde_json::to_string(&ProviderKind::Lastfm).unwrap();
        assert_eq!(json, "\"lastfm\"");
        let kind: ProviderKind = serde_json::from_str("\"youtube\"").unwrap();
        assert_eq!(kind, ProviderKind::Youtube);
        assert_eq!(ProviderKind::default(), ProviderKind::Deezer);
    }

    #[test]
    fn test_missing_credentials() {
        let credentials = Credentials::default();
        for (kind, name) in [
            (ProviderKind::Spotify, "spotify"),
            (ProviderKind::Youtube, "youtube"),
            (ProviderKind::Lastfm, "lastfm"),
            (ProviderKind::Hybrid, "spotify"),
        ] {
            match provider_for(kind, &credentials) {
                Err(CatalogError::MissingCredentials(n)) => assert_eq!(n, name),
                Err(e) => panic!("unexpected error for {kind}: {e}"),
                Ok(_) => panic!("{kind} should need credentials"),
            }
        }
    }

    #[test]
    fn test_hybrid_needs_both_sources() {
        let credentials = Credentials {
            spotify_client_id: Some("id".to_string()),
            spotify_client_secret: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            provider_for(ProviderKind::Hybrid, &credentials),
            Err(CatalogError::MissingCredentials("lastfm"))
        ));
        let kind: ProviderKind = serde_json::from_str("\"hybrid\"").unwrap();
        assert_eq!(kind, ProviderKind::Hybrid);
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let credentials = Credentials {
            youtube_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            provider_for(ProviderKind::Youtube, &credentials),
            Err(CatalogError::MissingCredentials("youtube"))
        ));
    }

    #[test]
    fn test_provider_for_builds_configured_backends() {
        let credentials = Credentials {
            spotify_client_id: Some("id".to_string()),
            spotify_client_secret: Some("secret".to_string()),
            youtube_api_key: Some("yt".to_string()),
            lastfm_api_key: Some("lfm".to_string()),
        };
        for kind in [
            ProviderKind::Deezer,
            ProviderKind::Spotify,
            ProviderKind::Youtube,
            ProviderKind::Lastfm,
            ProviderKind::Hybrid,
        ] {
            let provider = provider_for(kind, &credentials).unwrap();
            assert_eq!(provider.kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_gather_keeps_query_order_and_tolerates_failures() {
        let provider = ScriptedProvider::new()
            .with_tracks("a", vec![raw_track("1", "One", "X")])
            .with_error("b", CatalogError::RateLimited)
            .with_tracks("c", raw_tracks(2));
        let queries: Vec<String> = ["a", "b", "c"].iter().map(|q| q.to_string()).collect();

        let batches = gather(&provider, &queries, 10, 2).await;

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0][0].id, "1");
        assert!(batches[1].is_empty());
        assert_eq!(batches[2].len(), 2);
    }

    #[tokio::test]
    async fn test_gather_zero_concurrency_still_runs() {
        let provider = ScriptedProvider::new().with_tracks("a", raw_tracks(1));
        let batches = gather(&provider, &["a".to_string()], 10, 0).await;
        assert_eq!(batches, vec![raw_tracks(1)]);
    }
}
