//! The catalog capability consumed by pool building.
//!
//! Production code uses one of the HTTP backends, while tests substitute
//! the scripted provider from [`mocks`].

use async_trait::async_trait;

use super::ProviderKind;
use super::domain::CatalogError;
use crate::model::RawTrack;

/// A searchable source of candidate tracks.
///
/// Implement [`CatalogProvider::try_search`]; callers that are building a
/// pool use [`CatalogProvider::search`], which never fails.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> ProviderKind;

    /// Search the catalog, reporting failures.
    async fn try_search(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>, CatalogError>;

    /// Search the catalog. A failed query yields no tracks.
    async fn search(&self, query: &str, limit: u32) -> Vec<RawTrack> {
        match self.try_search(query, limit).await {
            Ok(tracks) => {
                tracing::debug!(
                    source = %self.kind(),
                    query,
                    found = tracks.len(),
                    "Catalog query complete"
                );
                tracks
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.kind(),
                    query,
                    transient = e.is_transient(),
                    "Catalog query failed: {}",
                    e
                );
                Vec::new()
            }
        }
    }
}
