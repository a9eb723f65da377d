//! Hybrid catalog: a preview source topped up by a metadata source.
//!
//! Each query goes to the preview source (Spotify) first; hits with a
//! playable preview are kept. When that leaves the batch short, the
//! metadata source (Last.fm, whose previews are YouTube embed searches)
//! fills the remaining slots with songs the first source didn't return.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use super::{CatalogError, CatalogProvider, ProviderKind};
use crate::model::{RawTrack, dedup_key};

/// Combines two providers behind one [`CatalogProvider`].
pub struct HybridProvider {
    previews: Arc<dyn CatalogProvider>,
    fallback: Arc<dyn CatalogProvider>,
}

impl HybridProvider {
    pub fn new(previews: Arc<dyn CatalogProvider>, fallback: Arc<dyn CatalogProvider>) -> Self {
        Self { previews, fallback }
    }
}

#[async_trait]
impl CatalogProvider for HybridProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Hybrid
    }

    /// Fails only when both sources fail.
    async fn try_search(&self, query: &str, limit: u32) -> Result<Vec<RawTrack>, CatalogError> {
        let limit_len = limit as usize;
        let primary = self.previews.try_search(query, limit).await;

        let mut tracks: Vec<RawTrack> = match &primary {
            Ok(found) => found
                .iter()
                .filter(|t| t.usable_preview().is_some())
                .take(limit_len)
                .cloned()
                .collect(),
            Err(e) => {
                tracing::warn!(
                    source = %self.previews.kind(),
                    query,
                    "Preview source failed, using {} only: {}",
                    self.fallback.kind(),
                    e
                );
                Vec::new()
            }
        };

        let missing = limit_len.saturating_sub(tracks.len());
        if missing == 0 {
            return Ok(tracks);
        }

        let extra = match self.fallback.try_search(query, limit).await {
            Ok(extra) => extra,
            Err(e) => {
                return match primary {
                    Ok(_) => {
                        tracing::warn!(
                            source = %self.fallback.kind(),
                            query,
                            "Fallback source failed: {}",
                            e
                        );
                        Ok(tracks)
                    }
                    Err(_) => Err(e),
                };
            }
        };

        let mut seen: HashSet<(String, String)> = tracks
            .iter()
            .map(|t| dedup_key(&t.title, &t.artist))
            .collect();
        let before = tracks.len();
        tracks.extend(
            extra
                .into_iter()
                .filter(|t| t.usable_preview().is_some())
                .filter(|t| seen.insert(dedup_key(&t.title, &t.artist)))
                .take(missing),
        );

        tracing::debug!(
            query,
            with_preview = before,
            fallback = tracks.len() - before,
            "Hybrid search complete"
        );
        Ok(tracks)
    }
}
