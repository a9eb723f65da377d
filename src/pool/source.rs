//! Pool sourcing: cache first, then the catalog.

use chrono::TimeDelta;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{PoolCache, TrackPool, build_pool_with_report, rebuild_pool};
use crate::catalog::{self, CatalogProvider};
use crate::game::GameError;
use crate::model::Category;

/// What to fetch and how.
#[derive(Debug, Clone)]
pub struct PoolRequest {
    pub category: Category,
    /// Search queries, in priority order
    pub queries: Vec<String>,
    /// Results requested per query
    pub per_query_limit: u32,
    /// Queries in flight at once
    pub concurrency: usize,
    /// Maximum age of a usable cache entry; zero disables the cache
    pub cache_ttl: TimeDelta,
    /// Skip the cache read (the fresh pool is still written)
    pub refresh: bool,
}

impl PoolRequest {
    /// Cache key for this request against `source`.
    pub fn cache_key(&self, source: &str) -> String {
        PoolCache::key(
            source,
            self.category.as_str(),
            &self.queries,
            self.per_query_limit,
        )
    }
}

/// Load a pool for `request`.
///
/// A fresh cache entry is re-validated and reshuffled; otherwise every
/// query is sent to `provider` and the merged results are built into a
/// pool, which is then cached. Provider failures only shrink the result;
/// the one error is [`GameError::InsufficientTracks`].
pub async fn load_pool(
    provider: &dyn CatalogProvider,
    request: &PoolRequest,
    cache: Option<&PoolCache>,
) -> Result<TrackPool, GameError> {
    let key = request.cache_key(provider.kind().as_str());
    let cache = cache.filter(|_| request.cache_ttl > TimeDelta::zero());

    if let Some(cache) = cache.filter(|_| !request.refresh) {
        if let Some(tracks) = cache.get(&key, request.cache_ttl) {
            match rebuild_pool(tracks, &mut StdRng::from_os_rng()) {
                Ok(pool) => {
                    tracing::info!(key = %key, size = pool.len(), "Using cached track pool");
                    return Ok(pool);
                }
                Err(e) => tracing::warn!(key = %key, "Cached pool unusable: {}", e),
            }
        }
    }

    let batches = catalog::gather(
        provider,
        &request.queries,
        request.per_query_limit,
        request.concurrency,
    )
    .await;
    let (pool, report) = build_pool_with_report(batches, &mut StdRng::from_os_rng())?;
    tracing::debug!(?report, "Pool build report");

    if let Some(cache) = cache {
        if let Err(e) = cache.put(&key, &pool) {
            tracing::warn!(key = %key, "Failed to cache track pool: {}", e);
        }
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::catalog::provider::mocks::ScriptedProvider;
    use crate::pool::build_pool;
    use crate::test_utils::{raw_track, raw_tracks, seeded_rng};
    use tempfile::TempDir;

    fn request(queries: &[&str]) -> PoolRequest {
        PoolRequest {
            category: Category::Pop,
            queries: queries.iter().map(|q| q.to_string()).collect(),
            per_query_limit: 10,
            concurrency: 2,
            cache_ttl: TimeDelta::hours(24),
            refresh: false,
        }
    }

    fn provider() -> ScriptedProvider {
        ScriptedProvider::new()
            .with_tracks("a", raw_tracks(3))
            .with_error("b", CatalogError::RateLimited)
            .with_tracks(
                "c",
                vec![
                    raw_track("x", "Other", "Band"),
                    raw_track("y", "Another", "Band"),
                ],
            )
    }

    #[tokio::test]
    async fn test_builds_from_catalog_and_caches() {
        let temp = TempDir::new().unwrap();
        let cache = PoolCache::new(temp.path());

        let pool = load_pool(&provider(), &request(&["a", "b", "c"]), Some(&cache))
            .await
            .unwrap();

        assert_eq!(pool.len(), 5);
        assert!(cache.contains(&request(&["a", "b", "c"]).cache_key("deezer")));
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_catalog() {
        let temp = TempDir::new().unwrap();
        let cache = PoolCache::new(temp.path());
        let cached = build_pool(vec![raw_tracks(6)], &mut seeded_rng(1)).unwrap();
        cache.put(&request(&["a"]).cache_key("deezer"), &cached).unwrap();
        let provider = provider();

        let pool = load_pool(&provider, &request(&["a"]), Some(&cache))
            .await
            .unwrap();

        assert_eq!(pool.len(), 6);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_changed_queries_miss_cache() {
        let temp = TempDir::new().unwrap();
        let cache = PoolCache::new(temp.path());
        let cached = build_pool(vec![raw_tracks(6)], &mut seeded_rng(1)).unwrap();
        cache.put(&request(&["a"]).cache_key("deezer"), &cached).unwrap();
        let provider = provider();

        let pool = load_pool(&provider, &request(&["a", "c"]), Some(&cache))
            .await
            .unwrap();

        assert_eq!(pool.len(), 5);
        assert_eq!(provider.calls(), vec!["a", "c"]);
        assert!(cache.contains(&request(&["a", "c"]).cache_key("deezer")));
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let temp = TempDir::new().unwrap();
        let cache = PoolCache::new(temp.path());
        let cached = build_pool(vec![raw_tracks(6)], &mut seeded_rng(1)).unwrap();
        cache.put(&request(&["a", "c"]).cache_key("deezer"), &cached).unwrap();
        let provider = provider();
        let request = PoolRequest {
            refresh: true,
            ..request(&["a", "c"])
        };

        let pool = load_pool(&provider, &request, Some(&cache)).await.unwrap();

        assert_eq!(pool.len(), 5);
        assert_eq!(provider.calls(), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let temp = TempDir::new().unwrap();
        let cache = PoolCache::new(temp.path());
        let request = PoolRequest {
            cache_ttl: TimeDelta::zero(),
            ..request(&["a", "c"])
        };

        load_pool(&provider(), &request, Some(&cache)).await.unwrap();

        assert!(!cache.contains(&request.cache_key("deezer")));
    }

    #[tokio::test]
    async fn test_too_few_tracks() {
        let temp = TempDir::new().unwrap();
        let cache = PoolCache::new(temp.path());

        let result = load_pool(&provider(), &request(&["a", "b"]), Some(&cache)).await;

        assert_eq!(
            result,
            Err(GameError::InsufficientTracks {
                available: 3,
                required: 4
            })
        );
        assert!(!cache.contains(&request(&["a", "b"]).cache_key("deezer")));
    }

    #[tokio::test]
    async fn test_all_queries_failing() {
        let provider = ScriptedProvider::new()
            .with_error("a", CatalogError::Network("offline".to_string()))
            .with_error("b", CatalogError::Blocked("deezer".to_string()));

        let result = load_pool(&provider, &request(&["a", "b"]), None).await;

        assert!(matches!(
            result,
            Err(GameError::InsufficientTracks { available: 0, .. })
        ));
    }
}
