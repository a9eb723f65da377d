//! Pool building diagnostics and cache maintenance.

use tokio::runtime::Runtime;

use crate::catalog::{self, ProviderKind};
use crate::config::Config;
use crate::error::{Error, ResultExt};
use crate::model::Category;
use crate::pool::{PoolCache, PoolRequest, TrackPool, load_pool};

/// Pool request for `category` using the configured catalog settings.
pub(super) fn pool_request(config: &Config, category: Category, refresh: bool) -> PoolRequest {
    PoolRequest {
        category,
        queries: catalog::queries_for(category, &config.catalog.extra_queries),
        per_query_limit: config.catalog.per_query_limit,
        concurrency: config.catalog.concurrency,
        cache_ttl: config.catalog.cache_ttl(),
        refresh,
    }
}

/// Resolve the provider and load a pool, from cache when possible.
pub(super) fn fetch_pool(
    rt: &Runtime,
    config: &Config,
    category: Category,
    source: ProviderKind,
    refresh: bool,
) -> Result<TrackPool, Error> {
    let provider = catalog::provider_for(source, &config.credentials)?;
    let request = pool_request(config, category, refresh);
    let cache = PoolCache::default_location();

    println!("Loading {} songs from {}...", category, source);
    let pool = rt.block_on(load_pool(provider.as_ref(), &request, Some(&cache)))?;
    Ok(pool)
}

/// Build a pool and print it
pub fn cmd_pool(
    rt: &Runtime,
    config: &Config,
    category: Category,
    source: ProviderKind,
    refresh: bool,
) -> anyhow::Result<()> {
    let pool = fetch_pool(rt, config, category, source, refresh)?;

    println!("{} playable tracks:", pool.len());
    for (i, track) in pool.tracks().iter().enumerate() {
        println!("{:>4}. {}", i + 1, track.display_label());
        println!("      preview: {}", track.preview_ref);
        println!("      artwork: {}", track.artwork_or_placeholder());
    }
    Ok(())
}

/// Remove every cached pool
pub fn cmd_clear_cache() -> anyhow::Result<()> {
    let removed = PoolCache::default_location()
        .clear()
        .with_context("clearing pool cache")?;
    println!("Removed {} cached pool(s).", removed);
    Ok(())
}
