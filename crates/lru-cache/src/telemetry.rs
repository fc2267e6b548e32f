//! Prometheus export of cache statistics

use anyhow::{Context, Result};
use lru_core::LruCache;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder
pub fn install_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Publish the current state of `cache` to the installed recorder
pub fn publish<K, V>(cache: &LruCache<K, V>) {
    let stats = cache.stats();

    metrics::counter!("lru_cache_hits_total").absolute(stats.hit_count);
    metrics::counter!("lru_cache_misses_total").absolute(stats.miss_count);
    metrics::counter!("lru_cache_evictions_total").absolute(stats.eviction_count);
    metrics::gauge!("lru_cache_entries").set(cache.len() as f64);
    metrics::gauge!("lru_cache_capacity").set(cache.capacity() as f64);
}
