//! Translation load metrics.
//!
//! Each provider owns its own counters so that independent providers (and
//! tests) never observe each other's activity.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for bundle loading activity of one provider.
#[derive(Debug, Default)]
pub struct LoadMetrics {
    /// Number of times a bundle was served from cache
    cache_hits: AtomicUsize,

    /// Number of times a bundle was not in cache
    cache_misses: AtomicUsize,

    /// Number of underlying loads started (file read, remote fetch, ...)
    source_loads: AtomicUsize,

    /// Number of callers that attached to an in-flight load instead of starting one
    coalesced: AtomicUsize,

    /// Number of underlying loads that failed
    failures: AtomicUsize,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_load(&self) {
        self.source_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn source_loads(&self) -> usize {
        self.source_loads.load(Ordering::Relaxed)
    }

    pub fn coalesced(&self) -> usize {
        self.coalesced.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_cache_queries = hits + misses;
        let cache_hit_rate = if total_cache_queries > 0 {
            (hits as f64 / total_cache_queries as f64) * 100.0
        } else {
            0.0
        };

        let loads = self.source_loads();
        let failures = self.failures().min(loads);
        let load_success_rate = if loads > 0 {
            ((loads - failures) as f64 / loads as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            source_loads: loads,
            coalesced: self.coalesced(),
            failures,
            load_success_rate,
        }
    }
}

/// Snapshot of a provider's load counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub source_loads: usize,
    pub coalesced: usize,
    pub failures: usize,

    /// Load success rate as a percentage (0-100)
    pub load_success_rate: f64,
}
