//! Locale-indexed bundle cache with single-flight loading.

use super::TranslationBundle;
use crate::i18n::LoadMetrics;
use crate::lock;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Result of one underlying load: `None` means it failed and was logged.
pub(crate) type LoadResult = Option<Arc<TranslationBundle>>;

type InFlight = Shared<BoxFuture<'static, LoadResult>>;

enum Attached {
    Ready(Arc<TranslationBundle>),
    Pending(InFlight),
}

/// Cache plus in-flight map shared by the Local and External providers.
///
/// Concurrent requests for the same code attach to a single underlying
/// load. Successful results are cached per locale; failures are not, so a
/// later request tries again.
#[derive(Clone, Default)]
pub(crate) struct BundleCache {
    loaded: Arc<Mutex<HashMap<String, Arc<TranslationBundle>>>>,
    in_flight: Arc<Mutex<HashMap<String, InFlight>>>,
    metrics: Arc<LoadMetrics>,
}

impl BundleCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&self, code: &str) -> Option<Arc<TranslationBundle>> {
        lock(&self.loaded).get(code).cloned()
    }

    pub(crate) fn contains(&self, code: &str) -> bool {
        lock(&self.loaded).contains_key(code)
    }

    pub(crate) fn metrics(&self) -> &LoadMetrics {
        &self.metrics
    }

    pub(crate) fn metrics_handle(&self) -> Arc<LoadMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Return the cached bundle, join an in-flight load, or start one with `start`.
    ///
    /// The bookkeeping (cache insert, in-flight removal) runs inside the
    /// shared future, so it happens exactly once no matter how many callers
    /// are waiting.
    pub(crate) async fn load_with<F>(&self, code: &str, start: F) -> LoadResult
    where
        F: FnOnce() -> BoxFuture<'static, LoadResult>,
    {
        if let Some(bundle) = self.get(code) {
            self.metrics.record_cache_hit();
            debug!("Translations for {} served from cache", code);
            return Some(bundle);
        }

        match self.attach(code, start) {
            Attached::Ready(bundle) => Some(bundle),
            Attached::Pending(load) => load.await,
        }
    }

    /// Join or start a load while holding the in-flight lock.
    ///
    /// A load can finish between the unlocked cache check and this lock, so
    /// the cache is checked again before starting a new one.
    fn attach<F>(&self, code: &str, start: F) -> Attached
    where
        F: FnOnce() -> BoxFuture<'static, LoadResult>,
    {
        let mut in_flight = lock(&self.in_flight);
        if let Some(bundle) = self.get(code) {
            self.metrics.record_cache_hit();
            debug!("Translations for {} cached while waiting", code);
            return Attached::Ready(bundle);
        }
        self.metrics.record_cache_miss();

        match in_flight.get(code) {
            Some(existing) => {
                self.metrics.record_coalesced();
                debug!("Joining in-flight translation load for {}", code);
                Attached::Pending(existing.clone())
            }
            None => {
                self.metrics.record_source_load();
                let shared = self.track(code, start()).shared();
                in_flight.insert(code.to_string(), shared.clone());
                Attached::Pending(shared)
            }
        }
    }

    fn track(
        &self,
        code: &str,
        load: BoxFuture<'static, LoadResult>,
    ) -> BoxFuture<'static, LoadResult> {
        let loaded = Arc::clone(&self.loaded);
        let in_flight = Arc::clone(&self.in_flight);
        let code = code.to_string();

        async move {
            let result = load.await;
            if let Some(bundle) = &result {
                lock(&loaded).insert(code.clone(), Arc::clone(bundle));
            }
            lock(&in_flight).remove(&code);
            result
        }
        .boxed()
    }
}
