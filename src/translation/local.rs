//! Translations bundled with the application.

use super::cache::BundleCache;
use super::{TranslationBundle, TranslationProvider};
use crate::i18n::{LoadMetrics, DEFAULT_LOCALE};
use anyhow::{bail, Context, Result};
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a [`LocalProvider`] reads bundles from.
pub trait BundleSource: Send + Sync + 'static {
    fn fetch(&self, code: &str) -> BoxFuture<'static, Result<TranslationBundle>>;
}

/// Namespace files compiled into the binary, per locale.
type EmbeddedLocale = (&'static str, &'static [(&'static str, &'static str)]);

const EMBEDDED: &[EmbeddedLocale] = &[
    (
        "en-US",
        &[
            ("common", include_str!("../../locales/en-US/common.json")),
            ("recipe", include_str!("../../locales/en-US/recipe.json")),
        ],
    ),
    (
        "nl-NL",
        &[
            ("common", include_str!("../../locales/nl-NL/common.json")),
            ("recipe", include_str!("../../locales/nl-NL/recipe.json")),
        ],
    ),
];

/// Bundles embedded at compile time from `locales/<code>/<namespace>.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedBundles;

impl BundleSource for EmbeddedBundles {
    fn fetch(&self, code: &str) -> BoxFuture<'static, Result<TranslationBundle>> {
        let files = EMBEDDED
            .iter()
            .find(|(locale, _)| *locale == code)
            .map(|(_, files)| *files);
        let code = code.to_string();

        async move {
            let Some(files) = files else {
                bail!("No bundled translations for '{}'", code);
            };

            let mut bundle = TranslationBundle::new();
            for (namespace, json) in files {
                let value: Value = serde_json::from_str(json)
                    .with_context(|| format!("Invalid bundled JSON for {}/{}", code, namespace))?;
                bundle.insert_namespace(namespace, &value)?;
            }
            Ok(bundle)
        }
        .boxed()
    }
}

/// Bundles read from disk with the same `<root>/<code>/<namespace>.json` layout.
#[derive(Debug, Clone)]
pub struct DirectoryBundles {
    root: PathBuf,
}

impl DirectoryBundles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BundleSource for DirectoryBundles {
    fn fetch(&self, code: &str) -> BoxFuture<'static, Result<TranslationBundle>> {
        let root = self.root.clone();
        let code = code.to_string();

        async move {
            if code.is_empty() || code.contains(['/', '\\']) || code.contains("..") {
                bail!("Refusing to read translations for invalid code '{}'", code);
            }

            let dir = root.join(&code);
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .with_context(|| {
                    format!("Failed to open translations directory {}", dir.display())
                })?;

            let mut bundle = TranslationBundle::new();
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                let Some(namespace) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };

                let text = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let value: Value = serde_json::from_str(&text)
                    .with_context(|| format!("Invalid JSON in {}", path.display()))?;
                bundle.insert_namespace(namespace, &value)?;
            }

            if bundle.is_empty() {
                bail!("No translation files in {}", dir.display());
            }
            Ok(bundle)
        }
        .boxed()
    }
}

/// Provider backed by a [`BundleSource`], with per-locale caching and
/// single-flight loading.
///
/// A failed load falls back to the default locale's bundle; a failed load
/// of the default locale resolves to an empty bundle.
#[derive(Clone)]
pub struct LocalProvider {
    source: Arc<dyn BundleSource>,
    cache: BundleCache,
    default_code: &'static str,
}

impl LocalProvider {
    pub fn new(source: impl BundleSource, default_code: &'static str) -> Self {
        Self {
            source: Arc::new(source),
            cache: BundleCache::new(),
            default_code,
        }
    }

    /// Provider over the bundles compiled into the binary.
    pub fn embedded() -> Self {
        Self::new(EmbeddedBundles, DEFAULT_LOCALE)
    }

    pub fn from_directory(root: impl Into<PathBuf>) -> Self {
        Self::new(DirectoryBundles::new(root), DEFAULT_LOCALE)
    }

    pub fn default_code(&self) -> &'static str {
        self.default_code
    }

    pub fn metrics(&self) -> &LoadMetrics {
        self.cache.metrics()
    }

    async fn load_once(&self, code: &str) -> Option<Arc<TranslationBundle>> {
        let source = Arc::clone(&self.source);
        let metrics = self.cache.metrics_handle();
        let owned_code = code.to_string();

        self.cache
            .load_with(code, move || {
                async move {
                    match source.fetch(&owned_code).await {
                        Ok(bundle) => {
                            debug!(
                                "Loaded {} bundled translation keys for {}",
                                bundle.len(),
                                owned_code
                            );
                            Some(Arc::new(bundle))
                        }
                        Err(e) => {
                            metrics.record_failure();
                            warn!("Failed to load translations for {}: {:#}", owned_code, e);
                            None
                        }
                    }
                }
                .boxed()
            })
            .await
    }

    async fn load(&self, code: &str) -> Arc<TranslationBundle> {
        if let Some(bundle) = self.load_once(code).await {
            return bundle;
        }

        if code == self.default_code {
            warn!(
                "Default locale {} has no translations, using an empty bundle",
                code
            );
            return Arc::new(TranslationBundle::new());
        }

        warn!(
            "Falling back to {} translations for {}",
            self.default_code, code
        );
        match self.load_once(self.default_code).await {
            Some(bundle) => bundle,
            None => Arc::new(TranslationBundle::new()),
        }
    }
}

impl TranslationProvider for LocalProvider {
    fn load_translations<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Arc<TranslationBundle>> {
        self.load(code).boxed()
    }

    fn has_translations(&self, code: &str) -> bool {
        self.cache.contains(code)
    }

    fn fallback_translations(&self) -> Arc<TranslationBundle> {
        self.cache
            .get(self.default_code)
            .unwrap_or_else(|| Arc::new(TranslationBundle::new()))
    }
}
