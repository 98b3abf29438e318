//! Translation providers.
//!
//! A provider turns a locale code into a [`TranslationBundle`]. Three
//! variants share one contract:
//!
//! - [`LocalProvider`]: bundles shipped with the application
//! - [`ExternalProvider`]: bundles fetched from a remote endpoint, with a
//!   local provider as safety net
//! - [`HybridProvider`]: picks one of the two once, at startup
//!
//! Providers never fail: a load that cannot be satisfied resolves to the
//! default locale's bundle, or to an empty bundle.

mod cache;
mod external;
mod hybrid;
mod local;

pub use external::ExternalProvider;
pub use hybrid::{HybridDelegate, HybridProvider, ProviderConfig};
pub use local::{BundleSource, DirectoryBundles, EmbeddedBundles, LocalProvider};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Common contract of all translation providers.
pub trait TranslationProvider: Send + Sync {
    /// Load the bundle for `code`, resolving to a fallback bundle on failure.
    fn load_translations<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Arc<TranslationBundle>>;

    /// Whether a bundle for `code` is already cached. Never triggers a load.
    fn has_translations(&self, code: &str) -> bool;

    /// Cached bundle of the default locale, or an empty bundle.
    fn fallback_translations(&self) -> Arc<TranslationBundle>;
}

/// Error produced when a payload is not a valid bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Bundle is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bundle is malformed: {0}")]
    Malformed(String),
}

/// Localized strings for one locale: namespace -> key -> text.
///
/// Nested objects inside a namespace are flattened with `.`-joined keys, so
/// `{"recipe": {"steps": {"title": "Steps"}}}` is looked up as
/// `lookup("recipe", "steps.title")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationBundle {
    namespaces: BTreeMap<String, BTreeMap<String, String>>,
}

impl TranslationBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole bundle (`{"namespace": {...}, ...}`) from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, BundleError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    /// Build a bundle from a JSON object keyed by namespace.
    pub fn from_json_value(value: &Value) -> Result<Self, BundleError> {
        let object = value
            .as_object()
            .ok_or_else(|| BundleError::Malformed("top level must be an object".to_string()))?;

        let mut bundle = Self::new();
        for (namespace, entries) in object {
            bundle.insert_namespace(namespace, entries)?;
        }
        Ok(bundle)
    }

    /// Add (or merge into) one namespace from a nested JSON object.
    pub fn insert_namespace(
        &mut self,
        namespace: &str,
        entries: &Value,
    ) -> Result<(), BundleError> {
        if !entries.is_object() {
            return Err(BundleError::Malformed(format!(
                "namespace '{}' must be an object",
                namespace
            )));
        }

        let target = self.namespaces.entry(namespace.to_string()).or_default();
        flatten_into(target, None, entries).map_err(|key| {
            BundleError::Malformed(format!("'{}.{}' is not a string", namespace, key))
        })
    }

    pub fn lookup(&self, namespace: &str, key: &str) -> Option<&str> {
        self.namespaces
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.values().all(BTreeMap::is_empty)
    }

    /// Total number of keys across namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }
}

/// Flatten nested objects; returns the offending key on non-string leaves.
fn flatten_into(
    target: &mut BTreeMap<String, String>,
    prefix: Option<&str>,
    value: &Value,
) -> Result<(), String> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.clone(),
                };
                flatten_into(target, Some(&path), child)?;
            }
            Ok(())
        }
        Value::String(text) => {
            let key = prefix.unwrap_or_default().to_string();
            target.insert(key, text.clone());
            Ok(())
        }
        _ => Err(prefix.unwrap_or_default().to_string()),
    }
}

/// Replace `{name}` placeholders with the given arguments.
///
/// Placeholders without a matching argument are left as they are.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut output = template.to_string();
    for (name, value) in args {
        output = output.replace(&format!("{{{}}}", name), value);
    }
    output
}
