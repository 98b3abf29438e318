//! Startup-time choice between local and remote translations.

use super::external::ExternalProvider;
use super::local::{DirectoryBundles, EmbeddedBundles, LocalProvider};
use super::{TranslationBundle, TranslationProvider};
use crate::config::is_production_like;
use crate::i18n::{LoadMetrics, DEFAULT_LOCALE};
use crate::retry::RetryConfig;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Settings the hybrid provider is built from.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Deployment environment name (e.g., "production", "development")
    pub environment: String,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    /// Read bundles from this directory instead of the embedded ones
    pub locales_dir: Option<PathBuf>,
    pub fetch_attempts: u32,
    pub default_locale: &'static str,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_url: None,
            api_token: None,
            locales_dir: None,
            fetch_attempts: RetryConfig::translation_fetch().max_attempts(),
            default_locale: DEFAULT_LOCALE,
        }
    }
}

#[derive(Clone)]
pub enum HybridDelegate {
    Local(LocalProvider),
    External(ExternalProvider),
}

/// Delegates every call to the provider chosen at construction.
#[derive(Clone)]
pub struct HybridProvider {
    delegate: HybridDelegate,
}

impl HybridProvider {
    /// External when an endpoint is configured and the environment is
    /// production-like, Local otherwise.
    pub fn new(config: &ProviderConfig) -> Self {
        let local = match &config.locales_dir {
            Some(dir) => LocalProvider::new(DirectoryBundles::new(dir), config.default_locale),
            None => LocalProvider::new(EmbeddedBundles, config.default_locale),
        };

        let delegate = match &config.api_url {
            Some(url) if is_production_like(&config.environment) => {
                info!("Loading translations from {}", url);
                let retry =
                    RetryConfig::translation_fetch().with_max_attempts(config.fetch_attempts);
                HybridDelegate::External(
                    ExternalProvider::new(url.clone(), config.api_token.clone(), local)
                        .with_retry(retry),
                )
            }
            _ => {
                info!(
                    "Loading bundled translations ({} environment)",
                    config.environment
                );
                HybridDelegate::Local(local)
            }
        };

        Self { delegate }
    }

    pub fn delegate(&self) -> &HybridDelegate {
        &self.delegate
    }

    pub fn is_external(&self) -> bool {
        matches!(self.delegate, HybridDelegate::External(_))
    }

    pub fn metrics(&self) -> &LoadMetrics {
        match &self.delegate {
            HybridDelegate::Local(provider) => provider.metrics(),
            HybridDelegate::External(provider) => provider.metrics(),
        }
    }

    fn provider(&self) -> &dyn TranslationProvider {
        match &self.delegate {
            HybridDelegate::Local(provider) => provider,
            HybridDelegate::External(provider) => provider,
        }
    }
}

impl TranslationProvider for HybridProvider {
    fn load_translations<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Arc<TranslationBundle>> {
        self.provider().load_translations(code)
    }

    fn has_translations(&self, code: &str) -> bool {
        self.provider().has_translations(code)
    }

    fn fallback_translations(&self) -> Arc<TranslationBundle> {
        self.provider().fallback_translations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn config(environment: &str, api_url: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            environment: environment.to_string(),
            api_url: api_url.map(str::to_string),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_local_without_endpoint() {
        let provider = HybridProvider::new(&config("production", None));
        assert!(!provider.is_external());
    }

    #[test]
    fn test_local_outside_production() {
        let provider = HybridProvider::new(&config("development", Some("https://cdn.example.com")));
        assert!(!provider.is_external());

        let provider = HybridProvider::new(&config("test", Some("https://cdn.example.com")));
        assert!(!provider.is_external());
    }

    #[test]
    fn test_external_in_production_like_environments() {
        for environment in ["production", "staging", "Production"] {
            let cfg = config(environment, Some("https://cdn.example.com"));
            let provider = HybridProvider::new(&cfg);
            assert!(provider.is_external(), "{} should use the endpoint", environment);
        }
    }

    #[test]
    fn test_external_respects_fetch_attempts() {
        let mut cfg = config("production", Some("https://cdn.example.com/"));
        cfg.fetch_attempts = 5;
        let provider = HybridProvider::new(&cfg);
        match provider.delegate() {
            HybridDelegate::External(external) => {
                assert_eq!(external.base_url(), "https://cdn.example.com");
                assert_eq!(external.retry_config().max_attempts(), 5);
            }
            HybridDelegate::Local(_) => panic!("expected external delegate"),
        }
    }

    #[tokio::test]
    async fn test_local_delegate_loads_bundled_translations() {
        let provider = HybridProvider::new(&ProviderConfig::default());
        let bundle = provider.load_translations("nl-NL").await;

        assert_eq!(bundle.lookup("common", "actions.save"), Some("Opslaan"));
        assert!(provider.has_translations("nl-NL"));
        assert_eq!(provider.metrics().source_loads(), 1);
    }

    #[tokio::test]
    async fn test_local_delegate_uses_configured_default_locale() {
        let cfg = ProviderConfig {
            default_locale: "nl-NL",
            ..ProviderConfig::default()
        };
        let provider = HybridProvider::new(&cfg);
        let bundle = provider.load_translations("fr-FR").await;

        assert_eq!(bundle.lookup("common", "actions.save"), Some("Opslaan"));
        assert_eq!(
            provider.fallback_translations().lookup("common", "actions.save"),
            Some("Opslaan")
        );
    }

    #[tokio::test]
    async fn test_external_delegate_fetches_remote() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/translations/en-US"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"common": {"hello": "Hi from remote"}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = HybridProvider::new(&config("production", Some(mock_server.uri().as_str())));
        let bundle = provider.load_translations("en-US").await;

        assert_eq!(bundle.lookup("common", "hello"), Some("Hi from remote"));
        assert_eq!(
            provider.fallback_translations().lookup("common", "hello"),
            Some("Hi from remote")
        );
    }
}
