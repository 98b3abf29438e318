//! Translations fetched from a remote endpoint.

use super::cache::BundleCache;
use super::local::LocalProvider;
use super::{BundleError, TranslationBundle, TranslationProvider};
use crate::i18n::LoadMetrics;
use crate::retry::{with_retry_if, RetryConfig};
use futures::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a remote fetch failed.
#[derive(Debug, Error)]
enum FetchError {
    #[error("Failed to reach translation endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Translation endpoint returned {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Malformed(#[from] BundleError),
}

impl FetchError {
    /// Retry transport errors, 429 and 5xx; a bad status or payload is final.
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            FetchError::Malformed(_) => false,
        }
    }
}

/// Provider fetching `GET {base_url}/translations/{code}`.
///
/// Uses the same per-locale cache and single-flight discipline as
/// [`LocalProvider`]. Any failure that survives the retry policy is handed
/// to an internal local provider.
#[derive(Clone)]
pub struct ExternalProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retry: RetryConfig,
    cache: BundleCache,
    fallback: LocalProvider,
}

impl ExternalProvider {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        fallback: LocalProvider,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            retry: RetryConfig::translation_fetch(),
            cache: BundleCache::new(),
            fallback,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Use `retry` for remote fetches; at least one attempt is always made.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        let attempts = retry.max_attempts();
        self.retry = retry.with_max_attempts(attempts);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn metrics(&self) -> &LoadMetrics {
        self.cache.metrics()
    }

    /// The local provider used when the endpoint cannot deliver.
    pub fn fallback_provider(&self) -> &LocalProvider {
        &self.fallback
    }

    fn url_for(&self, code: &str) -> String {
        format!("{}/translations/{}", self.base_url, code)
    }

    async fn load(&self, code: &str) -> Arc<TranslationBundle> {
        let client = self.client.clone();
        let url = self.url_for(code);
        let token = self.token.clone();
        let retry = self.retry.clone();
        let metrics = self.cache.metrics_handle();
        let owned_code = code.to_string();

        let fetched = self
            .cache
            .load_with(code, move || {
                async move {
                    let operation = format!("Fetching translations for {}", owned_code);
                    let result = with_retry_if(
                        &retry,
                        &operation,
                        || fetch_bundle(&client, &url, token.as_deref()),
                        FetchError::is_retryable,
                    )
                    .await;

                    match result {
                        Ok(bundle) => {
                            debug!(
                                "Fetched {} translation keys for {} from {}",
                                bundle.len(),
                                owned_code,
                                url
                            );
                            Some(Arc::new(bundle))
                        }
                        Err(e) => {
                            metrics.record_failure();
                            warn!("Remote translations for {} unavailable: {}", owned_code, e);
                            None
                        }
                    }
                }
                .boxed()
            })
            .await;

        match fetched {
            Some(bundle) => bundle,
            None => {
                warn!("Using bundled translations for {}", code);
                self.fallback.load_translations(code).await
            }
        }
    }
}

async fn fetch_bundle(
    client: &reqwest::Client,
    url: &str,
    token: Option<&str>,
) -> Result<TranslationBundle, FetchError> {
    let mut request = client.get(url).header("Accept", "application/json");
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {}", token));
    }

    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response.text().await?;
    let value: Value = serde_json::from_str(&body).map_err(BundleError::from)?;
    Ok(TranslationBundle::from_json_value(&value)?)
}

impl TranslationProvider for ExternalProvider {
    fn load_translations<'a>(&'a self, code: &'a str) -> BoxFuture<'a, Arc<TranslationBundle>> {
        self.load(code).boxed()
    }

    fn has_translations(&self, code: &str) -> bool {
        self.cache.contains(code)
    }

    fn fallback_translations(&self) -> Arc<TranslationBundle> {
        match self.cache.get(self.fallback.default_code()) {
            Some(bundle) => bundle,
            None => self.fallback.fallback_translations(),
        }
    }
}
