use crate::i18n::LocaleRegistry;
use crate::translation::ProviderConfig;
use anyhow::{ensure, Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment ("production", "staging", "development", ...)
    pub environment: String,

    // Remote translations
    pub translations_api_url: Option<String>,
    pub translations_api_token: Option<String>,
    pub translations_fetch_attempts: u32,

    // Bundled translations
    pub locales_dir: Option<PathBuf>,

    // Persisted preference
    pub preferences_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),

            // Remote translations
            translations_api_url: non_empty_var("TRANSLATIONS_API_URL"),
            translations_api_token: non_empty_var("TRANSLATIONS_API_TOKEN"),
            translations_fetch_attempts: fetch_attempts_from_env()?,

            // Bundled translations
            locales_dir: non_empty_var("LOCALES_DIR").map(PathBuf::from),

            // Persisted preference
            preferences_path: non_empty_var("LOCALE_PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".recipe-locale.json")),
        })
    }

    pub fn is_production_like(&self) -> bool {
        is_production_like(&self.environment)
    }

    /// Settings for the translation provider chosen at startup. Bundles fall
    /// back to the default locale of `registry`.
    pub fn provider_config(&self, registry: &LocaleRegistry) -> ProviderConfig {
        ProviderConfig {
            environment: self.environment.clone(),
            api_url: self.translations_api_url.clone(),
            api_token: self.translations_api_token.clone(),
            locales_dir: self.locales_dir.clone(),
            fetch_attempts: self.translations_fetch_attempts,
            default_locale: registry.default_code(),
        }
    }
}

fn fetch_attempts_from_env() -> Result<u32> {
    let Ok(value) = std::env::var("TRANSLATIONS_FETCH_ATTEMPTS") else {
        return Ok(2);
    };
    let attempts: u32 = value
        .trim()
        .parse()
        .context("TRANSLATIONS_FETCH_ATTEMPTS must be a positive integer")?;
    ensure!(
        attempts > 0,
        "TRANSLATIONS_FETCH_ATTEMPTS must be a positive integer, got 0"
    );
    Ok(attempts)
}

/// Production and staging deployments use remote translations when configured.
pub fn is_production_like(environment: &str) -> bool {
    let environment = environment.trim();
    environment.eq_ignore_ascii_case("production") || environment.eq_ignore_ascii_case("staging")
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
