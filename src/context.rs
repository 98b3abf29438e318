//! What UI components consume: the current locale, the locale picker list,
//! locale changes, unit conversion, formatting and translated text.

use crate::controller::{LocaleController, Subscription};
use crate::error::LocaleError;
use crate::format::Formatter;
use crate::i18n::{Currency, LocaleConfig};
use crate::lock;
use crate::translation::{interpolate, TranslationBundle, TranslationProvider};
use crate::units::{convert_to_system, Measurement};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct LocaleContext {
    controller: Arc<LocaleController>,
    provider: Arc<dyn TranslationProvider>,
    formatter: Formatter,
    /// Bundles this context has loaded, by locale code
    bundles: Mutex<HashMap<&'static str, Arc<TranslationBundle>>>,
}

impl LocaleContext {
    pub fn new(controller: Arc<LocaleController>, provider: Arc<dyn TranslationProvider>) -> Self {
        Self {
            formatter: Formatter::new(Arc::clone(&controller)),
            controller,
            provider,
            bundles: Mutex::new(HashMap::new()),
        }
    }

    pub fn locale(&self) -> LocaleConfig {
        self.controller.current_locale()
    }

    pub fn available_locales(&self) -> &[LocaleConfig] {
        self.controller.registry().list_available()
    }

    pub fn controller(&self) -> &Arc<LocaleController> {
        &self.controller
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Change the locale, then load its translations.
    ///
    /// The state transition and subscriber notification happen before the
    /// load starts; a slow or failing load never delays or undoes them.
    pub async fn change_locale(&self, code: &str) -> Result<LocaleConfig, LocaleError> {
        let config = self.controller.change_locale(code)?;
        self.load_translations_for(config.code).await;
        Ok(config)
    }

    /// Load translations for the current locale and the default locale.
    pub async fn load_current_translations(&self) -> Arc<TranslationBundle> {
        let code = self.controller.current_locale().code;
        let default_code = self.controller.registry().default_code();
        if code != default_code {
            self.load_translations_for(default_code).await;
        }
        self.load_translations_for(code).await
    }

    async fn load_translations_for(&self, code: &'static str) -> Arc<TranslationBundle> {
        let bundle = self.provider.load_translations(code).await;
        debug!("Translations ready for {} ({} keys)", code, bundle.len());
        lock(&self.bundles).insert(code, Arc::clone(&bundle));
        bundle
    }

    /// Convert a measurement into the current locale's measurement system.
    pub fn convert(&self, measurement: Measurement) -> Result<Measurement, LocaleError> {
        convert_to_system(measurement, self.locale().measurement_system)
    }

    pub fn format_currency(&self, amount: f64, currency: Option<Currency>) -> String {
        self.formatter.format_currency(amount, currency)
    }

    pub fn format_number(&self, value: f64) -> String {
        self.formatter.format_number(value)
    }

    pub fn format_date(&self, date: &NaiveDate) -> String {
        self.formatter.format_date(date)
    }

    /// Re-render hook for the translation layer.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&LocaleConfig) + Send + Sync + 'static,
    {
        self.controller.subscribe(listener)
    }

    /// Look up `namespace:key` in the current locale's bundle, then the
    /// default locale's bundle. Missing everywhere, the key itself is returned.
    pub fn translate(&self, namespace: &str, key: &str) -> String {
        let code = self.controller.current_locale().code;
        let default_code = self.controller.registry().default_code();
        let (current, default) = {
            let bundles = lock(&self.bundles);
            (bundles.get(code).cloned(), bundles.get(default_code).cloned())
        };

        if let Some(text) = current.as_deref().and_then(|b| b.lookup(namespace, key)) {
            return text.to_string();
        }

        let fallback = default.unwrap_or_else(|| self.provider.fallback_translations());
        match fallback.lookup(namespace, key) {
            Some(text) => text.to_string(),
            None => {
                debug!("Missing translation {}:{} for {}", namespace, key, code);
                key.to_string()
            }
        }
    }

    /// [`translate`](Self::translate) with `{name}` placeholders filled in.
    pub fn translate_with(&self, namespace: &str, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.translate(namespace, key), args)
    }
}
