//! Locale registry: Single source of truth for all supported locales.
//!
//! The built-in registry is a lazily initialized singleton (`OnceLock`), but
//! registries are plain values so tests and embeds can construct their own.
//! Adding a locale means adding a [`LocaleConfig`] here, never special-casing
//! a code elsewhere.

use super::locale::{
    language_prefix, normalize_tag, Currency, CurrencyPlacement, NumberFormatOptions, NumberStyle,
    TextDirection,
};
use crate::error::LocaleError;
use crate::units::MeasurementSystem;
use chrono::format::{Item, StrftimeItems};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Configuration for a supported locale.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleConfig {
    /// BCP 47 locale code (e.g., "en-US", "nl-NL")
    pub code: &'static str,

    /// Name shown in the locale picker (in its own language)
    pub display_name: &'static str,

    /// Flag glyph shown next to the name
    pub flag: &'static str,

    pub measurement_system: MeasurementSystem,

    pub default_currency: Currency,

    pub direction: TextDirection,

    /// chrono `strftime` pattern used by `format_date`
    pub date_format: &'static str,

    pub number_format: NumberFormatOptions,
}

/// A validated, ordered table of locale configurations.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    default_index: usize,
    /// Language prefix -> index of the first locale registered for it
    prefixes: HashMap<String, usize>,
}

/// Whether chrono can render `pattern`; an unknown specifier would panic at
/// format time.
fn is_valid_date_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<Arc<LocaleRegistry>> = OnceLock::new();

/// Code of the built-in default locale.
pub const DEFAULT_LOCALE: &str = "en-US";

impl LocaleRegistry {
    /// Build a registry from configurations in registration order.
    ///
    /// # Errors
    /// Returns `LocaleError::InvalidRegistry` if a code appears twice or if
    /// `default_code` is not one of the configurations.
    pub fn new(locales: Vec<LocaleConfig>, default_code: &str) -> Result<Self, LocaleError> {
        let mut prefixes = HashMap::new();
        for (index, config) in locales.iter().enumerate() {
            if locales[..index].iter().any(|other| other.code == config.code) {
                return Err(LocaleError::InvalidRegistry(format!(
                    "duplicate locale code '{}'",
                    config.code
                )));
            }
            if !is_valid_date_format(config.date_format) {
                return Err(LocaleError::InvalidRegistry(format!(
                    "invalid date format '{}' for locale '{}'",
                    config.date_format, config.code
                )));
            }
            prefixes.entry(language_prefix(config.code)).or_insert(index);
        }

        let default_index = locales
            .iter()
            .position(|config| config.code == default_code)
            .ok_or_else(|| {
                LocaleError::InvalidRegistry(format!(
                    "default locale '{}' is not registered",
                    default_code
                ))
            })?;

        Ok(Self {
            locales,
            default_index,
            prefixes,
        })
    }

    /// Get the global built-in registry.
    pub fn global() -> Arc<LocaleRegistry> {
        REGISTRY
            .get_or_init(|| {
                Arc::new(
                    LocaleRegistry::new(builtin_locales(), DEFAULT_LOCALE)
                        .expect("Built-in locale table should always be valid"),
                )
            })
            .clone()
    }

    /// Get a locale configuration, falling back to the default for unknown codes.
    pub fn get_config(&self, code: &str) -> &LocaleConfig {
        self.find(code).unwrap_or_else(|| self.default_config())
    }

    /// Exact lookup by code.
    pub fn find(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|config| config.code == code)
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    /// All locales, in registration order.
    pub fn list_available(&self) -> &[LocaleConfig] {
        &self.locales
    }

    pub fn default_config(&self) -> &LocaleConfig {
        &self.locales[self.default_index]
    }

    pub fn default_code(&self) -> &'static str {
        self.default_config().code
    }

    /// Pick a supported locale from ordered language preferences.
    ///
    /// Each tag is reduced to its language prefix (`nl-BE` -> `nl`) and
    /// matched against the first locale registered for that language. The
    /// first tag that matches wins; otherwise the default code is returned.
    pub fn detect_from_environment_tags<S: AsRef<str>>(&self, tags: &[S]) -> &'static str {
        tags.iter()
            .map(|tag| language_prefix(tag.as_ref()))
            .filter(|prefix| !prefix.is_empty())
            .find_map(|prefix| self.prefixes.get(&prefix))
            .map(|&index| self.locales[index].code)
            .unwrap_or_else(|| self.default_code())
    }

    /// Case-insensitive exact match (`nl-nl` -> `nl-NL`).
    pub fn canonical_code(&self, code: &str) -> Option<&'static str> {
        let normalized = normalize_tag(code);
        self.locales
            .iter()
            .find(|config| config.code.eq_ignore_ascii_case(&normalized))
            .map(|config| config.code)
    }
}

/// Built-in locale configurations: American English (default) and Dutch.
pub fn builtin_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en-US",
            display_name: "English",
            flag: "🇺🇸",
            measurement_system: MeasurementSystem::Imperial,
            default_currency: Currency::Usd,
            direction: TextDirection::Ltr,
            date_format: "%m/%d/%Y",
            number_format: NumberFormatOptions {
                style: NumberStyle::Decimal,
                min_fraction_digits: 0,
                max_fraction_digits: 2,
                grouping_separator: ',',
                decimal_separator: '.',
                currency_placement: CurrencyPlacement::Prefix,
            },
        },
        LocaleConfig {
            code: "nl-NL",
            display_name: "Nederlands",
            flag: "🇳🇱",
            measurement_system: MeasurementSystem::Metric,
            default_currency: Currency::Eur,
            direction: TextDirection::Ltr,
            date_format: "%d-%m-%Y",
            number_format: NumberFormatOptions {
                style: NumberStyle::Decimal,
                min_fraction_digits: 0,
                max_fraction_digits: 2,
                grouping_separator: '.',
                decimal_separator: ',',
                currency_placement: CurrencyPlacement::PrefixSpaced,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arabic() -> LocaleConfig {
        LocaleConfig {
            code: "ar-SA",
            display_name: "العربية",
            flag: "🇸🇦",
            measurement_system: MeasurementSystem::Metric,
            default_currency: Currency::Usd,
            direction: TextDirection::Rtl,
            date_format: "%d/%m/%Y",
            number_format: NumberFormatOptions {
                style: NumberStyle::Decimal,
                min_fraction_digits: 0,
                max_fraction_digits: 2,
                grouping_separator: ',',
                decimal_separator: '.',
                currency_placement: CurrencyPlacement::SuffixSpaced,
            },
        }
    }

    #[test]
    fn test_registry_global_returns_singleton() {
        let registry1 = LocaleRegistry::global();
        let registry2 = LocaleRegistry::global();

        assert!(Arc::ptr_eq(&registry1, &registry2));
    }

    #[test]
    fn test_get_config_for_every_supported_code() {
        let registry = LocaleRegistry::global();
        for config in registry.list_available() {
            assert_eq!(registry.get_config(config.code).code, config.code);
        }
    }

    #[test]
    fn test_get_config_unknown_falls_back_to_default() {
        let registry = LocaleRegistry::global();
        for code in ["xx-YY", "", "nl", "en-us", "ar-SA"] {
            assert_eq!(registry.get_config(code).code, DEFAULT_LOCALE);
        }
    }

    #[test]
    fn test_list_available_in_registration_order() {
        let registry = LocaleRegistry::global();
        let codes: Vec<_> = registry.list_available().iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["en-US", "nl-NL"]);
    }

    #[test]
    fn test_builtin_dutch_config() {
        let config = LocaleRegistry::global().get_config("nl-NL").clone();
        assert_eq!(config.display_name, "Nederlands");
        assert_eq!(config.default_currency, Currency::Eur);
        assert_eq!(config.measurement_system, MeasurementSystem::Metric);
        assert_eq!(config.number_format.grouping_separator, '.');
    }

    #[test]
    fn test_detect_prefix_match_wins_over_region_mismatch() {
        let registry = LocaleRegistry::global();
        assert_eq!(registry.detect_from_environment_tags(&["nl-BE", "en-US"]), "nl-NL");
    }

    #[test]
    fn test_detect_first_match_wins() {
        let registry = LocaleRegistry::global();
        assert_eq!(registry.detect_from_environment_tags(&["en-GB", "nl-NL"]), "en-US");
    }

    #[test]
    fn test_detect_skips_unknown_languages() {
        let registry = LocaleRegistry::global();
        assert_eq!(
            registry.detect_from_environment_tags(&["fr-FR", "de", "nl_NL.UTF-8"]),
            "nl-NL"
        );
    }

    #[test]
    fn test_detect_falls_back_to_default() {
        let registry = LocaleRegistry::global();
        let empty: [&str; 0] = [];
        assert_eq!(registry.detect_from_environment_tags(&empty), "en-US");
        assert_eq!(registry.detect_from_environment_tags(&["", "fr"]), "en-US");
    }

    #[test]
    fn test_canonical_code() {
        let registry = LocaleRegistry::global();
        assert_eq!(registry.canonical_code("nl-nl"), Some("nl-NL"));
        assert_eq!(registry.canonical_code("en_US"), Some("en-US"));
        assert_eq!(registry.canonical_code("nl"), None);
    }

    #[test]
    fn test_custom_registry_extends_locales() {
        let mut locales = builtin_locales();
        locales.push(arabic());
        let registry = LocaleRegistry::new(locales, "en-US").unwrap();

        assert!(registry.is_supported("ar-SA"));
        assert_eq!(registry.get_config("ar-SA").direction, TextDirection::Rtl);
        assert_eq!(registry.detect_from_environment_tags(&["ar-EG"]), "ar-SA");
    }

    #[test]
    fn test_custom_registry_rejects_duplicates() {
        let mut locales = builtin_locales();
        locales.push(builtin_locales().remove(1));
        let err = LocaleRegistry::new(locales, "en-US").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_custom_registry_requires_default() {
        let err = LocaleRegistry::new(vec![arabic()], "en-US").unwrap_err();
        assert!(matches!(err, LocaleError::InvalidRegistry(_)));
    }

    #[test]
    fn test_custom_registry_rejects_invalid_date_format() {
        let mut locales = builtin_locales();
        locales[1].date_format = "%d-%Q-%Y";
        let err = LocaleRegistry::new(locales, "en-US").unwrap_err();

        assert!(matches!(err, LocaleError::InvalidRegistry(_)));
        assert!(err.to_string().contains("nl-NL"));
    }

    #[test]
    fn test_builtin_date_formats_are_valid() {
        for config in builtin_locales() {
            assert!(is_valid_date_format(config.date_format), "{}", config.code);
        }
        assert!(!is_valid_date_format("%Y-%Q"));
    }

    #[test]
    fn test_custom_default_locale() {
        let registry = LocaleRegistry::new(builtin_locales(), "nl-NL").unwrap();
        assert_eq!(registry.default_code(), "nl-NL");
        assert_eq!(registry.get_config("xx").code, "nl-NL");
        assert_eq!(registry.detect_from_environment_tags(&["fr"]), "nl-NL");
    }
}
