//! Internationalization (i18n) module: locale metadata and load metrics.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported locales
//! - `locale`: Value types carried by a locale (direction, currency, number options)
//! - `metrics`: Translation load observability
//!
//! # Example
//!
//! ```
//! use recipe_locale::i18n::LocaleRegistry;
//!
//! let registry = LocaleRegistry::global();
//! assert_eq!(registry.detect_from_environment_tags(&["nl-BE"]), "nl-NL");
//! assert_eq!(registry.get_config("xx-YY").code, "en-US");
//! ```

mod locale;
mod metrics;
mod registry;

pub use locale::{
    language_prefix, normalize_tag, Currency, CurrencyPlacement, NumberFormatOptions, NumberStyle,
    TextDirection,
};
pub use metrics::{LoadMetrics, MetricsReport};
pub use registry::{builtin_locales, LocaleConfig, LocaleRegistry, DEFAULT_LOCALE};
