//! Error types raised by the locale core.
//!
//! Only two kinds ever reach callers of the public operations:
//! `UnknownLocale` (from `change_locale`) and `InvalidMeasurement` (from the
//! unit conversion functions). Translation load failures and storage failures
//! are absorbed at the component boundary and logged instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocaleError {
    /// The code is not a member of the registry's supported set.
    #[error("Unknown locale code: '{0}'")]
    UnknownLocale(String),

    /// A conversion function was given NaN or an infinite value.
    #[error("Invalid measurement: {0} is not a finite number")]
    InvalidMeasurement(f64),

    #[error("Unknown currency code: '{0}'")]
    UnknownCurrency(String),

    /// A custom registry has a duplicate code, a missing default or an
    /// unrenderable date format.
    #[error("Invalid locale registry: {0}")]
    InvalidRegistry(String),
}

/// Failure reading or writing the persisted locale preference.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Preference storage is unavailable")]
    Unavailable,

    #[error("Preference storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
