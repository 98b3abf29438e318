//! Weight conversions (avoirdupois ounces and pounds).

use super::ensure_finite;
use crate::error::LocaleError;

/// Grams in one avoirdupois ounce.
pub const GRAMS_PER_OUNCE: f64 = 28.349_523_125;

/// Kilograms in one avoirdupois pound.
pub const KILOGRAMS_PER_POUND: f64 = 0.453_592_37;

pub fn grams_to_ounces(grams: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(grams)? / GRAMS_PER_OUNCE)
}

pub fn ounces_to_grams(ounces: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(ounces)? * GRAMS_PER_OUNCE)
}

pub fn kilograms_to_pounds(kilograms: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(kilograms)? / KILOGRAMS_PER_POUND)
}

pub fn pounds_to_kilograms(pounds: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(pounds)? * KILOGRAMS_PER_POUND)
}
