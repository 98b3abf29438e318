//! Temperature conversions.

use super::ensure_finite;
use crate::error::LocaleError;

pub fn celsius_to_fahrenheit(celsius: f64) -> Result<f64, LocaleError> {
    let celsius = ensure_finite(celsius)?;
    Ok(celsius * 9.0 / 5.0 + 32.0)
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> Result<f64, LocaleError> {
    let fahrenheit = ensure_finite(fahrenheit)?;
    Ok((fahrenheit - 32.0) * 5.0 / 9.0)
}
