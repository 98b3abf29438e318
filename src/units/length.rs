//! Length conversions.

use super::ensure_finite;
use crate::error::LocaleError;

pub const CENTIMETERS_PER_INCH: f64 = 2.54;

pub fn centimeters_to_inches(centimeters: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(centimeters)? / CENTIMETERS_PER_INCH)
}

pub fn inches_to_centimeters(inches: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(inches)? * CENTIMETERS_PER_INCH)
}
