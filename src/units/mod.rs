//! Unit conversion engine.
//!
//! Each physical quantity lives in its own module as a set of paired,
//! pure functions (`x_to_y` / `y_to_x`). Every function rejects NaN and
//! infinite input with [`LocaleError::InvalidMeasurement`]; nothing here
//! knows about locales. Choosing the target system for a locale is done by
//! the caller via [`convert_to_system`].

pub mod length;
pub mod temperature;
pub mod volume;
pub mod weight;

use crate::error::LocaleError;
use serde::{Deserialize, Serialize};

/// Measurement system preferred by a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

/// Units understood by [`convert_to_system`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Grams,
    Ounces,
    Kilograms,
    Pounds,
    Milliliters,
    FluidOunces,
    Cups,
    Centimeters,
    Inches,
}

impl Unit {
    /// The measurement system this unit belongs to.
    pub fn system(self) -> MeasurementSystem {
        match self {
            Unit::Celsius
            | Unit::Grams
            | Unit::Kilograms
            | Unit::Milliliters
            | Unit::Centimeters => MeasurementSystem::Metric,
            Unit::Fahrenheit
            | Unit::Ounces
            | Unit::Pounds
            | Unit::FluidOunces
            | Unit::Cups
            | Unit::Inches => MeasurementSystem::Imperial,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Grams => "g",
            Unit::Ounces => "oz",
            Unit::Kilograms => "kg",
            Unit::Pounds => "lb",
            Unit::Milliliters => "ml",
            Unit::FluidOunces => "fl oz",
            Unit::Cups => "cup",
            Unit::Centimeters => "cm",
            Unit::Inches => "in",
        }
    }
}

/// A value paired with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

/// Express a measurement in the given system.
///
/// A measurement already in `system` is returned unchanged (after the
/// finiteness check). Otherwise it is mapped to its counterpart unit:
/// grams pair with ounces, kilograms with pounds, milliliters with fluid
/// ounces, and cups convert back to milliliters.
pub fn convert_to_system(
    measurement: Measurement,
    system: MeasurementSystem,
) -> Result<Measurement, LocaleError> {
    let value = ensure_finite(measurement.value)?;
    if measurement.unit.system() == system {
        return Ok(Measurement::new(value, measurement.unit));
    }

    let converted = match measurement.unit {
        Unit::Celsius => Measurement::new(
            temperature::celsius_to_fahrenheit(value)?,
            Unit::Fahrenheit,
        ),
        Unit::Fahrenheit => {
            Measurement::new(temperature::fahrenheit_to_celsius(value)?, Unit::Celsius)
        }
        Unit::Grams => Measurement::new(weight::grams_to_ounces(value)?, Unit::Ounces),
        Unit::Ounces => Measurement::new(weight::ounces_to_grams(value)?, Unit::Grams),
        Unit::Kilograms => Measurement::new(weight::kilograms_to_pounds(value)?, Unit::Pounds),
        Unit::Pounds => Measurement::new(weight::pounds_to_kilograms(value)?, Unit::Kilograms),
        Unit::Milliliters => Measurement::new(
            volume::milliliters_to_fluid_ounces(value)?,
            Unit::FluidOunces,
        ),
        Unit::FluidOunces => Measurement::new(
            volume::fluid_ounces_to_milliliters(value)?,
            Unit::Milliliters,
        ),
        Unit::Cups => Measurement::new(volume::cups_to_milliliters(value)?, Unit::Milliliters),
        Unit::Centimeters => {
            Measurement::new(length::centimeters_to_inches(value)?, Unit::Inches)
        }
        Unit::Inches => {
            Measurement::new(length::inches_to_centimeters(value)?, Unit::Centimeters)
        }
    };

    Ok(converted)
}

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(value: f64) -> Result<f64, LocaleError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LocaleError::InvalidMeasurement(value))
    }
}

#[cfg(test)]
pub(crate) fn assert_relative_eq(actual: f64, expected: f64, tolerance: f64) {
    let within = if expected == 0.0 {
        actual.abs() <= tolerance
    } else {
        (actual - expected).abs() <= tolerance * expected.abs()
    };
    assert!(
        within,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
