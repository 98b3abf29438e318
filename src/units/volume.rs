//! Volume conversions (US customary fluid ounces and cups).

use super::ensure_finite;
use crate::error::LocaleError;

/// Milliliters in one US fluid ounce.
pub const MILLILITERS_PER_FLUID_OUNCE: f64 = 29.573_529_562_5;

/// Milliliters in one US customary cup (8 fl oz).
pub const MILLILITERS_PER_CUP: f64 = 236.588_236_5;

pub fn milliliters_to_fluid_ounces(milliliters: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(milliliters)? / MILLILITERS_PER_FLUID_OUNCE)
}

pub fn fluid_ounces_to_milliliters(fluid_ounces: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(fluid_ounces)? * MILLILITERS_PER_FLUID_OUNCE)
}

pub fn milliliters_to_cups(milliliters: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(milliliters)? / MILLILITERS_PER_CUP)
}

pub fn cups_to_milliliters(cups: f64) -> Result<f64, LocaleError> {
    Ok(ensure_finite(cups)? * MILLILITERS_PER_CUP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_cup_is_eight_fluid_ounces() {
        let ml = cups_to_milliliters(1.0).unwrap();
        assert_relative_eq(milliliters_to_fluid_ounces(ml).unwrap(), 8.0, 1e-12);
    }

    #[test]
    fn test_half_liter_in_cups() {
        assert_relative_eq(milliliters_to_cups(500.0).unwrap(), 2.113_376_418_865_188, 1e-12);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(milliliters_to_cups(f64::NEG_INFINITY).is_err());
        assert!(fluid_ounces_to_milliliters(f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn prop_fluid_ounce_round_trip(ml in -1.0e9f64..1.0e9) {
            let ounces = milliliters_to_fluid_ounces(ml).unwrap();
            let back = fluid_ounces_to_milliliters(ounces).unwrap();
            assert_relative_eq(back, ml, 1e-9);
        }

        #[test]
        fn prop_cup_round_trip(ml in -1.0e9f64..1.0e9) {
            let back = cups_to_milliliters(milliliters_to_cups(ml).unwrap()).unwrap();
            assert_relative_eq(back, ml, 1e-9);
        }
    }
}
