//! Locale-aware formatting of currency, numbers, dates and measurements.
//!
//! [`Formatter`] reads the controller's current locale on every call, so a
//! locale change shows up on the next call without re-subscribing. The
//! `*_with` functions take the configuration explicitly.

use crate::controller::LocaleController;
use crate::i18n::{Currency, CurrencyPlacement, LocaleConfig, NumberFormatOptions, NumberStyle};
use crate::units::Measurement;
use chrono::NaiveDate;
use std::sync::Arc;

/// Formatting facade bound to a controller.
#[derive(Clone)]
pub struct Formatter {
    controller: Arc<LocaleController>,
}

impl Formatter {
    pub fn new(controller: Arc<LocaleController>) -> Self {
        Self { controller }
    }

    /// Format an amount in `currency`, or in the locale's default currency.
    pub fn format_currency(&self, amount: f64, currency: Option<Currency>) -> String {
        format_currency_with(amount, currency, &self.controller.current_locale())
    }

    pub fn format_number(&self, value: f64) -> String {
        format_number_with(value, &self.controller.current_locale())
    }

    pub fn format_date(&self, date: &NaiveDate) -> String {
        format_date_with(date, &self.controller.current_locale())
    }

    pub fn format_measurement(&self, measurement: &Measurement) -> String {
        format_measurement_with(measurement, &self.controller.current_locale())
    }
}

/// Format a number using the locale's default number style.
pub fn format_number_with(value: f64, config: &LocaleConfig) -> String {
    let options = &config.number_format;
    match options.style {
        NumberStyle::Percent => {
            let (negative, body) = default_digits(value * 100.0, options);
            format!("{}{}%", sign(negative), body)
        }
        NumberStyle::Decimal | NumberStyle::Currency => {
            let (negative, body) = default_digits(value, options);
            format!("{}{}", sign(negative), body)
        }
    }
}

/// Format an amount with the currency's minor units and the locale's
/// symbol placement (`$1,234.56`, `€ 1.234,56`).
pub fn format_currency_with(
    amount: f64,
    currency: Option<Currency>,
    config: &LocaleConfig,
) -> String {
    let options = &config.number_format;
    let currency = currency.unwrap_or(config.default_currency);
    let minor_units = currency.minor_units();
    let (negative, body) = digits(amount, options, minor_units, minor_units);
    let symbol = currency.symbol();

    match options.currency_placement {
        CurrencyPlacement::Prefix => format!("{}{}{}", sign(negative), symbol, body),
        CurrencyPlacement::PrefixSpaced => format!("{} {}{}", symbol, sign(negative), body),
        CurrencyPlacement::SuffixSpaced => format!("{}{} {}", sign(negative), body, symbol),
    }
}

pub fn format_date_with(date: &NaiveDate, config: &LocaleConfig) -> String {
    date.format(config.date_format).to_string()
}

/// `16 oz`, `453,59 g`
pub fn format_measurement_with(measurement: &Measurement, config: &LocaleConfig) -> String {
    let options = &config.number_format;
    let (negative, body) = default_digits(measurement.value, options);
    format!("{}{} {}", sign(negative), body, measurement.unit.symbol())
}

fn sign(negative: bool) -> &'static str {
    if negative {
        "-"
    } else {
        ""
    }
}

fn default_digits(value: f64, options: &NumberFormatOptions) -> (bool, String) {
    digits(
        value,
        options,
        options.min_fraction_digits,
        options.max_fraction_digits,
    )
}

/// Render `|value|` with grouping and `min..=max` fraction digits.
///
/// Returns whether a minus sign is needed; a value that rounds to zero is
/// never negative.
fn digits(value: f64, options: &NumberFormatOptions, min: u8, max: u8) -> (bool, String) {
    if value.is_nan() {
        return (false, "NaN".to_string());
    }
    if value.is_infinite() {
        return (value < 0.0, "∞".to_string());
    }

    let max = usize::from(max.max(min));
    let min = usize::from(min);
    let rounded = format!("{:.*}", max, value.abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut fraction = fraction.to_string();
    while fraction.len() > min && fraction.ends_with('0') {
        fraction.pop();
    }

    let negative = value < 0.0 && rounded.bytes().any(|b| b.is_ascii_digit() && b != b'0');

    let mut body = group(integer, options.grouping_separator);
    if !fraction.is_empty() {
        body.push(options.decimal_separator);
        body.push_str(&fraction);
    }
    (negative, body)
}

fn group(integer: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}
