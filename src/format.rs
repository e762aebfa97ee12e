//! Currency and percentage formatting
//!
//! The locale is fixed to en-US whatever currency is selected; only the
//! currency sign changes.

use crate::constants::{MAX_FRACTION_DIGITS, MIN_FRACTION_DIGITS};
use crate::types::Currency;

/// Formats a value as an en-US currency string
///
/// Uses between [`MIN_FRACTION_DIGITS`] and [`MAX_FRACTION_DIGITS`] fraction
/// digits, so sub-cent prices keep their significant digits while ordinary
/// prices show two decimals.
///
/// ```
/// use coin_tracker::{format::format_currency, Currency};
///
/// assert_eq!(format_currency(45000.5, Currency::Usd), "$45,000.50");
/// assert_eq!(format_currency(0.0000012, Currency::Usd), "$0.000001");
/// ```
pub fn format_currency(value: f64, currency: Currency) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let prefix = currency.prefix();

    if value.is_nan() {
        return format!("{}NaN", prefix);
    }
    if value.is_infinite() {
        return format!("{}{}∞", sign, prefix);
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut fraction = fraction.to_string();
    while fraction.len() > MIN_FRACTION_DIGITS && fraction.ends_with('0') {
        fraction.pop();
    }

    format!("{}{}{}.{}", sign, prefix, group_thousands(integer), fraction)
}

/// Formats a percentage change as its absolute value with two decimals
///
/// The direction is carried separately (see [`crate::card::PriceDirection`]).
pub fn format_percent_change(change: f64) -> String {
    format!("{:.2}%", change.abs())
}

/// Inserts `,` between groups of three integer digits
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
