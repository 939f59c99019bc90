//! Numeric formatting for wire transmission and display
//!
//! Wire values are fixed-precision decimal strings. Rounding is applied
//! half-away-from-zero to the shortest decimal form of the value, so the
//! output never depends on binary representation noise and never uses
//! scientific notation.

use serde_json::Value;
use tracing::debug;

use crate::{Result, RiskMapError};

/// Fractional digits used for latitude/longitude on the wire
pub const COORDINATE_PRECISION: usize = 6;

/// Fractional digits used for meteorological fields on the wire
pub const MEASUREMENT_PRECISION: usize = 2;

/// Something that can be read as a raw number: a number or a numeric string
pub trait NumericInput {
    /// The parsed value, or `None` when the input is not numeric
    fn to_number(&self) -> Option<f64>;
}

impl NumericInput for f64 {
    fn to_number(&self) -> Option<f64> {
        Some(*self)
    }
}

impl NumericInput for f32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for i32 {
    fn to_number(&self) -> Option<f64> {
        Some(f64::from(*self))
    }
}

impl NumericInput for str {
    fn to_number(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()
    }
}

impl NumericInput for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

impl<T: NumericInput + ?Sized> NumericInput for &T {
    fn to_number(&self) -> Option<f64> {
        (**self).to_number()
    }
}

/// Format `value` with exactly `precision` fractional digits
pub fn to_fixed_string(value: f64, precision: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(RiskMapError::invalid_numeric(format!(
            "cannot format non-finite value {value}"
        )));
    }
    Ok(round_half_away(&value.to_string(), precision))
}

/// Like [`to_fixed_string`], with negative inputs clamped to zero first.
///
/// Loss amounts and casualty counts are never negative in output.
pub fn to_fixed_non_negative(value: f64, precision: usize) -> Result<String> {
    to_fixed_string(clamp_non_negative(value), precision)
}

/// Parse a fixed-precision decimal string back into a finite number
pub fn parse_fixed_string(value: &str) -> Result<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| RiskMapError::invalid_numeric(format!("'{value}' is not a number")))?;

    if !parsed.is_finite() {
        return Err(RiskMapError::invalid_numeric(format!(
            "'{value}' is not a finite number"
        )));
    }
    Ok(parsed)
}

/// Format an amount as whole US dollars, e.g. `$2,500,000`.
///
/// Never fails and never returns a blank string: negative amounts show as
/// `$0`, and so does non-finite input (logged at debug level).
#[must_use]
pub fn format_currency(amount: f64) -> String {
    match to_fixed_non_negative(amount, 0) {
        Ok(dollars) => format!("${}", group_thousands(&dollars)),
        Err(_) => {
            debug!(amount, "Invalid infrastructure loss value, displaying $0");
            "$0".to_string()
        }
    }
}

/// Format a count with thousands separators, e.g. `12,345`
#[must_use]
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

/// Read a JSON number or numeric string; anything else (or non-finite) is `None`
#[must_use]
pub fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.to_number(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

fn clamp_non_negative(value: f64) -> f64 {
    // NaN passes through so formatting still rejects it
    if value < 0.0 { 0.0 } else { value }
}

/// Round a plain decimal string (as produced by `f64`'s `Display`) to
/// `precision` fractional digits, half away from zero.
fn round_half_away(repr: &str, precision: usize) -> String {
    let (negative, magnitude) = match repr.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, repr),
    };
    let (whole, fraction) = magnitude.split_once('.').unwrap_or((magnitude, ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(
            fraction
                .bytes()
                .chain(std::iter::repeat(b'0'))
                .take(precision),
        )
        .map(|b| b - b'0')
        .collect();
    let mut whole_len = whole.len();

    let round_up = fraction
        .as_bytes()
        .get(precision)
        .is_some_and(|&next| next >= b'5');

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            whole_len += 1;
        }
    }

    let is_zero = digits.iter().all(|&digit| digit == 0);
    let mut out = String::with_capacity(digits.len() + 2);
    if negative && !is_zero {
        out.push('-');
    }
    for (index, digit) in digits.iter().enumerate() {
        if index == whole_len {
            out.push('.');
        }
        out.push(char::from(b'0' + digit));
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
