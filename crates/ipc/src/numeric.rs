//! Loosely-typed numeric input coming from form fields.
//!
//! Sliders and text boxes hand over numbers, numeric strings ("45", "1.5x"),
//! empty strings, or nothing at all. [`LooseNumber`] accepts all of them and
//! resolves to `Option<f32>` with the same leading-prefix rule browsers use
//! for `parseFloat`.

use serde::{Deserialize, Serialize};

/// A number as received from the UI, not yet validated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl LooseNumber {
    /// Resolve to a finite value, or `None` when absent or non-numeric.
    pub fn value(&self) -> Option<f32> {
        let parsed = match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => parse_float_prefix(s),
            LooseNumber::Missing => None,
        }?;
        let value = parsed as f32;
        value.is_finite().then_some(value)
    }

    /// Resolve, substituting `default` for anything unusable.
    pub fn value_or(&self, default: f32) -> f32 {
        self.value().unwrap_or(default)
    }
}

impl From<f32> for LooseNumber {
    fn from(value: f32) -> Self {
        LooseNumber::Number(value as f64)
    }
}

impl From<&str> for LooseNumber {
    fn from(value: &str) -> Self {
        LooseNumber::Text(value.to_string())
    }
}

/// Parse the longest leading decimal literal of `s` (after leading whitespace).
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent. Trailing garbage is ignored; no digits at all yields `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let bytes = s.trim_start().as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    std::str::from_utf8(&bytes[..end]).ok()?.parse().ok()
}
