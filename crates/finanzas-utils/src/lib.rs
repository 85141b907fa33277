//! Utility functions and helpers

use serde::{Deserialize, Serialize};

/// Number display settings used by text reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub symbol: String,
    pub decimal_places: u32,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimal_places: 0,
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        }
    }
}

/// Group a run of ASCII digits with a thousands separator
pub fn group_digits(digits: &str, separator: &str) -> String {
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    result.chars().rev().collect()
}

/// Format an amount as `$ 1.234,56` according to `fmt`
pub fn format_amount(value: f64, fmt: &NumberFormat) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let rendered = format!("{:.*}", fmt.decimal_places as usize, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    // "-0" is not worth printing
    let negative = value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');

    let mut out = String::new();
    if !fmt.symbol.is_empty() {
        out.push_str(&fmt.symbol);
        out.push(' ');
    }
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, &fmt.thousands_separator));
    if let Some(frac) = frac_part {
        out.push_str(&fmt.decimal_separator);
        out.push_str(frac);
    }
    out
}

/// Format a percentage with a fixed number of decimals, e.g. `12.5%`
pub fn format_percent(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.*}%", decimals, value)
}
