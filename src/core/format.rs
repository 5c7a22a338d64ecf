//! British-English display formatting for tooltip values and table cells.
//!
//! Rounding is half away from zero on the decimal value, so `0.125` with two
//! fraction digits is `0.13`, matching browser locale formatting.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats `x` with thousands separators and between `min_fraction_digits`
/// and `max_fraction_digits` decimals.
#[must_use]
pub fn number(x: f64, min_fraction_digits: u32, max_fraction_digits: u32) -> String {
    match Decimal::from_f64(x) {
        Some(value) => format_decimal(value, min_fraction_digits, max_fraction_digits),
        None => non_finite(x),
    }
}

/// `12.5` -> `"12.5°C"`.
#[must_use]
pub fn celsius(x: f64, min_fraction_digits: u32, max_fraction_digits: u32) -> String {
    format!("{}°C", number(x, min_fraction_digits, max_fraction_digits))
}

/// Formats a ratio as a percentage: `0.175` -> `"17.5%"`.
#[must_use]
pub fn percent(x: f64, min_fraction_digits: u32, max_fraction_digits: u32) -> String {
    match Decimal::from_f64(x) {
        Some(value) => format!(
            "{}%",
            format_decimal(value * Decimal::ONE_HUNDRED, min_fraction_digits, max_fraction_digits)
        ),
        None => format!("{}%", non_finite(x)),
    }
}

/// Pounds sterling with the sign ahead of the symbol: `-3.5` -> `"-£3.5"`.
#[must_use]
pub fn gbp(x: f64, min_fraction_digits: u32, max_fraction_digits: u32) -> String {
    let formatted = number(x.abs(), min_fraction_digits, max_fraction_digits);
    if x.is_sign_negative() && formatted.chars().any(|ch| ch.is_ascii_digit() && ch != '0') {
        format!("-£{formatted}")
    } else {
        format!("£{formatted}")
    }
}

/// Upper-cases the first letter of every space-separated word.
#[must_use]
pub fn sentence_to_title_case(sentence: &str) -> String {
    sentence
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn non_finite(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_owned()
    } else if x.is_sign_negative() {
        "-∞".to_owned()
    } else {
        "∞".to_owned()
    }
}

fn format_decimal(value: Decimal, min_fraction_digits: u32, max_fraction_digits: u32) -> String {
    let max_fraction_digits = max_fraction_digits.max(min_fraction_digits);
    let mut rounded =
        value.round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    rounded = rounded.normalize();
    if rounded.scale() < min_fraction_digits {
        rounded.rescale(min_fraction_digits);
    }

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + integer.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(number(0.125, 0, 2), "0.13");
        assert_eq!(number(-0.125, 0, 2), "-0.13");
        assert_eq!(number(2.5, 0, 0), "3");
    }

    #[test]
    fn pads_to_minimum_fraction_digits() {
        assert_eq!(number(3.0, 2, 2), "3.00");
        assert_eq!(number(3.1, 0, 2), "3.1");
        assert_eq!(gbp(12.0, 0, 2), "£12");
        assert_eq!(gbp(-4.256, 0, 2), "-£4.26");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(number(1_234_567.891, 0, 1), "1,234,567.9");
        assert_eq!(number(999.0, 0, 1), "999");
    }

    #[test]
    fn unit_styles() {
        assert_eq!(percent(0.175, 0, 1), "17.5%");
        assert_eq!(percent(0.0, 0, 1), "0%");
        assert_eq!(celsius(14.236, 0, 2), "14.24°C");
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(sentence_to_title_case("median male pay"), "Median Male Pay");
        assert_eq!(sentence_to_title_case("proportion  female"), "Proportion  Female");
    }
}
