use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::numeric::parse_float_prefix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedAmount {
    pub value: f64,
    pub unit: String,
}

fn fraction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)/([0-9]+)\s*(.*)$").expect("fraction pattern is valid"))
}

fn decimal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9.]+)\s*(.*)$").expect("decimal pattern is valid"))
}

/// Splits a free-text amount such as `"200г"` or `"1/2 шт"` into a number and a unit.
///
/// Only a leading numeric token is consumed. Text without one counts as a
/// single unit named by the whole string, and a missing amount is one unit of
/// nothing (`{1, ""}`).
pub fn parse_amount(raw: Option<&str>) -> ParsedAmount {
    let Some(raw) = raw else {
        return ParsedAmount { value: 1.0, unit: String::new() };
    };
    let trimmed = raw.trim();

    if let Some(caps) = fraction_regex().captures(trimmed) {
        let numerator = digits_to_f64(&caps[1]);
        let denominator = digits_to_f64(&caps[2]);
        return ParsedAmount {
            value: numerator / denominator,
            unit: caps[3].trim().to_string(),
        };
    }

    if let Some(caps) = decimal_regex().captures(trimmed) {
        // A token made only of dots carries no number; treat it like plain text.
        if let Some(value) = parse_float_prefix(&caps[1]) {
            return ParsedAmount {
                value,
                unit: caps[2].trim().to_string(),
            };
        }
    }

    ParsedAmount { value: 1.0, unit: trimmed.to_string() }
}

// Digit runs of any length; very long ones saturate to infinity like a float would.
fn digits_to_f64(digits: &str) -> f64 {
    digits.parse::<f64>().unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(value: f64, unit: &str) -> ParsedAmount {
        ParsedAmount { value, unit: unit.to_string() }
    }

    #[test]
    fn test_fraction() {
        assert_eq!(parse_amount(Some("1/2 шт")), amount(0.5, "шт"));
        assert_eq!(parse_amount(Some("3/4стакана")), amount(0.75, "стакана"));
        assert_eq!(parse_amount(Some(" 1/3 ")), amount(1.0 / 3.0, ""));
    }

    #[test]
    fn test_fraction_zero_denominator_is_plain_division() {
        assert_eq!(parse_amount(Some("1/0 шт")).value, f64::INFINITY);
        assert!(parse_amount(Some("0/0")).value.is_nan());
    }

    #[test]
    fn test_decimal() {
        assert_eq!(parse_amount(Some("200г")), amount(200.0, "г"));
        assert_eq!(parse_amount(Some("1.5 кг")), amount(1.5, "кг"));
        assert_eq!(parse_amount(Some("2")), amount(2.0, ""));
        assert_eq!(parse_amount(Some("1.5.2кг")), amount(1.5, "кг"));
    }

    #[test]
    fn test_only_first_numeric_token_is_consumed() {
        assert_eq!(parse_amount(Some("2 по 100 г")), amount(2.0, "по 100 г"));
    }

    #[test]
    fn test_text_without_number() {
        assert_eq!(parse_amount(Some("щепотка")), amount(1.0, "щепотка"));
        assert_eq!(parse_amount(Some("  по вкусу ")), amount(1.0, "по вкусу"));
        assert_eq!(parse_amount(Some("... г")), amount(1.0, "... г"));
        assert_eq!(parse_amount(Some("")), amount(1.0, ""));
    }

    #[test]
    fn test_missing() {
        assert_eq!(parse_amount(None), amount(1.0, ""));
    }

    #[test]
    fn test_mixed_number_is_not_a_fraction() {
        // "1 1/2" starts with a plain number, the rest is unit text.
        assert_eq!(parse_amount(Some("1 1/2 стакана")), amount(1.0, "1/2 стакана"));
    }
}
