use regex::Regex;
use std::sync::OnceLock;

fn float_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("float prefix pattern is valid")
    })
}

/// Parses the longest numeric prefix of `input`, ignoring leading whitespace.
///
/// Mirrors what a form field does with free text: `"12.5 mg"` is 12.5,
/// `"1.5.2"` is 1.5, and `"abc"` or `""` have no value at all.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let matched = float_prefix_regex().find(trimmed)?.as_str();
    let unsigned = matched.trim_start_matches(['+', '-']);
    let magnitude = if unsigned == "Infinity" {
        f64::INFINITY
    } else {
        unsigned.parse::<f64>().ok()?
    };
    if matched.starts_with('-') {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  12.5 mg"), Some(12.5));
        assert_eq!(parse_float_prefix("1.5.2"), Some(1.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("-3e2x"), Some(-300.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
    }

    #[test]
    fn test_parse_float_prefix_without_digits() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("..."), None);
        assert_eq!(parse_float_prefix("-"), None);
    }
}
