//! Literal classification for unquoted filter values.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::Value;

fn int_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("static regex"))
}

fn float_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+\.[0-9]+$").expect("static regex"))
}

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("static regex"))
}

/// Picks the most specific tag for an unquoted literal.
///
/// Order: `Int`, `Float`, `Date`, then `Str`. An integer too large for
/// `i64` or a date-shaped string that is not a real calendar day falls
/// through to `Str`.
pub fn parse_literal(text: &str) -> Value {
    if int_pattern().is_match(text) {
        if let Ok(i) = text.parse::<i64>() {
            return Value::Int(i);
        }
    } else if float_pattern().is_match(text) {
        if let Ok(f) = text.parse::<f64>() {
            return Value::Float(f);
        }
    } else if date_pattern().is_match(text) {
        if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Value::Date(d);
        }
    }
    Value::Str(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_literal() {
        assert_eq!(parse_literal("2000"), Value::Int(2000));
        assert_eq!(parse_literal("-3"), Value::Int(-3));
    }

    #[test]
    fn test_float_literal() {
        assert_eq!(parse_literal("2000.5"), Value::Float(2000.5));
        assert_eq!(parse_literal("8.0"), Value::Float(8.0));
    }

    #[test]
    fn test_date_literal() {
        assert_eq!(
            parse_literal("2020-01-31"),
            Value::Date(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap())
        );
    }

    #[test]
    fn test_invalid_date_is_string() {
        assert_eq!(parse_literal("2020-02-31"), Value::Str("2020-02-31".into()));
    }

    #[test]
    fn test_everything_else_is_string() {
        assert_eq!(parse_literal("action"), Value::Str("action".into()));
        assert_eq!(parse_literal("1.2.3"), Value::Str("1.2.3".into()));
        assert_eq!(
            parse_literal("99999999999999999999"),
            Value::Str("99999999999999999999".into())
        );
    }
}
