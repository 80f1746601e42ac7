/// Parses the leading integer of a string the way a browser's `parseInt` does:
/// leading whitespace is skipped, an optional sign is accepted and parsing
/// stops at the first non-digit.
///
/// Returns `None` when no digit follows the optional sign.
///
/// # Arguments
///
/// * `text` - The text to parse
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    // Saturate instead of failing on absurdly long digit runs.
    let value = rest[..digits_end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Parses a count, keeping only its digits ("1,234" -> 1234).
///
/// Returns 0 when no digit is present.
#[cfg_attr(not(feature = "scholar"), allow(dead_code))]
pub fn parse_digits(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Formats a number for CSS output, dropping a trailing `.0`.
///
/// Values are rounded to two decimals, so `40.0` becomes `40` and
/// `46.666…` becomes `46.67`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Formats a paper count with its noun: "1 paper", "3 papers".
pub fn paper_count(count: u32) -> String {
    if count == 1 {
        "1 paper".to_string()
    } else {
        format!("{} papers", count)
    }
}

/// Share of `value` against `max` as a percentage, 0 when `max` is 0.
pub fn percent_of(value: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        f64::from(value) * 100.0 / f64::from(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("2019", Some(2019))]
    #[case("  42 citations", Some(42))]
    #[case("-7", Some(-7))]
    #[case("+3", Some(3))]
    #[case("12.9", Some(12))]
    #[case("", None)]
    #[case("abc", None)]
    #[case("-", None)]
    #[case("NaN", None)]
    fn test_parse_int_prefix(#[case] input: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_int_prefix(input), expected);
    }

    #[test]
    fn test_parse_int_prefix_overflow_saturates() {
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[rstest]
    #[case("1,234", 1234)]
    #[case("2021", 2021)]
    #[case("", 0)]
    #[case("n/a", 0)]
    fn test_parse_digits(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_digits(input), expected);
    }

    #[rstest]
    #[case(40.0, "40")]
    #[case(100.0, "100")]
    #[case(0.0, "0")]
    #[case(46.666_666, "46.67")]
    #[case(12.5, "12.5")]
    #[case(f64::NAN, "0")]
    fn test_format_number(#[case] input: f64, #[case] expected: &str) {
        assert_eq!(format_number(input), expected);
    }

    #[test]
    fn test_paper_count() {
        assert_eq!(paper_count(0), "0 papers");
        assert_eq!(paper_count(1), "1 paper");
        assert_eq!(paper_count(7), "7 papers");
    }

    #[test]
    fn test_percent_of_zero_max() {
        assert_eq!(percent_of(0, 0), 0.0);
        assert_eq!(percent_of(2, 5), 40.0);
        assert_eq!(percent_of(5, 5), 100.0);
    }
}
