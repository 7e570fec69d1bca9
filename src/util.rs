use once_cell::sync::Lazy;
use regex::Regex;

static REGEX_LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<int>[+-]?\d+)").unwrap());

/// Leading-integer parse: `" 12px"` is 12, `"px"` is `None`.
pub fn parse_int(value: &str) -> Option<i64> {
    REGEX_LEADING_INT
        .captures(value)
        .and_then(|captures| captures.name("int"))
        .and_then(|int_match| int_match.as_str().parse::<i64>().ok())
}

/// Like `parse_int`, restricted to values above zero.
pub fn parse_positive(value: &str) -> Option<usize> {
    parse_int(value)
        .filter(|int| *int > 0)
        .and_then(|int| usize::try_from(int).ok())
}
