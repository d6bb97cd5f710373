use crate::normalize::map_type_tokens;
use once_cell::sync::Lazy;
use regex::Regex;

/// Email type labels only know the `home` and `work` tags.
static EMAIL_TYPE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [("home", "home"), ("work", "work")]
        .iter()
        .map(|(pattern, tag)| (Regex::new(pattern).expect("static pattern"), *tag))
        .collect()
});

// HTML5 address pattern; close enough to the standard validity check the
// original relied on for routing CSV values.
static EMAIL_SYNTAX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("static pattern")
});

/// Classify a free-text email type label into `home` / `work`.
pub fn normalize_email_type(raw_type: &str) -> String {
    map_type_tokens(raw_type, &EMAIL_TYPE_PATTERNS)
}

/// Syntactic address check. A negative result is a classification outcome
/// (the value is treated as name material), never an error.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_SYNTAX.is_match(value)
}
