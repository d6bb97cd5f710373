//! Field normalization: phone numbers and free-text type labels.

pub mod email;
pub mod phone;

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new("[^a-z0-9]+").expect("static pattern"));

/// Map a free-text type label onto canonical tags.
///
/// The label is lower-cased and split on runs of non-alphanumeric characters.
/// Each token is tested against the ordered pattern list; the first matching
/// pattern wins and contributes its tag, unmatched tokens are dropped.
/// Surviving tags keep token order (duplicates included) and are joined with
/// a comma. An empty result is a valid outcome, not an error.
pub(crate) fn map_type_tokens(raw_type: &str, patterns: &[(Regex, &'static str)]) -> String {
    let lowered = raw_type.to_lowercase();

    let mut tags = Vec::new();
    for token in TOKEN_SPLIT.split(&lowered) {
        if token.is_empty() {
            continue;
        }
        if let Some((_, tag)) = patterns.iter().find(|(pattern, _)| pattern.is_match(token)) {
            tags.push(*tag);
        }
    }

    tags.join(",")
}
