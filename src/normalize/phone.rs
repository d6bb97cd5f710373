use crate::normalize::map_type_tokens;
use crate::utils::error::{PhonebookError, Result};
use once_cell::sync::Lazy;
use phonenumber::{country, Mode};
use regex::Regex;

/// Region applied when a raw number carries no international prefix.
pub const DEFAULT_REGION: country::Id = country::DE;

/// Ordered substring patterns mapping free-text labels onto the canonical
/// phone type vocabulary. Order matters: the first matching pattern wins
/// per token.
static PHONE_TYPE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("text", "text"),
        ("fax", "fax"),
        ("cell|mobile", "cell"),
        ("voice", "voice"),
        ("video", "video"),
        ("pager", "pager"),
        ("home", "home"),
        ("work", "work"),
    ]
    .iter()
    .map(|(pattern, tag)| (Regex::new(pattern).expect("static pattern"), *tag))
    .collect()
});

/// Normalize a raw phone number into contiguous international format.
///
/// The number is parsed against the default region's dialing conventions;
/// an explicit `+<cc>` or `00<cc>` prefix in the input wins over the region.
/// The international rendering is collapsed by stripping every space so the
/// result is a single `+<countrycode><nationalnumber>` token.
///
/// Failure to parse is a per-record condition: callers skip the offending
/// record with a warning instead of aborting the run.
pub fn normalize_phone_number(raw: &str, region: country::Id) -> Result<String> {
    let parsed = phonenumber::parse(Some(region), raw).map_err(|e| PhonebookError::PhoneParse {
        number: raw.to_string(),
        reason: e.to_string(),
    })?;

    let formatted = parsed.format().mode(Mode::International).to_string();
    Ok(formatted.replace(' ', ""))
}

/// Classify a free-text phone type label into the canonical vocabulary
/// `text, fax, cell, voice, video, pager, home, work`.
pub fn normalize_phone_number_type(raw_type: &str) -> String {
    map_type_tokens(raw_type, &PHONE_TYPE_PATTERNS)
}
