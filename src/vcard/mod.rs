//! Minimal vCard handling: content-line parsing, multi-card splitting and
//! version 4.0 serialization, plus the mapping between cards and the
//! canonical [`ContactRecord`].
//!
//! Only the properties the conversion needs are interpreted (FN, N, NOTE,
//! TEL, EMAIL); everything else is carried through untouched.

use crate::domain::model::{ContactRecord, EmailEntry, PhoneEntry};
use crate::utils::error::{PhonebookError, Result};

/// One vCard content line: `NAME;PARAM=VALUE:value`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub name: String,
    pub params: Vec<(String, String)>,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    pub fn with_param(
        mut self,
        param_name: impl Into<String>,
        param_value: impl Into<String>,
    ) -> Self {
        self.params.push((param_name.into(), param_value.into()));
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All TYPE tags of this property, joined with a comma. Collects both
    /// comma-separated multi-values and repeated TYPE parameters.
    pub fn types_joined(&self) -> String {
        self.params
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case("TYPE"))
            .flat_map(|(_, value)| value.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// True when any TYPE parameter carries the given tag (case-insensitive).
    pub fn has_type(&self, tag: &str) -> bool {
        self.params
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case("TYPE"))
            .flat_map(|(_, value)| value.split(','))
            .any(|t| t.trim().eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vcard {
    pub properties: Vec<Property>,
}

impl Vcard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> {
        self.properties
            .iter()
            .filter(move |p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn get_by_type(&self, name: &str, tag: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name) && p.has_type(tag))
    }

    /// Parse a single card. The declared input version is discarded; cards
    /// are always re-serialized as version 4.0.
    pub fn parse(text: &str) -> Result<Self> {
        let mut properties = Vec::new();
        let mut saw_begin = false;
        let mut saw_end = false;

        for line in unfold(text) {
            if line.trim().is_empty() {
                continue;
            }
            let upper = line.to_ascii_uppercase();

            if !saw_begin {
                if upper == "BEGIN:VCARD" {
                    saw_begin = true;
                    continue;
                }
                return Err(PhonebookError::vcard("missing BEGIN:VCARD"));
            }
            if saw_end {
                return Err(PhonebookError::vcard("content after END:VCARD"));
            }
            if upper == "END:VCARD" {
                saw_end = true;
                continue;
            }
            if upper.starts_with("VERSION:") {
                continue;
            }

            properties.push(parse_content_line(&line)?);
        }

        if !saw_begin {
            return Err(PhonebookError::vcard("missing BEGIN:VCARD"));
        }
        if !saw_end {
            return Err(PhonebookError::vcard("missing END:VCARD"));
        }

        Ok(Self { properties })
    }

    /// Split a stream into raw card blocks without parsing their bodies.
    pub fn split_raw(text: &str) -> Result<Vec<String>> {
        raw_blocks(text).collect()
    }

    /// Split and parse a whole multi-card document.
    pub fn split_stream(text: &str) -> Result<Vec<Self>> {
        Self::split_raw(text)?
            .iter()
            .map(|block| Self::parse(block))
            .collect()
    }

    /// Serialize as vCard 4.0. Parameters with empty values are omitted.
    pub fn serialize(&self) -> String {
        let mut out = String::from("BEGIN:VCARD\r\nVERSION:4.0\r\n");
        for prop in &self.properties {
            out.push_str(&prop.name);
            for (key, value) in &prop.params {
                if value.is_empty() {
                    continue;
                }
                out.push(';');
                out.push_str(key);
                out.push('=');
                if value.contains([';', ':']) {
                    out.push('"');
                    out.push_str(value);
                    out.push('"');
                } else {
                    out.push_str(value);
                }
            }
            out.push(':');
            out.push_str(&escape_value(&prop.value));
            out.push_str("\r\n");
        }
        out.push_str("END:VCARD\r\n");
        out
    }
}

/// Lazily split a stream into raw card blocks.
///
/// The iterator yields each complete `BEGIN:VCARD` .. `END:VCARD` block as
/// it is found, so callers can emit already-converted cards before a later
/// part of the stream turns out to be malformed. Non-blank content outside
/// a card and an unterminated final card both end the iteration with an
/// error item.
pub fn raw_blocks(text: &str) -> RawBlocks<'_> {
    RawBlocks {
        lines: text.lines(),
        done: false,
    }
}

pub struct RawBlocks<'a> {
    lines: std::str::Lines<'a>,
    done: bool,
}

impl Iterator for RawBlocks<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut current: Option<String> = None;
        for line in self.lines.by_ref() {
            let upper = line.trim_end().to_ascii_uppercase();
            match current.as_mut() {
                None => {
                    if upper == "BEGIN:VCARD" {
                        let mut block = String::new();
                        block.push_str(line);
                        block.push_str("\r\n");
                        current = Some(block);
                    } else if !line.trim().is_empty() {
                        self.done = true;
                        return Some(Err(PhonebookError::vcard(format!(
                            "unexpected content outside of a vCard: {line}"
                        ))));
                    }
                }
                Some(block) => {
                    block.push_str(line);
                    block.push_str("\r\n");
                    if upper == "END:VCARD" {
                        return current.take().map(Ok);
                    }
                }
            }
        }

        self.done = true;
        if current.is_some() {
            Some(Err(PhonebookError::vcard(
                "unterminated vCard, missing END:VCARD",
            )))
        } else {
            None
        }
    }
}

/// Build a vCard from a canonical record.
pub fn card_from_record(record: &ContactRecord) -> Vcard {
    let mut card = Vcard::new();
    card.push(Property::new("FN", record.full_name.clone()));

    if record.surname.is_some() || record.given_name.is_some() {
        card.push(Property::new(
            "N",
            format!(
                "{};{};;;",
                record.surname.clone().unwrap_or_default(),
                record.given_name.clone().unwrap_or_default()
            ),
        ));
    }

    if !record.note.is_empty() {
        card.push(Property::new("NOTE", record.note.clone()));
    }

    for phone in &record.phone_numbers {
        let mut prop = Property::new("TEL", phone.value.clone());
        if !phone.types.is_empty() {
            prop = prop.with_param("TYPE", phone.types.clone());
        }
        card.push(prop);
    }

    for email in &record.emails {
        let mut prop = Property::new("EMAIL", email.value.clone());
        if !email.types.is_empty() {
            prop = prop.with_param("TYPE", email.types.clone());
        }
        card.push(prop);
    }

    card
}

/// Extract the canonical record view of a card.
pub fn record_from_card(card: &Vcard) -> ContactRecord {
    let mut record = ContactRecord {
        full_name: card
            .get("FN")
            .map(|p| p.value.clone())
            .unwrap_or_default(),
        note: card.get("NOTE").map(|p| p.value.clone()).unwrap_or_default(),
        ..Default::default()
    };

    if let Some(n) = card.get("N") {
        let mut parts = n.value.split(';');
        record.surname = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
        record.given_name = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    }

    for prop in card.all("TEL") {
        record
            .phone_numbers
            .push(PhoneEntry::new(prop.value.clone(), prop.types_joined()));
    }
    for prop in card.all("EMAIL") {
        record
            .emails
            .push(EmailEntry::new(prop.value.clone(), prop.types_joined()));
    }

    record
}

/// Join continuation lines (leading space or tab) onto their parent line.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        if (raw.starts_with(' ') || raw.starts_with('\t')) && !lines.is_empty() {
            if let Some(last) = lines.last_mut() {
                last.push_str(&raw[1..]);
            }
        } else {
            lines.push(raw.to_string());
        }
    }
    lines
}

fn parse_content_line(line: &str) -> Result<Property> {
    let mut in_quotes = false;
    let mut colon = None;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                colon = Some(i);
                break;
            }
            _ => {}
        }
    }
    let colon =
        colon.ok_or_else(|| PhonebookError::vcard(format!("content line without ':': {line}")))?;

    let head = &line[..colon];
    let value = unescape_value(&line[colon + 1..]);

    let mut segments = split_respecting_quotes(head, ';');
    let name = segments.remove(0).to_ascii_uppercase();
    if name.is_empty() {
        return Err(PhonebookError::vcard(format!(
            "content line without a property name: {line}"
        )));
    }

    let mut params = Vec::new();
    for segment in segments {
        match segment.split_once('=') {
            Some((key, val)) => params.push((
                key.to_ascii_uppercase(),
                val.trim_matches('"').to_string(),
            )),
            // vCard 2.1 style bare parameter, e.g. TEL;HOME;VOICE:...
            None => params.push(("TYPE".to_string(), segment.to_ascii_lowercase())),
        }
    }

    Ok(Property {
        name,
        params,
        value,
    })
}

fn split_respecting_quotes(text: &str, separator: char) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut in_quotes = false;
    for ch in text.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == separator && !in_quotes => parts.push(String::new()),
            c => {
                if let Some(last) = parts.last_mut() {
                    last.push(c);
                }
            }
        }
    }
    parts
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            ',' => out.push_str("\\,"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_CARD: &str = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:John Doe\r\nTEL;TYPE=home,fax:+49123456789\r\nEMAIL;TYPE=work:john.doe@example.com\r\nNOTE:some note\r\nEND:VCARD\r\n";

    #[test]
    fn parses_properties_and_params() {
        let card = Vcard::parse(SIMPLE_CARD).unwrap();
        assert_eq!(card.get("FN").unwrap().value, "John Doe");
        assert_eq!(
            card.get_by_type("TEL", "home").unwrap().value,
            "+49123456789"
        );
        assert_eq!(
            card.get_by_type("TEL", "fax").unwrap().value,
            "+49123456789"
        );
        assert_eq!(
            card.get_by_type("EMAIL", "work").unwrap().value,
            "john.doe@example.com"
        );
    }

    #[test]
    fn typed_lookup_outlives_its_key_strings() {
        let card = Vcard::parse(SIMPLE_CARD).unwrap();
        let name = String::from("tel");
        let tag = String::from("fax");
        let found = card.get_by_type(&name, &tag);
        drop(name);
        drop(tag);
        assert_eq!(found.unwrap().value, "+49123456789");
    }

    #[test]
    fn parses_folded_lines() {
        let text = "BEGIN:VCARD\r\nNOTE:line one\r\n  and more\r\nEND:VCARD\r\n";
        let card = Vcard::parse(text).unwrap();
        assert_eq!(card.get("NOTE").unwrap().value, "line one and more");
    }

    #[test]
    fn parses_bare_v21_type_params() {
        let text = "BEGIN:VCARD\nTEL;HOME;VOICE:0123456789\nEND:VCARD\n";
        let card = Vcard::parse(text).unwrap();
        let tel = card.get("TEL").unwrap();
        assert!(tel.has_type("home"));
        assert!(tel.has_type("voice"));
    }

    #[test]
    fn serializes_as_version_four() {
        let card = Vcard::parse(SIMPLE_CARD).unwrap();
        let text = card.serialize();
        assert!(text.starts_with("BEGIN:VCARD\r\nVERSION:4.0\r\n"));
        assert!(text.ends_with("END:VCARD\r\n"));
        assert!(text.contains("TEL;TYPE=home,fax:+49123456789"));
    }

    #[test]
    fn serialization_round_trips() {
        let card = Vcard::parse(SIMPLE_CARD).unwrap();
        let reparsed = Vcard::parse(&card.serialize()).unwrap();
        assert_eq!(card, reparsed);
    }

    #[test]
    fn missing_terminator_is_an_error() {
        let err = Vcard::parse("BEGIN:VCARD\r\nFN:John\r\n").unwrap_err();
        assert!(matches!(err, PhonebookError::VcardParse { .. }));
    }

    #[test]
    fn split_raw_finds_every_card() {
        let stream = format!("{SIMPLE_CARD}{SIMPLE_CARD}");
        let blocks = Vcard::split_raw(&stream).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("BEGIN:VCARD"));
    }

    #[test]
    fn raw_blocks_yields_good_cards_before_the_error() {
        let stream = format!("{SIMPLE_CARD}garbage\r\n");
        let mut blocks = raw_blocks(&stream);
        assert!(blocks.next().unwrap().is_ok());
        assert!(blocks.next().unwrap().is_err());
        assert!(blocks.next().is_none());
    }

    #[test]
    fn split_raw_rejects_garbage_between_cards() {
        let stream = format!("{SIMPLE_CARD}not a card\r\n");
        assert!(Vcard::split_raw(&stream).is_err());
    }

    #[test]
    fn record_mapping_round_trips_values_and_types() {
        let record = ContactRecord {
            full_name: "John Doe".into(),
            phone_numbers: vec![PhoneEntry::new("+49123456789", "home,fax")],
            emails: vec![EmailEntry::new("john.doe@example.com", "work")],
            ..Default::default()
        };

        let card = card_from_record(&record);
        let reparsed = Vcard::parse(&card.serialize()).unwrap();
        let roundtrip = record_from_card(&reparsed);

        assert_eq!(roundtrip.full_name, "John Doe");
        assert_eq!(roundtrip.phone_numbers, record.phone_numbers);
        assert_eq!(roundtrip.emails, record.emails);
    }

    #[test]
    fn empty_full_name_stays_a_plain_string() {
        let record = record_from_card(&Vcard::new());
        assert_eq!(record.full_name, "");
    }

    #[test]
    fn name_components_are_split_from_n() {
        let text = "BEGIN:VCARD\r\nFN:John Doe\r\nN:Doe;John;;;\r\nEND:VCARD\r\n";
        let record = record_from_card(&Vcard::parse(text).unwrap());
        assert_eq!(record.surname.as_deref(), Some("Doe"));
        assert_eq!(record.given_name.as_deref(), Some("John"));
    }
}
