//! Build canonical contact records out of semi-structured source data.

use crate::domain::model::{ContactRecord, EmailEntry, PhoneEntry, RawContact};
use crate::normalize::email::{is_valid_email, normalize_email_type};
use crate::normalize::phone::{normalize_phone_number, normalize_phone_number_type};
use crate::utils::error::Result;
use once_cell::sync::Lazy;
use phonenumber::country;
use regex::Regex;

/// A value containing whitespace, a digit, `+` or parentheses is routed to
/// phone parsing. This is a routing test, not validation.
static PHONE_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\d+()]").expect("static pattern"));

/// Build a record from one CSV row (ordered field name / value pairs).
///
/// Per value, in fixed priority order: phone-looking values are normalized
/// with the field name as type label, then syntactically valid email
/// addresses, everything else accumulates into the display name in column
/// order. A phone parse failure fails the whole row; the caller decides to
/// skip it.
pub fn from_csv_row(row: &[(String, String)], region: country::Id) -> Result<ContactRecord> {
    let mut record = ContactRecord::default();

    for (field, value) in row {
        if PHONE_CANDIDATE.is_match(value) {
            record.phone_numbers.push(PhoneEntry::new(
                normalize_phone_number(value, region)?,
                normalize_phone_number_type(field),
            ));
            continue;
        }

        if is_valid_email(value) {
            record
                .emails
                .push(EmailEntry::new(value.clone(), normalize_email_type(field)));
            continue;
        }

        record.full_name = format!("{} {}", record.full_name, value).trim().to_string();
    }

    Ok(record)
}

/// Build a record from a structured directory item (EWS, CardDAV).
///
/// Name and note fields are copied verbatim. Phone entries with an empty raw
/// value are skipped silently (the source allows optional slots); an
/// unparsable non-empty value fails the whole item so the caller can warn
/// and move on.
pub fn from_raw_contact(raw: &RawContact, region: country::Id) -> Result<ContactRecord> {
    let mut record = ContactRecord {
        full_name: raw.display_name.clone(),
        surname: some_if_not_empty(&raw.surname),
        given_name: some_if_not_empty(&raw.given_name),
        note: raw.notes.clone(),
        ..Default::default()
    };

    for entry in &raw.phone_entries {
        if entry.raw_value.is_empty() {
            continue;
        }
        record.phone_numbers.push(PhoneEntry::new(
            normalize_phone_number(&entry.raw_value, region)?,
            normalize_phone_number_type(&entry.raw_type_label),
        ));
    }

    Ok(record)
}

fn some_if_not_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
