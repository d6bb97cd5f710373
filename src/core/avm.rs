//! AVM phonebook output: entity tree and XML emission.
//!
//! The tree mirrors the fixed external schema
//! `phonebooks > phonebook > contact > {person > realName, telephony >
//! number}`. It is built fresh per conversion run in one pass over the input
//! and serialized once; AVM is an output-only dialect here.

use crate::domain::model::ContactRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Phonebooks {
    pub phonebook: Phonebook,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Phonebook {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    pub person: Person,
    pub telephony: Vec<Number>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub real_name: String,
}

/// A phone number slot. The schema allows a single type per number, so
/// multi-tag entries from the canonical model arrive truncated to their
/// first tag; the mapping is lossy by design.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Number {
    pub value: String,
    pub number_type: String,
    pub prio: Option<String>,
    pub quickdial: Option<String>,
    pub vanity: Option<String>,
}

impl Number {
    pub fn new(value: impl Into<String>, number_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            number_type: number_type.into(),
            ..Default::default()
        }
    }
}

/// Map canonical records into the phonebook tree, preserving input order.
/// No deduplication or merging happens across records.
pub fn map_contacts(records: &[ContactRecord]) -> Phonebooks {
    let contacts = records
        .iter()
        .map(|record| Contact {
            person: Person {
                real_name: record.full_name.clone(),
            },
            telephony: record
                .phone_numbers
                .iter()
                .map(|phone| Number::new(&phone.value, phone.first_type()))
                .collect(),
        })
        .collect();

    Phonebooks {
        phonebook: Phonebook { contacts },
    }
}

/// Serialize the tree as AVM phonebook XML.
pub fn to_xml(phonebooks: &Phonebooks) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<phonebooks>\n  <phonebook>\n");

    for contact in &phonebooks.phonebook.contacts {
        out.push_str("    <contact>\n      <person>\n        <realName>");
        push_escaped(&mut out, &contact.person.real_name);
        out.push_str("</realName>\n      </person>\n");

        if !contact.telephony.is_empty() {
            out.push_str("      <telephony>\n");
            for number in &contact.telephony {
                out.push_str("        <number");
                push_attribute(&mut out, "type", Some(&number.number_type));
                push_attribute(&mut out, "prio", number.prio.as_deref());
                push_attribute(&mut out, "quickdial", number.quickdial.as_deref());
                push_attribute(&mut out, "vanity", number.vanity.as_deref());
                out.push('>');
                push_escaped(&mut out, &number.value);
                out.push_str("</number>\n");
            }
            out.push_str("      </telephony>\n");
        }

        out.push_str("    </contact>\n");
    }

    out.push_str("  </phonebook>\n</phonebooks>\n");
    out
}

fn push_attribute(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        push_escaped(out, value);
        out.push('"');
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}
