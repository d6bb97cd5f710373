//! End-to-end checks for the vCard consuming subcommands: filtering a card
//! stream and rendering it as AVM phonebook XML.

use phonebook_cli::app::commands::{to_avm, vcard_filter};
use phonebook_cli::core::filter::FilterSet;
use phonebook_cli::utils::error::PhonebookError;
use std::io::Write;
use tempfile::NamedTempFile;

const STREAM: &str = "BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
FN:John Doe\r\n\
NOTE:synced\r\n\
TEL;TYPE=home,fax:+49123456789\r\n\
END:VCARD\r\n\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
FN:Jane Roe\r\n\
END:VCARD\r\n";

fn vcf_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[test]
fn renders_the_avm_phonebook_document() {
    let file = vcf_file(STREAM);

    let mut out = Vec::new();
    to_avm::run(file.path().to_str().unwrap(), &mut out).unwrap();

    let xml = String::from_utf8(out).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(xml.contains("<realName>John Doe</realName>"));
    assert!(xml.contains("<number type=\"home\">+49123456789</number>"));
    // A contact without numbers gets no telephony block.
    assert!(xml.contains("<realName>Jane Roe</realName>"));
    assert_eq!(xml.matches("<telephony>").count(), 1);
}

#[test]
fn filter_chain_keeps_only_matching_cards() {
    let file = vcf_file(STREAM);
    let filters = FilterSet::new()
        .with_notes(vec!["synced".into()])
        .with_has_telephone(true);

    let mut out = Vec::new();
    vcard_filter::run(file.path().to_str().unwrap(), &filters, &mut out).unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.matches("BEGIN:VCARD").count(), 1);
    assert!(output.contains("FN:John Doe"));
    assert!(output.contains("VERSION:4.0"));
}

#[test]
fn filtered_output_survives_a_malformed_tail() {
    let file = vcf_file(&format!("{STREAM}BEGIN:VCARD\r\nFN:cut off\r\n"));

    let mut out = Vec::new();
    let err = vcard_filter::run(file.path().to_str().unwrap(), &FilterSet::new(), &mut out)
        .unwrap_err();

    assert!(matches!(err, PhonebookError::VcardParse { .. }));
    assert_eq!(err.exit_code(), 2);

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("FN:John Doe"));
    assert!(output.contains("FN:Jane Roe"));
}
