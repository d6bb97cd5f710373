//! `to:avm` - render a vCard stream as AVM phonebook XML.

use crate::core::avm::{map_contacts, to_xml};
use crate::domain::model::ContactRecord;
use crate::utils::error::Result;
use crate::utils::input::read_input;
use crate::vcard::{record_from_card, Vcard};
use std::io::Write;
use tracing::info;

/// Read the whole card stream, map every card into the phonebook tree and
/// emit the document in one piece. Any malformed card aborts before output
/// is written.
pub fn run(input: &str, out: &mut dyn Write) -> Result<()> {
    let data = read_input(input)?;
    let cards = Vcard::split_stream(&data)?;

    let records: Vec<ContactRecord> = cards.iter().map(record_from_card).collect();
    let tree = map_contacts(&records);
    out.write_all(to_xml(&tree).as_bytes())?;

    info!("mapped {} cards", records.len());
    Ok(())
}
