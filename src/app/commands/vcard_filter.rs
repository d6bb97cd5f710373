//! `vcard:filter` - pass matching cards through, drop the rest.

use crate::core::filter::FilterSet;
use crate::utils::error::Result;
use crate::utils::input::read_input;
use crate::vcard::{raw_blocks, Vcard};
use std::io::Write;
use tracing::info;

/// Stream cards through the filter set. Cards are written as they pass, so
/// a malformed block later in the stream aborts the run but leaves the
/// already-written output intact.
pub fn run(input: &str, filters: &FilterSet, out: &mut dyn Write) -> Result<()> {
    let data = read_input(input)?;

    let mut seen = 0usize;
    let mut kept = 0usize;
    for block in raw_blocks(&data) {
        seen += 1;
        let card = Vcard::parse(&block?)?;
        if filters.matches(&card) {
            out.write_all(card.serialize().as_bytes())?;
            kept += 1;
        }
    }

    info!("kept {kept} of {seen} cards");
    Ok(())
}
