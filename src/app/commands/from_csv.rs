//! `from:csv` - convert CSV rows into a vCard stream.

use crate::adapters::csv_source::rows_from_str;
use crate::core::builder::from_csv_row;
use crate::utils::error::{PhonebookError, Result};
use crate::utils::input::read_input;
use crate::vcard::card_from_record;
use phonenumber::country;
use std::io::Write;
use tracing::{info, warn};

/// Read CSV from `input`, build one card per row and write the cards to
/// `out`. Rows whose phone values cannot be parsed are skipped with a
/// warning; every other error aborts the run.
pub fn run(
    input: &str,
    delimiter: Option<u8>,
    region: country::Id,
    out: &mut dyn Write,
) -> Result<()> {
    let data = read_input(input)?;
    let rows = rows_from_str(&data, delimiter)?;

    let mut written = 0usize;
    for (index, row) in rows.iter().enumerate() {
        match from_csv_row(row, region) {
            Ok(record) => {
                out.write_all(card_from_record(&record).serialize().as_bytes())?;
                written += 1;
            }
            // Line number in the source file, counting the header.
            Err(err @ PhonebookError::PhoneParse { .. }) => {
                warn!("skipping line {}: {err}", index + 2);
            }
            Err(err) => return Err(err),
        }
    }

    info!("converted {written} of {} rows", rows.len());
    Ok(())
}
