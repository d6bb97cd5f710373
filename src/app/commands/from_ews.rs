//! `from:ews` - export an Exchange contacts folder as a vCard stream.

use crate::core::builder::from_raw_contact;
use crate::domain::ports::ContactSource;
use crate::utils::error::{PhonebookError, Result};
use crate::vcard::card_from_record;
use phonenumber::country;
use std::io::Write;
use tracing::{info, warn};

/// Fetch the directory items and write one card per contact. A contact with
/// an unparsable phone number is skipped with a warning; transport and
/// server errors abort.
pub async fn run(
    source: &dyn ContactSource,
    region: country::Id,
    out: &mut dyn Write,
) -> Result<()> {
    let contacts = source.fetch().await?;

    let mut written = 0usize;
    for contact in &contacts {
        match from_raw_contact(contact, region) {
            Ok(record) => {
                out.write_all(card_from_record(&record).serialize().as_bytes())?;
                written += 1;
            }
            Err(err @ PhonebookError::PhoneParse { .. }) => {
                warn!("skipping {:?}: {err}", contact.display_name);
            }
            Err(err) => return Err(err),
        }
    }

    info!("wrote {written} of {} contacts", contacts.len());
    Ok(())
}
