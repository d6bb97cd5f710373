pub mod from_carddav;
pub mod from_csv;
pub mod from_ews;
pub mod to_avm;
pub mod vcard_filter;
