// Adapters layer: concrete implementations for external systems (CSV input,
// CardDAV and EWS directory servers).

pub mod carddav;
pub mod csv_source;
pub mod ews;
