//! Contact format conversion library.
//!
//! Pulls contacts out of CSV files, CardDAV addressbooks and Exchange Web
//! Services, normalizes phone numbers and type labels into a canonical
//! record, and writes vCard 4.0 streams or AVM phonebook XML.

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod normalize;
pub mod utils;
pub mod vcard;

pub use domain::model::{ContactRecord, EmailEntry, PhoneEntry, RawContact, RawPhoneEntry};
pub use utils::error::{PhonebookError, Result};
