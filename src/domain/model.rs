use serde::{Deserialize, Serialize};

/// Canonical in-memory contact representation.
///
/// `full_name` is always a plain string: an absent name yields an empty
/// string, never an omission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneEntry>,
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
}

/// A normalized phone number with its comma-joined canonical type tags.
///
/// An entry only exists when the raw value was non-empty and parsed; `types`
/// is an empty string when no recognized tag applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub value: String,
    #[serde(default)]
    pub types: String,
}

impl PhoneEntry {
    pub fn new(value: impl Into<String>, types: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            types: types.into(),
        }
    }

    /// First canonical tag, for consumers limited to a single type per
    /// number (the AVM schema). Empty when the entry carries no tag.
    pub fn first_type(&self) -> &str {
        self.types.split(',').next().unwrap_or("")
    }
}

/// A syntactically validated email address with its canonical type tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub value: String,
    #[serde(default)]
    pub types: String,
}

impl EmailEntry {
    pub fn new(value: impl Into<String>, types: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            types: types.into(),
        }
    }
}

/// Unnormalized contact item as delivered by a directory source (EWS,
/// CardDAV). Name and note fields are copied verbatim into the canonical
/// record; phone entries still carry their source labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawContact {
    pub display_name: String,
    pub surname: String,
    pub given_name: String,
    pub notes: String,
    pub phone_entries: Vec<RawPhoneEntry>,
}

/// One slot of a source phone dictionary: value plus free-text type label.
/// The source format allows empty slots, which are skipped silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPhoneEntry {
    pub raw_value: String,
    pub raw_type_label: String,
}

impl RawPhoneEntry {
    pub fn new(raw_value: impl Into<String>, raw_type_label: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
            raw_type_label: raw_type_label.into(),
        }
    }
}
