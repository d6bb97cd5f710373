//! Conjunctive card filtering.
//!
//! Each recognized filter option becomes one variant of a closed enum with
//! its own predicate; a [`FilterSet`] is the AND over every configured
//! filter. Predicates are pure, so evaluation order cannot change the
//! result.

use crate::vcard::Vcard;

#[derive(Debug, Clone, PartialEq)]
pub enum CardFilter {
    /// Passes when any of the listed substrings occurs in the card's note.
    /// A list holding only empty values is treated as unset.
    Note(Vec<String>),
    /// Passes when the card has at least one TEL property.
    HasTelephone,
}

impl CardFilter {
    pub fn matches(&self, card: &Vcard) -> bool {
        match self {
            Self::Note(values) => {
                let needles: Vec<&str> = values
                    .iter()
                    .map(String::as_str)
                    .filter(|v| !v.is_empty())
                    .collect();
                if needles.is_empty() {
                    return true;
                }
                let note = card.get("NOTE").map(|p| p.value.as_str()).unwrap_or("");
                needles.iter().any(|needle| note.contains(needle))
            }
            Self::HasTelephone => card.all("TEL").next().is_some(),
        }
    }
}

/// The configured set of filters for one run. An empty set passes
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<CardFilter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        if !notes.is_empty() {
            self.filters.push(CardFilter::Note(notes));
        }
        self
    }

    pub fn with_has_telephone(mut self, enabled: bool) -> Self {
        if enabled {
            self.filters.push(CardFilter::HasTelephone);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn matches(&self, card: &Vcard) -> bool {
        self.filters.iter().all(|filter| filter.matches(card))
    }
}
