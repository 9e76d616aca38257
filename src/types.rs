use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Canonical attribute names used after normalization.
pub mod attr {
    pub const DEROG_ID: &str = "derog_id";
    pub const TRAVELER_ID: &str = "traveler_id";
    pub const FIRST_NAME: &str = "first_name";
    pub const MIDDLE_NAME: &str = "middle_name";
    pub const LAST_NAME: &str = "last_name";
    pub const GENDER_CODE: &str = "gender_code";
    pub const CITIZENSHIP_COUNTRY_CODE: &str = "citizenship_country_code";
    pub const DOCUMENT_COUNTRY_CODE: &str = "document_country_code";
    pub const DOCUMENT_TYPE: &str = "document_type";
    pub const DOCUMENT_ID: &str = "document_id";
    pub const DOB_DATE: &str = "dob_date";
    pub const FULL_NAME: &str = "full_name";
    pub const PHONETIC_CODE: &str = "phonetic_code";
    pub const WATCH_LIST_NAME: &str = "watch_list_name";

    /// Name parts combined into `full_name` and `phonetic_code`, in order.
    pub const NAME_PARTS: [&str; 3] = [FIRST_NAME, MIDDLE_NAME, LAST_NAME];
}

/// Which batch a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    WatchList,
    Traveler,
}

impl RecordKind {
    /// Identity attribute carried by records of this kind
    pub fn identity_attribute(&self) -> &'static str {
        match self {
            RecordKind::WatchList => attr::DEROG_ID,
            RecordKind::Traveler => attr::TRAVELER_ID,
        }
    }
}

/// A watch-list entry or traveler query, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord(BTreeMap<String, String>);

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    /// Value of `attribute`, or the empty string when absent.
    pub fn value(&self, attribute: &str) -> &str {
        self.get(attribute).unwrap_or("")
    }

    /// Non-empty value of `attribute`.
    pub fn non_empty(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(attribute.into(), value.into())
    }

    pub fn remove(&mut self, attribute: &str) -> Option<String> {
        self.0.remove(attribute)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, String> {
        self.0.iter_mut()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A single watch-list hit for a traveler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchHit {
    /// Watch-list identifier
    pub derog_id: String,
    /// Label of the clause (or fuzzy pass) that produced the hit
    pub clause: String,
    /// Fixed confidence for the match type
    pub confidence: f32,
    /// Display name of the watch list
    pub watch_list_name: String,
}

/// All hits for one traveler identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TravelerResponse {
    pub traveler_id: String,
    /// Distinct watch-list identifiers hit
    pub derog_ids: BTreeSet<String>,
    /// Supporting detail, at most one hit per identifier
    pub hits: Vec<MatchHit>,
}

impl TravelerResponse {
    pub fn new(traveler_id: impl Into<String>, hits: Vec<MatchHit>) -> Self {
        let mut response = Self {
            traveler_id: traveler_id.into(),
            derog_ids: BTreeSet::new(),
            hits: Vec::with_capacity(hits.len()),
        };
        for hit in hits {
            response.add_hit(hit);
        }
        response
    }

    /// Add a hit unless its identifier is already present. Returns true if added.
    pub fn add_hit(&mut self, hit: MatchHit) -> bool {
        if self.derog_ids.insert(hit.derog_id.clone()) {
            self.hits.push(hit);
            true
        } else {
            false
        }
    }

    /// Union another response's hits into this one by identifier.
    pub fn merge(&mut self, other: TravelerResponse) {
        for hit in other.hits {
            self.add_hit(hit);
        }
    }

    pub fn hit_count(&self) -> usize {
        self.derog_ids.len()
    }
}

/// Terminal output of a match call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchingResult {
    /// Sum of distinct identifiers over all responses
    pub total_hits: usize,
    pub responses: BTreeMap<String, TravelerResponse>,
    /// Traveler identities present in the batch but missing a response
    pub dropped_travelers: Vec<String>,
    /// Traveler records skipped for lacking an identity
    pub skipped_records: usize,
}

impl MatchingResult {
    pub fn response(&self, traveler_id: &str) -> Option<&TravelerResponse> {
        self.responses.get(traveler_id)
    }
}
