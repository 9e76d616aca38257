//! Record normalization.
//!
//! Every record, watch-list or traveler, passes through the same pipeline
//! before it is indexed or matched:
//!
//! 1. rename aliased attributes to their canonical names
//! 2. upper-case the string attributes
//! 3. strip disallowed characters with the configured regex
//! 4. blank any gender code other than `M` or `F`
//! 5. derive `full_name` and `phonetic_code` from the name parts
//!
//! Normalization never fails per record; missing values become empty strings.

use std::borrow::Cow;
use std::collections::HashSet;

use regex::Regex;

use crate::config::MatcherConfig;
use crate::error::Result;
use crate::phonetic;
use crate::types::{attr, AttributeRecord, RecordKind};

/// Compiled normalization pipeline
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// (canonical, alias) pairs
    renames: Vec<(String, String)>,
    string_attributes: HashSet<String>,
    filter: Regex,
}

impl Normalizer {
    /// Build a normalizer from configuration. Fails if the cleansing regex
    /// does not compile.
    pub fn new(config: &MatcherConfig) -> Result<Self> {
        Ok(Self {
            renames: config
                .attribute_renames
                .iter()
                .map(|(canonical, alias)| (canonical.clone(), alias.clone()))
                .collect(),
            string_attributes: config.string_attributes.iter().cloned().collect(),
            filter: config.compile_filter()?,
        })
    }

    /// Normalize a batch in place.
    pub fn normalize_batch(&self, records: &mut [AttributeRecord], kind: RecordKind) {
        for record in records.iter_mut() {
            self.normalize(record, kind);
        }
    }

    /// Normalize a single record in place.
    pub fn normalize(&self, record: &mut AttributeRecord, kind: RecordKind) {
        self.rename(record, kind);

        for (attribute, value) in record.iter_mut() {
            if self.string_attributes.contains(attribute.as_str()) {
                *value = value.to_uppercase();
            }
        }

        for (_, value) in record.iter_mut() {
            if let Cow::Owned(cleansed) = self.filter.replace_all(value, "") {
                *value = cleansed;
            }
        }

        normalize_gender(record);
        derive_names(record);
    }

    fn rename(&self, record: &mut AttributeRecord, kind: RecordKind) {
        // Both identities may share an input alias; only rename the one
        // belonging to this batch.
        let foreign_identity = match kind {
            RecordKind::WatchList => RecordKind::Traveler.identity_attribute(),
            RecordKind::Traveler => RecordKind::WatchList.identity_attribute(),
        };

        for (canonical, alias) in &self.renames {
            if canonical == foreign_identity || canonical == alias {
                continue;
            }
            if let Some(value) = record.remove(alias) {
                record.insert(canonical.as_str(), value);
            }
        }
    }
}

fn normalize_gender(record: &mut AttributeRecord) {
    let keep = matches!(record.get(attr::GENDER_CODE), Some("M") | Some("F"));
    if !keep {
        record.insert(attr::GENDER_CODE, "");
    }
}

fn derive_names(record: &mut AttributeRecord) {
    let mut full_name = Vec::with_capacity(attr::NAME_PARTS.len());
    let mut phonetic_code = Vec::with_capacity(attr::NAME_PARTS.len());

    for part in attr::NAME_PARTS {
        let value = record.value(part).trim();
        if value.is_empty() {
            record.insert(part, "");
            continue;
        }
        let code = phonetic::encode_name(value);
        full_name.push(value.to_string());
        if !code.is_empty() {
            phonetic_code.push(code);
        }
    }

    let full_name = full_name.join(" ");
    record.insert(attr::FULL_NAME, full_name.trim());
    record.insert(attr::PHONETIC_CODE, phonetic_code.join(" "));
}
