//! Matcher configuration.
//!
//! Configuration is plain data: the accuracy mode, the clause lists per
//! mode, the attribute rename table, the cleansing regex and the
//! Jaro-Winkler threshold. It is validated once by [`MatcherConfig::validate`]
//! when an engine is initialized and is immutable afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigErrorKind, MatchError, Result};
use crate::types::{attr, AttributeRecord};

/// Default Jaro-Winkler acceptance threshold
pub const DEFAULT_JARO_WINKLER_THRESHOLD: f64 = 0.9;

/// Default cleansing pattern: strips everything except letters, digits,
/// whitespace and hyphens.
pub const DEFAULT_FILTER_OUT_REGEX: &str = r"[^\p{L}\p{N}\s\-]";

/// Attributes that are upper-cased during normalization by default.
pub const DEFAULT_STRING_ATTRIBUTES: [&str; 8] = [
    attr::FIRST_NAME,
    attr::MIDDLE_NAME,
    attr::LAST_NAME,
    attr::GENDER_CODE,
    attr::CITIZENSHIP_COUNTRY_CODE,
    attr::DOCUMENT_COUNTRY_CODE,
    attr::DOCUMENT_TYPE,
    attr::DOCUMENT_ID,
];

/// Accuracy mode: selects a clause set and the extra fuzzy passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccuracyMode {
    /// Broad clauses, more hits, more false positives
    HighRecall,
    /// Narrow clauses, fewer but likelier hits
    HighPrecision,
    Balanced,
    /// Balanced clauses plus name distance with DOB or citizenship
    BalancedWithTextDistance,
    /// Clauses plus a phonetic code and name distance pass
    #[default]
    #[serde(rename = "GTAS_DEFAULT")]
    GtasDefault,
}

impl AccuracyMode {
    pub const ALL: [AccuracyMode; 5] = [
        AccuracyMode::HighRecall,
        AccuracyMode::HighPrecision,
        AccuracyMode::Balanced,
        AccuracyMode::BalancedWithTextDistance,
        AccuracyMode::GtasDefault,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccuracyMode::HighRecall => "HighRecall",
            AccuracyMode::HighPrecision => "HighPrecision",
            AccuracyMode::Balanced => "Balanced",
            AccuracyMode::BalancedWithTextDistance => "BalancedWithTextDistance",
            AccuracyMode::GtasDefault => "GTAS_DEFAULT",
        }
    }

    /// Whether the phonetic code + name distance scan runs
    pub fn phonetic_pass(&self) -> bool {
        matches!(self, AccuracyMode::GtasDefault)
    }

    /// Whether the name distance + DOB/citizenship scan runs after the clauses
    pub fn text_distance_pass(&self) -> bool {
        matches!(self, AccuracyMode::BalancedWithTextDistance)
    }
}

impl fmt::Display for AccuracyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccuracyMode {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        AccuracyMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| MatchError::UnknownMode(s.to_string()))
    }
}

/// An ordered, non-empty list of attributes forming a composite exact-match key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Clause {
    attributes: Vec<String>,
    label: String,
}

impl Clause {
    pub fn new<I, S>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        if attributes.is_empty() {
            return Err(MatchError::config(
                ConfigErrorKind::EmptyClause,
                "clause must name at least one attribute",
            ));
        }
        let label = format!("[{}]", attributes.join(", "));
        Ok(Self { attributes, label })
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Printable form, e.g. `[first_name, last_name]`
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True when the clause is exactly `[phonetic_code]`.
    pub fn is_phonetic_only(&self) -> bool {
        self.attributes.len() == 1 && self.attributes[0] == attr::PHONETIC_CODE
    }

    /// Concatenation of the record's values for this clause, in clause
    /// order, with no separator. Absent attributes contribute nothing.
    pub fn key(&self, record: &AttributeRecord) -> String {
        let mut key = String::with_capacity(32);
        for attribute in &self.attributes {
            if let Some(value) = record.get(attribute) {
                key.push_str(value);
            }
        }
        key
    }

    /// True when every attribute of the clause is present and non-empty.
    pub fn is_complete_for(&self, record: &AttributeRecord) -> bool {
        self.attributes
            .iter()
            .all(|attribute| record.non_empty(attribute).is_some())
    }
}

impl TryFrom<Vec<String>> for Clause {
    type Error = MatchError;

    fn try_from(attributes: Vec<String>) -> Result<Self> {
        Clause::new(attributes)
    }
}

impl From<Clause> for Vec<String> {
    fn from(clause: Clause) -> Self {
        clause.attributes
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn default_threshold() -> f64 {
    DEFAULT_JARO_WINKLER_THRESHOLD
}

fn default_string_attributes() -> Vec<String> {
    DEFAULT_STRING_ATTRIBUTES.iter().map(|s| s.to_string()).collect()
}

/// Matcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub accuracy_mode: AccuracyMode,

    #[serde(default)]
    pub high_recall: Vec<Clause>,
    #[serde(default)]
    pub high_precision: Vec<Clause>,
    /// Also used by `BalancedWithTextDistance`
    #[serde(default)]
    pub balanced: Vec<Clause>,
    #[serde(default)]
    pub gtas_default: Vec<Clause>,

    /// Canonical attribute name -> input alias
    #[serde(default)]
    pub attribute_renames: BTreeMap<String, String>,

    /// Pattern matching characters to strip from every value
    pub filter_out_regex: String,

    #[serde(default = "default_threshold")]
    pub jaro_winkler_threshold: f64,

    #[serde(default = "default_string_attributes")]
    pub string_attributes: Vec<String>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            accuracy_mode: AccuracyMode::default(),
            high_recall: Vec::new(),
            high_precision: Vec::new(),
            balanced: Vec::new(),
            gtas_default: Vec::new(),
            attribute_renames: BTreeMap::new(),
            filter_out_regex: DEFAULT_FILTER_OUT_REGEX.to_string(),
            jaro_winkler_threshold: DEFAULT_JARO_WINKLER_THRESHOLD,
            string_attributes: default_string_attributes(),
        }
    }
}

impl MatcherConfig {
    /// Create a configuration for the given mode with default settings.
    pub fn new(mode: AccuracyMode) -> Self {
        Self {
            accuracy_mode: mode,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: MatcherConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the accuracy mode.
    pub fn with_mode(mut self, mode: AccuracyMode) -> Self {
        self.accuracy_mode = mode;
        self
    }

    /// Set the clause list used by `mode`.
    pub fn with_clauses(mut self, mode: AccuracyMode, clauses: Vec<Clause>) -> Self {
        *self.clauses_slot(mode) = clauses;
        self
    }

    /// Add a rename: values found under `alias` move to `canonical`.
    pub fn with_rename(mut self, canonical: impl Into<String>, alias: impl Into<String>) -> Self {
        self.attribute_renames.insert(canonical.into(), alias.into());
        self
    }

    /// Set the cleansing regex.
    pub fn with_filter_out_regex(mut self, pattern: impl Into<String>) -> Self {
        self.filter_out_regex = pattern.into();
        self
    }

    /// Set the Jaro-Winkler acceptance threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.jaro_winkler_threshold = threshold;
        self
    }

    /// Replace the set of upper-cased attributes.
    pub fn with_string_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    fn clauses_slot(&mut self, mode: AccuracyMode) -> &mut Vec<Clause> {
        match mode {
            AccuracyMode::HighRecall => &mut self.high_recall,
            AccuracyMode::HighPrecision => &mut self.high_precision,
            AccuracyMode::Balanced | AccuracyMode::BalancedWithTextDistance => &mut self.balanced,
            AccuracyMode::GtasDefault => &mut self.gtas_default,
        }
    }

    /// Clauses selected by `mode`.
    pub fn clauses_for(&self, mode: AccuracyMode) -> &[Clause] {
        match mode {
            AccuracyMode::HighRecall => &self.high_recall,
            AccuracyMode::HighPrecision => &self.high_precision,
            AccuracyMode::Balanced | AccuracyMode::BalancedWithTextDistance => &self.balanced,
            AccuracyMode::GtasDefault => &self.gtas_default,
        }
    }

    /// Clauses selected by the configured mode.
    pub fn active_clauses(&self) -> &[Clause] {
        self.clauses_for(self.accuracy_mode)
    }

    /// Compile the cleansing regex.
    pub fn compile_filter(&self) -> Result<Regex> {
        Regex::new(&self.filter_out_regex).map_err(|e| {
            MatchError::config(
                ConfigErrorKind::InvalidRegex,
                format!("filter_out_regex '{}': {}", self.filter_out_regex, e),
            )
        })
    }

    /// Check the configuration is complete for the active mode.
    pub fn validate(&self) -> Result<()> {
        if self.active_clauses().is_empty() {
            return Err(MatchError::config(
                ConfigErrorKind::MissingClauses,
                format!("no clauses configured for mode {}", self.accuracy_mode),
            ));
        }

        let t = self.jaro_winkler_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(MatchError::config(
                ConfigErrorKind::InvalidThreshold,
                format!("jaro_winkler_threshold must be within [0, 1], got {}", t),
            ));
        }

        self.compile_filter()?;
        Ok(())
    }
}
