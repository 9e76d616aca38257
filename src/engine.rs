//! Matching engine.
//!
//! A [`QuickMatcher`] is an immutable snapshot: the normalized watch list,
//! its clause index and the settings of one accuracy mode. Matching only
//! reads the snapshot, so a single instance can serve concurrent batches.

use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate;
use crate::config::{AccuracyMode, MatcherConfig};
use crate::error::{MatchError, Result};
use crate::index::ClauseIndex;
use crate::normalize::Normalizer;
use crate::scorer::TextScorer;
use crate::types::{attr, AttributeRecord, MatchHit, MatchingResult, RecordKind, TravelerResponse};

/// Clause label recorded for hits from the name distance + DOB/citizenship pass
pub const TEXT_DISTANCE_CLAUSE: &str = "[full_name text distance, DOB_Date OR CTZNSHP_CTRY_CD]";

/// Confidence of a hit on the `[phonetic_code]` clause
pub const PHONETIC_CONFIDENCE: f32 = 0.9;

/// Confidence of every other hit
pub const EXACT_CONFIDENCE: f32 = 1.0;

/// Watch-list matcher for one accuracy mode
#[derive(Debug, Clone)]
pub struct QuickMatcher {
    mode: AccuracyMode,
    normalizer: Normalizer,
    scorer: TextScorer,
    /// Normalized records carrying a derog id
    watch_list: Vec<AttributeRecord>,
    index: ClauseIndex,
    watch_list_name: String,
}

impl QuickMatcher {
    /// Validate `config`, normalize the watch list and build the clause index.
    pub fn initialize(config: &MatcherConfig, mut watch_list: Vec<AttributeRecord>) -> Result<Self> {
        config.validate()?;

        let normalizer = Normalizer::new(config)?;
        normalizer.normalize_batch(&mut watch_list, RecordKind::WatchList);

        let watch_list_name = watch_list
            .first()
            .map(|r| r.value(attr::WATCH_LIST_NAME).to_string())
            .unwrap_or_default();

        let supplied = watch_list.len();
        watch_list.retain(|record| record.non_empty(attr::DEROG_ID).is_some());
        if watch_list.len() < supplied {
            warn!(
                dropped = supplied - watch_list.len(),
                "watch-list records without a derog_id were ignored"
            );
        }
        if watch_list.is_empty() {
            warn!("watch list is empty, no hits will be produced");
        }

        let index = ClauseIndex::build(&watch_list, config.active_clauses());

        info!(
            mode = %config.accuracy_mode,
            clauses = index.clause_count(),
            records = watch_list.len(),
            "quickmatch initialized"
        );

        Ok(Self {
            mode: config.accuracy_mode,
            normalizer,
            scorer: TextScorer::new(config.jaro_winkler_threshold),
            watch_list,
            index,
            watch_list_name,
        })
    }

    pub fn mode(&self) -> AccuracyMode {
        self.mode
    }

    pub fn index(&self) -> &ClauseIndex {
        &self.index
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalized watch-list records that take part in matching
    pub fn watch_list(&self) -> &[AttributeRecord] {
        &self.watch_list
    }

    pub fn watch_list_name(&self) -> &str {
        &self.watch_list_name
    }

    /// Normalize and match a traveler batch.
    pub fn match_batch(&self, travelers: Vec<AttributeRecord>) -> MatchingResult {
        // Only the deadline check can fail.
        self.run(travelers, None).unwrap_or_default()
    }

    /// Like [`match_batch`](Self::match_batch), but gives up once `deadline`
    /// has elapsed.
    pub fn match_batch_with_deadline(
        &self,
        travelers: Vec<AttributeRecord>,
        deadline: Duration,
    ) -> Result<MatchingResult> {
        self.run(travelers, Some(Instant::now() + deadline))
    }

    fn run(&self, mut travelers: Vec<AttributeRecord>, deadline: Option<Instant>) -> Result<MatchingResult> {
        self.normalizer.normalize_batch(&mut travelers, RecordKind::Traveler);

        let supplied = travelers.len();
        travelers.retain(|record| record.non_empty(attr::TRAVELER_ID).is_some());
        let skipped = supplied - travelers.len();
        if skipped > 0 {
            warn!(skipped, "traveler records without a traveler_id were skipped");
        }

        let total = travelers.len();
        let processed = AtomicUsize::new(0);
        let match_checked = |traveler: &AttributeRecord| -> Result<TravelerResponse> {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(MatchError::DeadlineExceeded {
                    processed: processed.load(Ordering::Relaxed),
                    total,
                });
            }
            let response = self.match_one(traveler);
            processed.fetch_add(1, Ordering::Relaxed);
            Ok(response)
        };

        #[cfg(feature = "parallel")]
        let responses = travelers
            .par_iter()
            .map(match_checked)
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let responses = travelers
            .iter()
            .map(match_checked)
            .collect::<Result<Vec<_>>>()?;

        let mut result = aggregate(
            responses,
            travelers.iter().map(|t| t.value(attr::TRAVELER_ID)),
        );
        result.skipped_records = skipped;
        Ok(result)
    }

    /// Match one normalized traveler record.
    pub fn match_one(&self, traveler: &AttributeRecord) -> TravelerResponse {
        let traveler_id = traveler.value(attr::TRAVELER_ID);
        let mut found: HashSet<&str> = HashSet::new();
        let mut hits = Vec::new();

        // The phonetic scan does not depend on the clause; its hits are
        // credited to the first clause.
        let mut fuzzy_hits = if self.mode.phonetic_pass() {
            self.phonetic_scan(traveler)
        } else {
            BTreeSet::new()
        };

        for entry in self.index.clauses() {
            let clause = entry.clause();
            let key = clause.key(traveler);

            let mut candidates: BTreeSet<&str> = match entry.lookup(&key) {
                Some(ids) => {
                    info!(
                        traveler_id,
                        derog_ids = ?ids,
                        clause = clause.label(),
                        "clause hit"
                    );
                    debug!(matched = %key, "matched string");
                    ids.iter().map(String::as_str).collect()
                }
                None => BTreeSet::new(),
            };
            candidates.append(&mut fuzzy_hits);

            let confidence = if clause.is_phonetic_only() {
                PHONETIC_CONFIDENCE
            } else {
                EXACT_CONFIDENCE
            };
            for derog_id in candidates {
                if found.insert(derog_id) {
                    hits.push(self.hit(derog_id, clause.label(), confidence));
                }
            }
        }

        if self.mode.text_distance_pass() {
            for record in &self.watch_list {
                let derog_id = record.value(attr::DEROG_ID);
                if found.contains(derog_id) {
                    continue;
                }
                if self.text_distance_match(traveler, record) {
                    found.insert(derog_id);
                    hits.push(self.hit(derog_id, TEXT_DISTANCE_CLAUSE, EXACT_CONFIDENCE));
                }
            }
        }

        if hits.is_empty() {
            debug!(traveler_id, "no matches");
        }
        TravelerResponse::new(traveler_id, hits)
    }

    /// Watch-list ids with the traveler's phonetic code and a close full name.
    fn phonetic_scan(&self, traveler: &AttributeRecord) -> BTreeSet<&str> {
        let Some(code) = traveler.non_empty(attr::PHONETIC_CODE) else {
            return BTreeSet::new();
        };
        let name = traveler.value(attr::FULL_NAME);

        let mut ids = BTreeSet::new();
        for record in &self.watch_list {
            if record.value(attr::PHONETIC_CODE) != code {
                continue;
            }
            let derog_name = record.value(attr::FULL_NAME);
            if self.scorer.good_text_distance(name, derog_name) {
                info!(traveler = name, derog = derog_name, "text distance hit");
                ids.insert(record.value(attr::DEROG_ID));
            }
        }
        ids
    }

    fn text_distance_match(&self, traveler: &AttributeRecord, record: &AttributeRecord) -> bool {
        let (Some(name), Some(derog_name)) = (
            traveler.non_empty(attr::FULL_NAME),
            record.non_empty(attr::FULL_NAME),
        ) else {
            return false;
        };

        let same_dob = shares_value(traveler, record, attr::DOB_DATE);
        let same_citizenship = shares_value(traveler, record, attr::CITIZENSHIP_COUNTRY_CODE);
        if !(same_dob || same_citizenship) || !self.scorer.good_text_distance(name, derog_name) {
            return false;
        }

        let via = if same_dob {
            attr::DOB_DATE
        } else {
            attr::CITIZENSHIP_COUNTRY_CODE
        };
        info!(traveler = name, derog = derog_name, via, "text distance hit");
        true
    }

    fn hit(&self, derog_id: &str, clause: &str, confidence: f32) -> MatchHit {
        MatchHit {
            derog_id: derog_id.to_string(),
            clause: clause.to_string(),
            confidence,
            watch_list_name: self.watch_list_name.clone(),
        }
    }
}

/// Both records carry the same non-empty value for `attribute`.
fn shares_value(a: &AttributeRecord, b: &AttributeRecord, attribute: &str) -> bool {
    match (a.non_empty(attribute), b.non_empty(attribute)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
