//! Merge per-record responses into one response per traveler identity.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::types::{MatchingResult, TravelerResponse};

/// Merge `responses` by traveler identity and check that every identity in
/// `batch_ids` ended up with a response.
///
/// The first response for an identity is installed as-is; later ones add
/// only hits for identifiers not already present.
pub fn aggregate<'a, R, I>(responses: R, batch_ids: I) -> MatchingResult
where
    R: IntoIterator<Item = TravelerResponse>,
    I: IntoIterator<Item = &'a str>,
{
    let mut merged: BTreeMap<String, TravelerResponse> = BTreeMap::new();

    for response in responses {
        match merged.entry(response.traveler_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(response);
            }
            Entry::Occupied(mut slot) => slot.get_mut().merge(response),
        }
    }

    let mut dropped = BTreeSet::new();
    for traveler_id in batch_ids {
        if !merged.contains_key(traveler_id) && dropped.insert(traveler_id) {
            warn!(
                traveler_id,
                "traveler was dropped from the response list"
            );
        }
    }

    let total_hits = merged.values().map(TravelerResponse::hit_count).sum();

    MatchingResult {
        total_hits,
        responses: merged,
        dropped_travelers: dropped.into_iter().map(str::to_string).collect(),
        skipped_records: 0,
    }
}
