//! Clause index.
//!
//! For every clause the index maps the concatenated clause values of a
//! watch-list record to the identifiers sharing that exact value, so a
//! traveler's clause lookup is a single hash probe.

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Clause;
use crate::types::{attr, AttributeRecord};

/// Index entries for a single clause
#[derive(Debug, Clone)]
pub struct IndexedClause {
    clause: Clause,
    /// Concatenated clause values -> watch-list identifiers
    values: HashMap<String, BTreeSet<String>>,
    /// Positions of watch-list records carrying every clause attribute
    eligible: Vec<usize>,
}

impl IndexedClause {
    fn build(clause: &Clause, watch_list: &[AttributeRecord]) -> Self {
        let mut values: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut eligible = Vec::new();

        for (position, record) in watch_list.iter().enumerate() {
            let Some(derog_id) = record.non_empty(attr::DEROG_ID) else {
                continue;
            };

            if clause.is_complete_for(record) {
                eligible.push(position);
            }

            let key = clause.key(record);
            if !key.is_empty() {
                values.entry(key).or_default().insert(derog_id.to_string());
            }
        }

        Self {
            clause: clause.clone(),
            values,
            eligible,
        }
    }

    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    /// Identifiers whose clause key equals `key`. Empty keys never match.
    pub fn lookup(&self, key: &str) -> Option<&BTreeSet<String>> {
        if key.is_empty() {
            return None;
        }
        self.values.get(key)
    }

    /// Watch-list positions where every clause attribute is non-empty.
    ///
    /// Not used for matching; available to restrict scans to records the
    /// clause fully applies to.
    pub fn eligible(&self) -> &[usize] {
        &self.eligible
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.values.len()
    }
}

/// Per-clause exact-match index over a normalized watch list
#[derive(Debug, Clone, Default)]
pub struct ClauseIndex {
    clauses: Vec<IndexedClause>,
}

impl ClauseIndex {
    /// Build the index. Pure function of its inputs; clauses are built
    /// independently and keep configuration order.
    pub fn build(watch_list: &[AttributeRecord], clauses: &[Clause]) -> Self {
        #[cfg(feature = "parallel")]
        let clauses = clauses
            .par_iter()
            .map(|clause| IndexedClause::build(clause, watch_list))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let clauses = clauses
            .iter()
            .map(|clause| IndexedClause::build(clause, watch_list))
            .collect();

        Self { clauses }
    }

    /// Indexed clauses in configuration order
    pub fn clauses(&self) -> &[IndexedClause] {
        &self.clauses
    }

    /// Find the entries for a clause by its label.
    pub fn get(&self, label: &str) -> Option<&IndexedClause> {
        self.clauses.iter().find(|c| c.clause.label() == label)
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }
}
