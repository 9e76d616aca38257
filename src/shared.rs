//! Shared matcher handle.
//!
//! Holds the current [`QuickMatcher`] snapshot behind a lock. Matching
//! clones the `Arc` and releases the lock immediately; re-initialization
//! builds a complete new snapshot before swapping it in, so readers never
//! see a partially built index.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::info;

use crate::config::MatcherConfig;
use crate::engine::QuickMatcher;
use crate::error::Result;
use crate::types::{AttributeRecord, MatchingResult};

/// Thread-safe, swappable matcher
pub struct SharedMatcher {
    current: RwLock<Arc<QuickMatcher>>,
}

impl SharedMatcher {
    /// Initialize from configuration and a watch-list snapshot.
    pub fn initialize(config: &MatcherConfig, watch_list: Vec<AttributeRecord>) -> Result<Self> {
        Ok(Self::from_matcher(QuickMatcher::initialize(config, watch_list)?))
    }

    pub fn from_matcher(matcher: QuickMatcher) -> Self {
        Self {
            current: RwLock::new(Arc::new(matcher)),
        }
    }

    /// The snapshot currently in use.
    pub fn snapshot(&self) -> Arc<QuickMatcher> {
        self.current.read().clone()
    }

    /// Replace the snapshot. On error the previous snapshot stays in place.
    pub fn reinitialize(&self, config: &MatcherConfig, watch_list: Vec<AttributeRecord>) -> Result<()> {
        let next = Arc::new(QuickMatcher::initialize(config, watch_list)?);
        *self.current.write() = next;
        info!(mode = %config.accuracy_mode, "quickmatch snapshot replaced");
        Ok(())
    }

    pub fn match_batch(&self, travelers: Vec<AttributeRecord>) -> MatchingResult {
        self.snapshot().match_batch(travelers)
    }

    pub fn match_batch_with_deadline(
        &self,
        travelers: Vec<AttributeRecord>,
        deadline: Duration,
    ) -> Result<MatchingResult> {
        self.snapshot().match_batch_with_deadline(travelers, deadline)
    }
}
