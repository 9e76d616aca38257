//! Approximate string scoring.

use crate::config::DEFAULT_JARO_WINKLER_THRESHOLD;

/// Jaro-Winkler name scorer with an acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextScorer {
    threshold: f64,
}

impl Default for TextScorer {
    fn default() -> Self {
        Self::new(DEFAULT_JARO_WINKLER_THRESHOLD)
    }
}

impl TextScorer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Normalized similarity in [0, 1].
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::jaro_winkler(a, b)
    }

    /// True iff similarity strictly exceeds the threshold.
    pub fn good_text_distance(&self, a: &str, b: &str) -> bool {
        self.similarity(a, b) > self.threshold
    }
}
