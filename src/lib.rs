//! QuickMatch - screen travelers against a derogatory watch list
//!
//! This library provides the matching core of a screening platform:
//! - Record normalization (renames, case folding, regex cleansing, derived names)
//! - Phonetic codes (double metaphone) for sound-alike names
//! - Jaro-Winkler name similarity with a configurable threshold
//! - A per-clause exact-match index over the watch list
//! - Accuracy modes blending clause, phonetic and text distance matches
//! - Aggregation of hits per traveler identity
//!
//! # Example
//!
//! ```rust
//! use quickmatch::{AccuracyMode, AttributeRecord, Clause, MatcherConfig, QuickMatcher};
//!
//! let config = MatcherConfig::new(AccuracyMode::Balanced).with_clauses(
//!     AccuracyMode::Balanced,
//!     vec![
//!         Clause::new(["first_name", "last_name", "dob_date"]).unwrap(),
//!         Clause::new(["phonetic_code"]).unwrap(),
//!     ],
//! );
//!
//! let watch_list: Vec<AttributeRecord> = vec![
//!     [("derog_id", "D1"), ("first_name", "Jon"), ("last_name", "Smith")]
//!         .into_iter()
//!         .collect(),
//! ];
//! let matcher = QuickMatcher::initialize(&config, watch_list).unwrap();
//!
//! let travelers: Vec<AttributeRecord> = vec![
//!     [("traveler_id", "T1"), ("first_name", "John"), ("last_name", "Smith")]
//!         .into_iter()
//!         .collect(),
//! ];
//! let result = matcher.match_batch(travelers);
//!
//! assert_eq!(result.total_hits, 1);
//! let hit = &result.response("T1").unwrap().hits[0];
//! assert_eq!(hit.clause, "[phonetic_code]");
//! assert_eq!(hit.confidence, 0.9);
//! ```
//!
//! # Accuracy Modes
//!
//! | Mode | Clauses | Phonetic + distance pass | Distance + DOB/citizenship pass |
//! |------|---------|--------------------------|---------------------------------|
//! | `HighRecall` | `high_recall` | no | no |
//! | `HighPrecision` | `high_precision` | no | no |
//! | `Balanced` | `balanced` | no | no |
//! | `BalancedWithTextDistance` | `balanced` | no | yes |
//! | `GTAS_DEFAULT` | `gtas_default` | yes | no |

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod normalize;
pub mod phonetic;
pub mod scorer;
pub mod shared;
pub mod types;

// Re-export commonly used items
pub use aggregate::aggregate;
pub use config::{
    AccuracyMode, Clause, MatcherConfig, DEFAULT_FILTER_OUT_REGEX, DEFAULT_JARO_WINKLER_THRESHOLD,
};
pub use engine::{QuickMatcher, EXACT_CONFIDENCE, PHONETIC_CONFIDENCE, TEXT_DISTANCE_CLAUSE};
pub use error::{ConfigErrorKind, MatchError, Result};
pub use index::{ClauseIndex, IndexedClause};
pub use normalize::Normalizer;
pub use scorer::TextScorer;
pub use shared::SharedMatcher;
pub use types::{attr, AttributeRecord, MatchHit, MatchingResult, RecordKind, TravelerResponse};
