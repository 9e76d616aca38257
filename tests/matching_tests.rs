//! Integration tests for the matching engine through the public API.

use quickmatch::{
    attr, AccuracyMode, AttributeRecord, Clause, ClauseIndex, MatcherConfig, Normalizer,
    QuickMatcher, RecordKind, EXACT_CONFIDENCE, PHONETIC_CONFIDENCE, TEXT_DISTANCE_CLAUSE,
};

fn record(pairs: &[(&str, &str)]) -> AttributeRecord {
    pairs.iter().copied().collect()
}

fn clause(attrs: &[&str]) -> Clause {
    Clause::new(attrs.iter().copied()).unwrap()
}

fn config(mode: AccuracyMode, clauses: Vec<Clause>) -> MatcherConfig {
    MatcherConfig::new(mode).with_clauses(mode, clauses)
}

/// A small watch list exercising names, documents and dates of birth
fn watch_list() -> Vec<AttributeRecord> {
    vec![
        record(&[
            ("derog_id", "D1"),
            ("first_name", "Jon"),
            ("last_name", "Smith"),
            ("dob_date", "1980-01-01"),
            ("watch_list_name", "NoFly"),
        ]),
        record(&[
            ("derog_id", "D2"),
            ("first_name", "Maria"),
            ("last_name", "Garcia"),
            ("document_id", "p1234"),
            ("document_country_code", "esp"),
        ]),
        record(&[
            ("derog_id", "D3"),
            ("first_name", "Ahmed"),
            ("middle_name", "Ali"),
            ("last_name", "Hassan"),
            ("citizenship_country_code", "egy"),
            ("dob_date", "1971-07-15"),
        ]),
    ]
}

mod worked_examples {
    use super::*;

    #[test]
    fn test_sound_alike_name_hits_phonetic_clause() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::Balanced, vec![clause(&["phonetic_code"])]),
            vec![record(&[("derog_id", "D1"), ("first_name", "JON"), ("last_name", "SMITH")])],
        )
        .unwrap();

        let result = matcher.match_batch(vec![record(&[
            ("traveler_id", "T1"),
            ("first_name", "JOHN"),
            ("last_name", "SMITH"),
        ])]);

        let response = result.response("T1").unwrap();
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].derog_id, "D1");
        assert_eq!(response.hits[0].clause, "[phonetic_code]");
        assert_eq!(response.hits[0].confidence, PHONETIC_CONFIDENCE);
    }

    #[test]
    fn test_text_distance_on_citizenship_without_clause_match() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::BalancedWithTextDistance, vec![clause(&["document_id"])]),
            watch_list(),
        )
        .unwrap();

        // AHMED ALI HASAN vs AHMED ALI HASSAN, same citizenship, no DOB
        let result = matcher.match_batch(vec![record(&[
            ("traveler_id", "T1"),
            ("first_name", "Ahmed"),
            ("middle_name", "Ali"),
            ("last_name", "Hasan"),
            ("citizenship_country_code", "EGY"),
        ])]);

        let response = result.response("T1").unwrap();
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].derog_id, "D3");
        assert_eq!(response.hits[0].clause, TEXT_DISTANCE_CLAUSE);
        assert_eq!(response.hits[0].confidence, EXACT_CONFIDENCE);
    }

    #[test]
    fn test_text_distance_on_dob() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::BalancedWithTextDistance, vec![clause(&["document_id"])]),
            watch_list(),
        )
        .unwrap();

        let result = matcher.match_batch(vec![record(&[
            ("traveler_id", "T1"),
            ("first_name", "Jon"),
            ("last_name", "Smyth"),
            ("dob_date", "1980-01-01"),
        ])]);
        let response = result.response("T1").unwrap();
        assert_eq!(response.derog_ids.iter().collect::<Vec<_>>(), vec!["D1"]);
        assert_eq!(response.hits[0].clause, TEXT_DISTANCE_CLAUSE);
    }

    #[test]
    fn test_two_records_same_traveler_union() {
        let matcher = QuickMatcher::initialize(
            &config(
                AccuracyMode::HighPrecision,
                vec![
                    clause(&["first_name", "last_name", "dob_date"]),
                    clause(&["document_id", "document_country_code"]),
                ],
            ),
            watch_list(),
        )
        .unwrap();

        let result = matcher.match_batch(vec![
            record(&[
                ("traveler_id", "T1"),
                ("first_name", "jon"),
                ("last_name", "smith"),
                ("dob_date", "1980-01-01"),
            ]),
            record(&[
                ("traveler_id", "T1"),
                ("document_id", "P1234"),
                ("document_country_code", "ESP"),
            ]),
            // Repeats the first hit through another representation
            record(&[
                ("traveler_id", "T1"),
                ("first_name", "Jon"),
                ("last_name", "Smith"),
                ("dob_date", "1980-01-01"),
                ("document_id", "Z999"),
            ]),
        ]);

        let response = result.response("T1").unwrap();
        assert_eq!(result.responses.len(), 1);
        assert_eq!(response.derog_ids.iter().collect::<Vec<_>>(), vec!["D1", "D2"]);
        assert_eq!(response.hits[0].clause, "[first_name, last_name, dob_date]");
        assert_eq!(response.hits[1].clause, "[document_id, document_country_code]");
        assert_eq!(result.total_hits, 2);
    }
}

mod properties {
    use super::*;

    fn normalized_watch_list(config: &MatcherConfig) -> Vec<AttributeRecord> {
        let normalizer = Normalizer::new(config).unwrap();
        let mut list = watch_list();
        normalizer.normalize_batch(&mut list, RecordKind::WatchList);
        list
    }

    #[test]
    fn test_indexed_iff_concatenation_non_empty() {
        let clauses = vec![
            clause(&["first_name", "last_name"]),
            clause(&["document_id"]),
            clause(&["middle_name", "dob_date"]),
            clause(&["gender_code"]),
        ];
        let cfg = config(AccuracyMode::HighRecall, clauses.clone());
        let list = normalized_watch_list(&cfg);
        let index = ClauseIndex::build(&list, &clauses);

        for entry in index.clauses() {
            for rec in &list {
                let key = entry.clause().key(rec);
                let id = rec.value(attr::DEROG_ID);
                match entry.lookup(&key) {
                    Some(ids) => {
                        assert!(!key.is_empty());
                        assert!(ids.contains(id), "{} missing under {}", id, entry.clause());
                    }
                    None => assert!(key.is_empty(), "{} not indexed under {}", id, entry.clause()),
                }
            }
        }
    }

    #[test]
    fn test_derived_names_follow_name_parts() {
        let cfg = config(AccuracyMode::HighRecall, vec![clause(&["last_name"])]);
        for rec in normalized_watch_list(&cfg) {
            let parts: Vec<&str> = attr::NAME_PARTS
                .iter()
                .map(|p| rec.value(p))
                .filter(|v| !v.is_empty())
                .collect();
            assert_eq!(rec.value(attr::FULL_NAME), parts.join(" "));

            let codes: Vec<String> = parts.iter().map(|p| quickmatch::phonetic::encode_name(p)).collect();
            assert_eq!(rec.value(attr::PHONETIC_CODE), codes.join(" "));
        }
    }

    #[test]
    fn test_normalize_twice_is_noop() {
        let cfg = config(AccuracyMode::HighRecall, vec![clause(&["last_name"])])
            .with_rename("document_id", "DOC_ID");
        let normalizer = Normalizer::new(&cfg).unwrap();
        let once = normalized_watch_list(&cfg);
        let mut twice = once.clone();
        normalizer.normalize_batch(&mut twice, RecordKind::WatchList);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_match_is_deterministic() {
        for mode in AccuracyMode::ALL {
            let cfg = config(
                mode,
                vec![clause(&["phonetic_code"]), clause(&["last_name"]), clause(&["document_id"])],
            );
            let matcher = QuickMatcher::initialize(&cfg, watch_list()).unwrap();
            let travelers = vec![
                record(&[("traveler_id", "T1"), ("first_name", "John"), ("last_name", "Smith")]),
                record(&[("traveler_id", "T2"), ("last_name", "Garcia"), ("citizenship_country_code", "EGY")]),
                record(&[("traveler_id", "T1"), ("document_id", "P1234")]),
            ];
            let first = matcher.match_batch(travelers.clone());
            let second = matcher.match_batch(travelers);
            assert_eq!(first, second, "mode {mode}");
        }
    }

    #[test]
    fn test_at_most_one_hit_per_identifier() {
        let cfg = config(
            AccuracyMode::GtasDefault,
            vec![
                clause(&["last_name"]),
                clause(&["first_name", "last_name"]),
                clause(&["phonetic_code"]),
                clause(&["dob_date"]),
            ],
        );
        let matcher = QuickMatcher::initialize(&cfg, watch_list()).unwrap();
        let result = matcher.match_batch(vec![record(&[
            ("traveler_id", "T1"),
            ("first_name", "Jon"),
            ("last_name", "Smith"),
            ("dob_date", "1980-01-01"),
        ])]);

        let response = result.response("T1").unwrap();
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].clause, "[last_name]");
        assert_eq!(response.hits[0].watch_list_name, "NoFly");
    }

    #[test]
    fn test_exact_collision_confidence() {
        let cfg = config(
            AccuracyMode::Balanced,
            vec![clause(&["document_id"]), clause(&["phonetic_code"])],
        );
        let matcher = QuickMatcher::initialize(&cfg, watch_list()).unwrap();

        let result = matcher.match_batch(vec![
            record(&[("traveler_id", "T1"), ("document_id", "P1234")]),
            record(&[("traveler_id", "T2"), ("first_name", "Mariah"), ("last_name", "Garcia")]),
        ]);
        let t1 = &result.response("T1").unwrap().hits[0];
        assert_eq!((t1.derog_id.as_str(), t1.confidence), ("D2", EXACT_CONFIDENCE));

        let t2 = &result.response("T2").unwrap().hits[0];
        assert_eq!(t2.derog_id, "D2");
        assert_eq!(t2.confidence, PHONETIC_CONFIDENCE);
    }

    #[test]
    fn test_clause_only_modes_ignore_fuzzy_passes() {
        for mode in [AccuracyMode::HighRecall, AccuracyMode::HighPrecision, AccuracyMode::Balanced] {
            let matcher =
                QuickMatcher::initialize(&config(mode, vec![clause(&["document_id"])]), watch_list()).unwrap();
            let result = matcher.match_batch(vec![record(&[
                ("traveler_id", "T1"),
                ("first_name", "Jon"),
                ("last_name", "Smyth"),
                ("dob_date", "1980-01-01"),
            ])]);
            assert_eq!(result.total_hits, 0, "mode {mode}");
        }
    }
}

mod robustness {
    use super::*;

    #[test]
    fn test_empty_watch_list() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::GtasDefault, vec![clause(&["last_name"])]),
            vec![],
        )
        .unwrap();
        let result = matcher.match_batch(vec![record(&[("traveler_id", "T1"), ("last_name", "Smith")])]);
        assert_eq!(result.total_hits, 0);
        assert!(result.response("T1").unwrap().hits.is_empty());
    }

    #[test]
    fn test_nameless_records_do_not_fuzzy_match() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::GtasDefault, vec![clause(&["document_id"])]),
            vec![record(&[("derog_id", "D1"), ("dob_date", "1980-01-01")])],
        )
        .unwrap();
        let result = matcher.match_batch(vec![record(&[("traveler_id", "T1"), ("dob_date", "1980-01-01")])]);
        assert_eq!(result.total_hits, 0);
    }

    #[test]
    fn test_accented_names_match_and_do_not_panic() {
        let watch_list = vec![
            record(&[("derog_id", "D1"), ("first_name", "José"), ("last_name", "Müller")]),
            record(&[("derog_id", "D2"), ("first_name", "Çelik"), ("last_name", "Nuñez")]),
        ];
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::Balanced, vec![clause(&["phonetic_code"])]),
            watch_list,
        )
        .unwrap();

        let result = matcher.match_batch(vec![
            record(&[("traveler_id", "T1"), ("first_name", "josé"), ("last_name", "müller")]),
            record(&[("traveler_id", "T2"), ("first_name", "Selik"), ("last_name", "Nunez")]),
        ]);

        let t1 = result.response("T1").unwrap();
        assert_eq!(t1.derog_ids.iter().collect::<Vec<_>>(), vec!["D1"]);
        assert_eq!(t1.hits[0].confidence, PHONETIC_CONFIDENCE);

        let t2 = result.response("T2").unwrap();
        assert_eq!(t2.derog_ids.iter().collect::<Vec<_>>(), vec!["D2"]);
    }

    #[test]
    fn test_accented_names_in_phonetic_scan() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::GtasDefault, vec![clause(&["document_id"])]),
            vec![record(&[("derog_id", "D1"), ("first_name", "José"), ("last_name", "Müller")])],
        )
        .unwrap();

        let result = matcher.match_batch(vec![record(&[
            ("traveler_id", "T1"),
            ("first_name", "José"),
            ("last_name", "Müller"),
        ])]);
        assert_eq!(result.total_hits, 1);
        assert!(result.response("T1").unwrap().derog_ids.contains("D1"));
    }

    #[test]
    fn test_non_latin_names_have_no_phonetic_hit() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::GtasDefault, vec![clause(&["document_id"])]),
            vec![record(&[("derog_id", "D1"), ("first_name", "Αλεξ"), ("last_name", "Παπας")])],
        )
        .unwrap();
        assert_eq!(matcher.watch_list()[0].value(attr::PHONETIC_CODE), "");

        let result = matcher.match_batch(vec![record(&[
            ("traveler_id", "T1"),
            ("first_name", "ΑΛΕΞ"),
            ("last_name", "ΠΑΠΑΣ"),
        ])]);
        assert_eq!(result.total_hits, 0);
        assert!(result.response("T1").unwrap().hits.is_empty());
    }

    #[test]
    fn test_non_latin_names_still_match_exact_clause() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::HighPrecision, vec![clause(&["first_name", "last_name"])]),
            vec![record(&[("derog_id", "D1"), ("first_name", "Αλεξ"), ("last_name", "Παπας")])],
        )
        .unwrap();

        let result = matcher.match_batch(vec![record(&[
            ("traveler_id", "T1"),
            ("first_name", "ΑΛΕΞ"),
            ("last_name", "ΠΑΠΑΣ"),
        ])]);
        let response = result.response("T1").unwrap();
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].clause, "[first_name, last_name]");
        assert_eq!(response.hits[0].confidence, EXACT_CONFIDENCE);
    }

    #[test]
    fn test_empty_traveler_batch() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::Balanced, vec![clause(&["last_name"])]),
            watch_list(),
        )
        .unwrap();
        let result = matcher.match_batch(vec![]);
        assert_eq!(result.total_hits, 0);
        assert!(result.responses.is_empty());
    }

    #[test]
    fn test_result_serializes_to_json() {
        let matcher = QuickMatcher::initialize(
            &config(AccuracyMode::Balanced, vec![clause(&["last_name"])]),
            watch_list(),
        )
        .unwrap();
        let result = matcher.match_batch(vec![record(&[("traveler_id", "T1"), ("last_name", "Garcia")])]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_hits"], 1);
        assert_eq!(json["responses"]["T1"]["hits"][0]["derog_id"], "D2");
        assert_eq!(json["responses"]["T1"]["hits"][0]["clause"], "[last_name]");
    }
}
