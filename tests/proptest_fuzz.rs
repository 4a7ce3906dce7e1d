//! Property-based tests (fuzzing) for query expansion and serialization.
//!
//! Uses proptest to generate random and malformed predicates and verify the
//! translators never panic, stay deterministic and never emit vacuous clauses.
//!
//! Run with: `cargo test --test proptest_fuzz`

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::Value;

use hub_search::search::{
    expand_predicate_at, format_predicate, DateRange, Filter, MatchOptions, OgcTranslator,
    PortalTranslator, Predicate, PredicateValue, Query, RelativeDate, RelativeUnit, Scalar,
    TargetEntity,
};
use hub_search::{parse_containment_path, SearchOptions};

// =============================================================================
// Strategies for generating test data
// =============================================================================

fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<bool>().prop_map(Scalar::from),
        (-1_000_000i64..1_000_000).prop_map(Scalar::from),
        "[a-zA-Z0-9 ,'\"]{0,12}".prop_map(Scalar::from),
    ]
}

fn scalar_list() -> impl Strategy<Value = Vec<Scalar>> {
    prop::collection::vec(scalar_strategy(), 0..4)
}

fn unit_strategy() -> impl Strategy<Value = RelativeUnit> {
    prop_oneof![
        Just(RelativeUnit::Hours),
        Just(RelativeUnit::Days),
        Just(RelativeUnit::Weeks),
        Just(RelativeUnit::Months),
        Just(RelativeUnit::Years),
    ]
}

fn value_strategy() -> impl Strategy<Value = PredicateValue> {
    prop_oneof![
        scalar_strategy().prop_map(PredicateValue::Scalar),
        scalar_list().prop_map(PredicateValue::List),
        (
            prop::option::of(scalar_list()),
            prop::option::of(scalar_list()),
            prop::option::of(scalar_list()),
        )
            .prop_map(|(any, all, not)| PredicateValue::Match(MatchOptions { any, all, not })),
        (prop::option::of(0i64..2_000_000_000_000), prop::option::of(0i64..2_000_000_000_000))
            .prop_map(|(from, to)| PredicateValue::DateRange(DateRange {
                from: from.map(Scalar::from),
                to: to.map(Scalar::from),
            })),
        (0u32..500, unit_strategy())
            .prop_map(|(num, unit)| PredicateValue::RelativeDate(RelativeDate::new(num, unit))),
    ]
}

/// Value strategy without relative dates, so output does not depend on the clock
fn fixed_value_strategy() -> impl Strategy<Value = PredicateValue> {
    value_strategy().prop_filter("no relative dates", |v| {
        !matches!(v, PredicateValue::RelativeDate(_))
    })
}

fn field_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("tags".to_string()),
        Just("type".to_string()),
        Just("owner".to_string()),
        Just("title".to_string()),
        Just("created".to_string()),
        Just("modified".to_string()),
        Just("searchUserAccess".to_string()),
        Just("term".to_string()),
        "zz[a-z]{1,6}",
    ]
}

fn predicate_strategy() -> impl Strategy<Value = Predicate> {
    prop::collection::vec((field_strategy(), fixed_value_strategy()), 0..5)
        .prop_map(|fields| fields.into_iter().collect())
}

fn query_strategy() -> impl Strategy<Value = Query> {
    let filter = (
        prop::collection::vec(predicate_strategy(), 0..4),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(predicates, or)| match or {
            Some(true) => Filter::or(predicates),
            Some(false) => Filter::and(predicates),
            None => Filter::new(predicates),
        });
    prop::collection::vec(filter, 0..4).prop_map(|filters| Query {
        target_entity: TargetEntity::Item,
        filters,
    })
}

/// Arbitrary JSON values (including invalid structures)
fn arbitrary_json_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        any::<f64>().prop_map(|f| serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)),
        ".*".prop_map(Value::String),
        Just(Value::String("date-range".into())),
        Just(Value::String("relative-date".into())),
    ];

    leaf.prop_recursive(
        4,  // depth
        64, // max nodes
        10, // items per collection
        |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..10).prop_map(Value::Array),
                prop::collection::hash_map(
                    prop_oneof![
                        Just("any".to_string()),
                        Just("all".to_string()),
                        Just("not".to_string()),
                        Just("from".to_string()),
                        Just("to".to_string()),
                        Just("type".to_string()),
                        Just("num".to_string()),
                        Just("unit".to_string()),
                        ".*",
                    ],
                    inner,
                    0..6
                )
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

// =============================================================================
// Expansion
// =============================================================================

proptest! {
    /// Expanding an expanded predicate changes nothing
    #[test]
    fn prop_expansion_is_idempotent(
        fields in prop::collection::vec((field_strategy(), value_strategy()), 0..6)
    ) {
        let predicate: Predicate = fields.into_iter().collect();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let once = expand_predicate_at(&predicate, now);
        let twice = expand_predicate_at(&once, now);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.len(), predicate.len());
    }

    /// Expansion leaves no scalar, list or relative date outside term/passthrough fields
    #[test]
    fn prop_expansion_canonical(
        fields in prop::collection::vec((field_strategy(), value_strategy()), 0..6)
    ) {
        let predicate: Predicate = fields.into_iter().collect();
        let expanded = expand_predicate_at(&predicate, Utc::now());
        for (field, value) in expanded.iter() {
            if field == "term" || field == "searchUserAccess" {
                continue;
            }
            let canonical = matches!(value, PredicateValue::Match(_) | PredicateValue::DateRange(_));
            prop_assert!(canonical, "field {} left as {:?}", field, value);
        }
    }
}

// =============================================================================
// Portal serialization
// =============================================================================

proptest! {
    /// Same query in, same q out
    #[test]
    fn prop_portal_deterministic(query in query_strategy()) {
        let a = PortalTranslator::translate(&query);
        let b = PortalTranslator::translate(&query);
        prop_assert_eq!(a, b);
    }

    /// No vacuous clause or dangling joiner survives elision
    #[test]
    fn prop_portal_no_vacuous_clauses(query in query_strategy()) {
        let q = PortalTranslator::translate(&query).q;
        prop_assert!(!q.contains("()"), "empty group in {}", q);
        prop_assert!(!q.starts_with(" AND") && !q.ends_with("AND "), "dangling joiner in {}", q);
        prop_assert!(!q.contains("AND  AND") && !q.contains("OR  OR"), "empty operand in {}", q);
    }

    /// Fields off the allow-list and passthrough fields never reach q
    #[test]
    fn prop_portal_allow_list(query in query_strategy()) {
        let options = PortalTranslator::translate(&query);
        prop_assert!(!zz_field_emitted(&options.q), "unknown field in {}", options.q);
        prop_assert!(!options.q.contains("searchUserAccess:"));
    }

    /// Arbitrary JSON predicates deserialize and serialize without panicking
    #[test]
    fn prop_arbitrary_json_never_panics(
        fields in prop::collection::hash_map(field_strategy(), arbitrary_json_strategy(), 0..5)
    ) {
        let value = Value::Object(fields.into_iter().collect());
        let predicate: Predicate = serde_json::from_value(value).unwrap();
        let query = Query::item(predicate.clone());
        let _ = PortalTranslator::translate(&query);
        let _ = OgcTranslator::query_params(&query, &SearchOptions::default());
        let _ = format_predicate(&predicate);
    }
}

/// A generated `zz...` field appears as a portal field clause
fn zz_field_emitted(q: &str) -> bool {
    q.split(|c: char| c == '(' || c == ' ' || c == '-')
        .any(|token| token.starts_with("zz") && token.contains(':'))
}

// =============================================================================
// OGC serialization and containment paths
// =============================================================================

proptest! {
    /// OGC output is deterministic and either empty or a `?` query string
    #[test]
    fn prop_ogc_shape(query in query_strategy()) {
        let a = OgcTranslator::query_params(&query, &SearchOptions::default()).unwrap();
        let b = OgcTranslator::query_params(&query, &SearchOptions::default()).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert!(a.is_empty() || a.starts_with("?filter=") || a.starts_with("?searchUserAccess=") || a.starts_with("?q="));
        prop_assert!(!a.contains("()"));
    }

    /// Valid paths always have an even, bounded number of parts
    #[test]
    fn prop_containment_path_shape(path in "/?([a-z]{1,12}/[a-z0-9]{1,6}/?){0,7}") {
        let result = parse_containment_path(&path);
        if result.valid {
            prop_assert_eq!(result.parts.len() % 2, 0);
            prop_assert!(result.parts.len() <= 10);
            prop_assert!(result.reason.is_empty());
        } else {
            prop_assert!(!result.reason.is_empty());
        }
    }
}
