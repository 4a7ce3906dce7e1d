// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Predicate Expander
//!
//! Normalizes a predicate so every constraint field holds either a
//! [`MatchOptions`] or an absolute [`DateRange`]:
//!
//! ```text
//! "water"                          → {any: ["water"]}
//! ["water", "rivers"]              → {any: ["water", "rivers"]}
//! {type: relative-date, 2 months}  → {type: date-range, from, to}
//! created: [1, 2]                  → {type: date-range, from: 1, to: 2}
//! {any, all, not} / date-range     → unchanged
//! searchUserAccess / term / raw    → unchanged
//! ```
//!
//! Expansion is a fixed point: expanding an expanded predicate changes nothing.

use chrono::{DateTime, Utc};

use super::fields::{is_date_field, is_passthrough, TERM_FIELD};
use super::predicate::{DateRange, MatchOptions, Predicate, PredicateValue, Scalar};
use super::query_builder::{Filter, Query};
use super::relative_date::resolve_relative_date_at;

/// Expand against the current time
pub fn expand_predicate(predicate: &Predicate) -> Predicate {
    expand_predicate_at(predicate, Utc::now())
}

/// Expand with an explicit anchor for relative dates
pub fn expand_predicate_at(predicate: &Predicate, now: DateTime<Utc>) -> Predicate {
    predicate
        .iter()
        .map(|(field, value)| (field, expand_value(field, value, now)))
        .collect()
}

pub fn expand_filter(filter: &Filter) -> Filter {
    expand_filter_at(filter, Utc::now())
}

pub fn expand_filter_at(filter: &Filter, now: DateTime<Utc>) -> Filter {
    Filter {
        operation: filter.operation,
        predicates: filter
            .predicates
            .iter()
            .map(|p| expand_predicate_at(p, now))
            .collect(),
    }
}

/// Expand every predicate of a query against one shared anchor
pub fn expand_query(query: &Query) -> Query {
    let now = Utc::now();
    Query {
        target_entity: query.target_entity,
        filters: query
            .filters
            .iter()
            .map(|filter| expand_filter_at(filter, now))
            .collect(),
    }
}

fn expand_value(field: &str, value: &PredicateValue, now: DateTime<Utc>) -> PredicateValue {
    if is_passthrough(field) || field == TERM_FIELD {
        return value.clone();
    }

    match value {
        PredicateValue::RelativeDate(relative) => {
            PredicateValue::DateRange(resolve_relative_date_at(relative, now))
        }
        PredicateValue::DateRange(_) | PredicateValue::Match(_) | PredicateValue::Raw(_) => {
            value.clone()
        }
        PredicateValue::List(items) => match date_pair(field, items) {
            Some(range) => PredicateValue::DateRange(range),
            None => PredicateValue::Match(MatchOptions {
                any: Some(items.clone()),
                ..Default::default()
            }),
        },
        PredicateValue::Scalar(scalar) => PredicateValue::Match(MatchOptions {
            any: Some(vec![scalar.clone()]),
            ..Default::default()
        }),
    }
}

/// `[from, to]` numeric pair on a known date field
fn date_pair(field: &str, items: &[Scalar]) -> Option<DateRange> {
    if !is_date_field(field) {
        return None;
    }
    match items {
        [from @ Scalar::Number(_), to @ Scalar::Number(_)] => Some(DateRange {
            from: Some(from.clone()),
            to: Some(to.clone()),
        }),
        _ => None,
    }
}
