// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! OGC Translator
//!
//! Translates a [`Query`] into the Hub API OGC item-search query string.
//!
//! # Filter Syntax
//!
//! ```text
//! type=typeA                         - Scalar
//! type IN (typeA, typeB)             - List / any
//! tags=tagC                          - all (one per value)
//! tags NOT IN (tagE, tagF)           - not
//! modified BETWEEN 1 AND 2           - Date range
//! modified>=1 / modified<=2          - Open-ended range
//! title='Water Mains'                - Strings needing quotes
//! ```
//!
//! Values are classified once, on input (a bare `{from, to}` object is
//! already a date range by then). Unlike the portal translator, no expansion
//! runs here: scalars and lists keep their own forms and only relative dates
//! are resolved.
//!
//! `searchUserAccess`, `searchUserName` and `joined` never enter the filter;
//! they are carried as their own parameters. Parameter values are
//! percent-encoded for `&`, `#`, `+` and `%` only, so `(`, `)`, `=` and
//! spaces stay readable.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Value};
use tracing::debug;

use super::fields::{is_passthrough, TERM_FIELD};
use super::predicate::{DateRange, MatchOptions, Predicate, PredicateValue, Scalar};
use super::query_builder::{Filter, Operation, Query, TargetEntity};
use super::relative_date::resolve_relative_date_at;
use crate::config::HubSearchConfig;
use crate::error::{HubError, Result};
use crate::metrics;
use crate::request::SearchOptions;

const BACKEND: &str = "ogc";

/// Characters that would end or corrupt a query-string value
const QUERY_VALUE: &AsciiSet = &CONTROLS.add(b'&').add(b'#').add(b'+').add(b'%');

/// OGC item search translator
pub struct OgcTranslator;

impl OgcTranslator {
    /// `(clause AND clause ...)`, or `None` when nothing survives
    pub fn format_predicate(predicate: &Predicate) -> Option<String> {
        Self::format_predicate_at(predicate, Utc::now())
    }

    /// Predicates joined by the filter's operation (default OR), wrapped once more
    pub fn format_filter_block(filter: &Filter) -> Option<String> {
        Self::format_filter_block_at(filter, Utc::now())
    }

    /// Query-string suffix:
    /// `?filter=...&token=...&limit=...&startindex=...&<passthrough>...&q=...`
    ///
    /// Returns an empty string when no parameter applies.
    pub fn query_params(query: &Query, options: &SearchOptions) -> Result<String> {
        if query.target_entity != TargetEntity::Item {
            metrics::record_serialization(BACKEND, "error");
            return Err(HubError::UnsupportedTarget {
                target: query.target_entity,
                serializer: "OGC",
            });
        }

        let now = Utc::now();
        let blocks: Vec<String> = query
            .filters
            .iter()
            .filter_map(|filter| {
                let block = Self::format_filter_block_at(filter, now);
                if block.is_none() {
                    metrics::record_elided(BACKEND, "filter");
                }
                block
            })
            .collect();

        let mut params: Vec<(&str, String)> = Vec::new();
        if !blocks.is_empty() {
            params.push(("filter", blocks.join(" AND ")));
        }
        if let Some(token) = options.token() {
            params.push(("token", token.to_string()));
        }
        if let Some(num) = options.num {
            params.push(("limit", num.to_string()));
        }
        if let Some(start) = options.start {
            params.push(("startindex", start.to_string()));
        }
        let passthrough = Self::passthrough(query);
        for (key, value) in &passthrough {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            params.push((key.as_str(), value));
        }
        if let Some(term) = Self::search_term(query) {
            params.push(("q", term));
        }

        metrics::record_serialization(BACKEND, "success");
        Ok(params
            .iter()
            .enumerate()
            .map(|(i, (key, value))| {
                format!(
                    "{}{}={}",
                    if i == 0 { '?' } else { '&' },
                    key,
                    utf8_percent_encode(value, QUERY_VALUE)
                )
            })
            .collect())
    }

    /// Full items URL on the Hub API. Page size falls back to the config default.
    pub fn items_url(
        query: &Query,
        options: &SearchOptions,
        config: &HubSearchConfig,
    ) -> Result<String> {
        let mut options = options.clone();
        options.num.get_or_insert(config.default_num);
        let params = Self::query_params(query, &options)?;

        let base = options
            .request_options
            .hub_api_url
            .as_deref()
            .unwrap_or(&config.hub_api_url)
            .trim_end_matches('/');
        Ok(format!(
            "{}/api/search/v1/collections/{}/items{}",
            base, config.ogc_collection, params
        ))
    }

    fn format_filter_block_at(filter: &Filter, now: DateTime<Utc>) -> Option<String> {
        let predicates: Vec<String> = filter
            .predicates
            .iter()
            .filter_map(|p| Self::format_predicate_at(p, now))
            .collect();
        if predicates.is_empty() {
            return None;
        }
        let operation = filter.operation_or(Operation::Or);
        Some(format!("({})", predicates.join(operation.joiner())))
    }

    fn format_predicate_at(predicate: &Predicate, now: DateTime<Utc>) -> Option<String> {
        let mut clauses = Vec::new();
        for (field, value) in predicate.iter() {
            if field == TERM_FIELD || is_passthrough(field) {
                continue;
            }
            match Self::format_field(field, value, now) {
                Some(clause) => clauses.push(clause),
                None => debug!(field, "Skipping field with no OGC clause"),
            }
        }
        if clauses.is_empty() {
            metrics::record_elided(BACKEND, "predicate");
            return None;
        }
        Some(format!("({})", clauses.join(" AND ")))
    }

    fn format_field(field: &str, value: &PredicateValue, now: DateTime<Utc>) -> Option<String> {
        match value {
            PredicateValue::Scalar(scalar) => Some(Self::equals(field, scalar)),
            PredicateValue::List(items) => Self::in_list(field, items, "IN"),
            PredicateValue::Match(options) => Self::format_match(field, options),
            PredicateValue::DateRange(range) => Self::format_range(field, range),
            PredicateValue::RelativeDate(relative) => {
                Self::format_range(field, &resolve_relative_date_at(relative, now))
            }
            PredicateValue::Raw(_) => None,
        }
    }

    fn format_match(field: &str, options: &MatchOptions) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(any) = &options.any {
            parts.extend(Self::in_list(field, any, "IN"));
        }
        if let Some(all) = &options.all {
            parts.extend(all.iter().map(|v| Self::equals(field, v)));
        }
        if let Some(not) = &options.not {
            parts.extend(Self::in_list(field, not, "NOT IN"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" AND "))
        }
    }

    fn format_range(field: &str, range: &DateRange) -> Option<String> {
        match (&range.from, &range.to) {
            (Some(from), Some(to)) => Some(format!(
                "{} BETWEEN {} AND {}",
                field,
                Self::format_value(from),
                Self::format_value(to)
            )),
            (Some(from), None) => Some(format!("{}>={}", field, Self::format_value(from))),
            (None, Some(to)) => Some(format!("{}<={}", field, Self::format_value(to))),
            (None, None) => None,
        }
    }

    fn equals(field: &str, value: &Scalar) -> String {
        format!("{}={}", field, Self::format_value(value))
    }

    fn in_list(field: &str, values: &[Scalar], keyword: &str) -> Option<String> {
        if values.is_empty() {
            return None;
        }
        let values: Vec<String> = values.iter().map(Self::format_value).collect();
        Some(format!("{} {} ({})", field, keyword, values.join(", ")))
    }

    /// Bare unless the string would break the filter grammar
    fn format_value(value: &Scalar) -> String {
        match value {
            Scalar::String(s) if Self::needs_quotes(s) => format!("'{}'", s.replace('\'', "''")),
            other => other.to_string(),
        }
    }

    fn needs_quotes(value: &str) -> bool {
        value.is_empty()
            || value
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '\'' | '"'))
    }

    /// Passthrough fields in predicate order, later values win
    fn passthrough(query: &Query) -> Map<String, Value> {
        let mut passthrough = Map::new();
        for predicate in query.predicates() {
            for (field, value) in predicate.iter() {
                if is_passthrough(field) {
                    passthrough.insert(field.to_string(), value.to_json());
                }
            }
        }
        passthrough
    }

    fn search_term(query: &Query) -> Option<String> {
        let terms: Vec<String> = query
            .predicates()
            .filter_map(|p| p.get(TERM_FIELD))
            .filter_map(|value| match value {
                PredicateValue::Scalar(s) => Some(s.to_string()),
                PredicateValue::List(items) => Some(
                    items
                        .iter()
                        .map(Scalar::to_string)
                        .collect::<Vec<_>>()
                        .join(" "),
                ),
                _ => None,
            })
            .filter(|term| !term.trim().is_empty())
            .collect();
        if terms.is_empty() {
            None
        } else {
            Some(terms.join(" "))
        }
    }
}

pub fn format_predicate(predicate: &Predicate) -> Option<String> {
    OgcTranslator::format_predicate(predicate)
}

pub fn format_filter_block(filter: &Filter) -> Option<String> {
    OgcTranslator::format_filter_block(filter)
}

/// Serialize an item query for the Hub API OGC search endpoint
pub fn get_ogc_item_query_params(query: &Query, options: &SearchOptions) -> Result<String> {
    OgcTranslator::query_params(query, options)
}
