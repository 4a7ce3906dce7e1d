// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Portal Translator
//!
//! Translates a [`Query`] into the legacy portal search dialect.
//!
//! # Portal Query Syntax
//!
//! ```text
//! tags:"water"                          - Match (strings quoted)
//! isopendata:true                       - Match (booleans/numbers bare)
//! (tags:"a" OR tags:"b")                - any
//! tags:"a" AND tags:"b"                 - all
//! (-tags:"a" OR -tags:"b")              - not
//! created:[1700000000000 TO 1710000000000]  - Date range (raw tokens)
//! austin                                - Free-text term
//! ```
//!
//! Predicates are expanded before translation. Fields off the target
//! entity's allow-list are dropped; `searchUserAccess`, `searchUserName` and
//! `joined` are hoisted out of `q` into the result object. Predicates and
//! filters that produce nothing are elided.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::expand::expand_query;
use super::fields::{is_passthrough, is_portal_field, portal_field_name, TERM_FIELD};
use super::predicate::{DateRange, MatchOptions, Predicate, PredicateValue, Scalar};
use super::query_builder::{Filter, Operation, Query, TargetEntity};
use crate::config::HubSearchConfig;
use crate::error::{HubError, Result};
use crate::metrics;
use crate::request::{SearchOptions, SortOrder};

const BACKEND: &str = "portal";

/// Serialized portal query plus hoisted passthrough parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PortalSearchOptions {
    pub q: String,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
}

impl PortalSearchOptions {
    pub fn search_user_access(&self) -> Option<&str> {
        self.passthrough.get("searchUserAccess").and_then(Value::as_str)
    }

    pub fn search_user_name(&self) -> Option<&str> {
        self.passthrough.get("searchUserName").and_then(Value::as_str)
    }
}

/// Complete portal search call handed to the HTTP layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalSearchRequest {
    pub url: String,
    pub q: String,
    #[serde(flatten)]
    pub passthrough: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    pub num: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip)]
    pub token: Option<String>,
}

impl PortalSearchRequest {
    /// Form parameters in a stable order, `token` last
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("f".to_string(), "json".to_string()),
            ("q".to_string(), self.q.clone()),
        ];
        for (key, value) in &self.passthrough {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            pairs.push((key.clone(), value));
        }
        if let Some(start) = self.start {
            pairs.push(("start".to_string(), start.to_string()));
        }
        pairs.push(("num".to_string(), self.num.to_string()));
        if let Some(field) = &self.sort_field {
            pairs.push(("sortField".to_string(), field.clone()));
        }
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        if let Some(token) = &self.token {
            pairs.push(("token".to_string(), token.clone()));
        }
        pairs
    }
}

/// One emitted clause
struct Clause {
    text: String,
    /// Several parts joined at top level, needs parens when combined
    compound: bool,
    /// Free-text term, never wrapped on its own
    bare: bool,
}

impl Clause {
    fn grouped(self) -> String {
        if self.compound {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

/// Portal search query translator
pub struct PortalTranslator;

impl PortalTranslator {
    /// Translate a query into `q` plus hoisted passthrough parameters
    pub fn translate(query: &Query) -> PortalSearchOptions {
        let expanded = expand_query(query);
        let target = expanded.target_entity;

        let mut passthrough = Map::new();
        let mut clauses = Vec::new();
        for filter in &expanded.filters {
            for predicate in &filter.predicates {
                Self::hoist_passthrough(predicate, &mut passthrough);
            }
            match Self::translate_filter(filter, target) {
                Some(clause) => clauses.push(clause),
                None => {
                    debug!(target_entity = %target, "Eliding filter with no clauses");
                    metrics::record_elided(BACKEND, "filter");
                }
            }
        }

        metrics::record_serialization(BACKEND, "success");
        PortalSearchOptions {
            q: clauses.join(" AND "),
            passthrough,
        }
    }

    /// Translate and attach endpoint, paging, sort and token
    pub fn build_request(
        query: &Query,
        options: &SearchOptions,
        config: &HubSearchConfig,
    ) -> Result<PortalSearchRequest> {
        let endpoint = match query.target_entity {
            TargetEntity::Item => "search",
            TargetEntity::Group => "community/groups",
            TargetEntity::User => "community/users",
            TargetEntity::Event => {
                metrics::record_serialization(BACKEND, "error");
                return Err(HubError::InvalidQuery(format!(
                    "no portal search endpoint for targetEntity \"{}\"",
                    query.target_entity
                )));
            }
        };
        let portal = options
            .request_options
            .portal_url()
            .unwrap_or(&config.portal_url)
            .trim_end_matches('/');

        let PortalSearchOptions { q, passthrough } = Self::translate(query);
        Ok(PortalSearchRequest {
            url: format!("{}/{}", portal, endpoint),
            q,
            passthrough,
            start: options.start,
            num: options.num.unwrap_or(config.default_num),
            sort_field: options.sort_field.clone(),
            sort_order: options.sort_order,
            token: options.token().map(str::to_string),
        })
    }

    fn hoist_passthrough(predicate: &Predicate, passthrough: &mut Map<String, Value>) {
        for (field, value) in predicate.iter() {
            if is_passthrough(field) {
                passthrough.insert(field.to_string(), value.to_json());
            }
        }
    }

    fn translate_filter(filter: &Filter, target: TargetEntity) -> Option<String> {
        let operation = filter.operation_or(Operation::And);
        let mut clauses: Vec<Clause> = filter
            .predicates
            .iter()
            .filter_map(|p| Self::translate_predicate(p, target))
            .collect();

        match clauses.len() {
            0 => None,
            1 => clauses.pop().map(|clause| {
                if clause.bare {
                    clause.text
                } else {
                    format!("({})", clause.text)
                }
            }),
            _ => {
                let parts: Vec<String> = clauses.into_iter().map(Clause::grouped).collect();
                Some(format!("({})", parts.join(operation.joiner())))
            }
        }
    }

    fn translate_predicate(predicate: &Predicate, target: TargetEntity) -> Option<Clause> {
        let mut fields = Vec::new();
        for (field, value) in predicate.iter() {
            if is_passthrough(field) {
                continue;
            }
            if field == TERM_FIELD {
                if let Some(text) = Self::term_text(value) {
                    fields.push(Clause {
                        text,
                        compound: false,
                        bare: true,
                    });
                }
                continue;
            }
            if !is_portal_field(target, field) {
                debug!(field, target_entity = %target, "Dropping field not on portal allow-list");
                metrics::record_elided(BACKEND, "field");
                continue;
            }
            let name = portal_field_name(target, field);
            if let Some(clause) = Self::translate_field(name, value) {
                fields.push(clause);
            }
        }

        match fields.len() {
            0 => {
                metrics::record_elided(BACKEND, "predicate");
                None
            }
            1 => fields.pop(),
            _ => {
                let parts: Vec<String> = fields.into_iter().map(Clause::grouped).collect();
                Some(Clause {
                    text: parts.join(" AND "),
                    compound: true,
                    bare: false,
                })
            }
        }
    }

    fn translate_field(name: &str, value: &PredicateValue) -> Option<Clause> {
        match value {
            PredicateValue::Match(options) => Self::translate_match(name, options),
            PredicateValue::DateRange(range) => Self::translate_range(name, range),
            // Expansion leaves only Match/DateRange on constraint fields
            other => {
                debug!(field = name, value = ?other, "Eliding unsupported predicate value");
                None
            }
        }
    }

    fn translate_match(name: &str, options: &MatchOptions) -> Option<Clause> {
        let mut parts = Vec::new();
        if let Some(any) = non_empty(&options.any) {
            parts.push(or_group(any.iter().map(|v| Self::term(name, v)).collect()));
        }
        if let Some(all) = non_empty(&options.all) {
            parts.extend(all.iter().map(|v| Self::term(name, v)));
        }
        if let Some(not) = non_empty(&options.not) {
            parts.push(or_group(
                not.iter().map(|v| format!("-{}", Self::term(name, v))).collect(),
            ));
        }

        if parts.is_empty() {
            return None;
        }
        Some(Clause {
            compound: parts.len() > 1,
            text: parts.join(" AND "),
            bare: false,
        })
    }

    fn translate_range(name: &str, range: &DateRange) -> Option<Clause> {
        if range.is_empty() {
            return None;
        }
        let bound = |b: &Option<Scalar>| b.as_ref().map_or_else(|| "*".to_string(), Scalar::to_string);
        Some(Clause {
            text: format!("{}:[{} TO {}]", name, bound(&range.from), bound(&range.to)),
            compound: false,
            bare: false,
        })
    }

    fn term(name: &str, value: &Scalar) -> String {
        format!("{}:{}", name, Self::format_value(value))
    }

    fn term_text(value: &PredicateValue) -> Option<String> {
        let text = match value {
            PredicateValue::Scalar(s) => s.to_string(),
            PredicateValue::List(items) => items
                .iter()
                .map(Scalar::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            _ => return None,
        };
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Strings are quoted, numbers and booleans bare
    fn format_value(value: &Scalar) -> String {
        match value {
            Scalar::String(s) => format!("\"{}\"", Self::escape_quoted(s)),
            other => other.to_string(),
        }
    }

    fn escape_quoted(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if c == '"' || c == '\\' {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}

/// Serialize a query for the portal search API
pub fn serialize_query_for_portal(query: &Query) -> PortalSearchOptions {
    PortalTranslator::translate(query)
}

/// `a` or `(a OR b ...)`
fn or_group(mut parts: Vec<String>) -> String {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        format!("({})", parts.join(" OR "))
    }
}

fn non_empty(list: &Option<Vec<Scalar>>) -> Option<&Vec<Scalar>> {
    list.as_ref().filter(|items| !items.is_empty())
}
