// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Builder - declarative search requests
//!
//! A [`Query`] targets one entity type and AND-combines its [`Filter`]s. Each
//! filter combines its [`Predicate`]s with an [`Operation`].
//!
//! # Example
//!
//! ```rust
//! use hub_search::search::{Filter, MatchOptions, Predicate, PredicateValue, Query, TargetEntity};
//!
//! let query = Query::new(TargetEntity::Item)
//!     .with_filter(Filter::and([Predicate::new().with("tags", "water")]))
//!     .with_filter(Filter::or([
//!         Predicate::new().with("type", "Web Map"),
//!         Predicate::new().with("type", "Feature Service"),
//!     ]));
//!
//! assert_eq!(query.filters.len(), 2);
//!
//! let json = r#"{"targetEntity":"item","filters":[{"predicates":[{"tags":{"any":["a","b"]}}]}]}"#;
//! let parsed: Query = serde_json::from_str(json).unwrap();
//! assert_eq!(
//!     parsed.filters[0].predicates[0].get("tags"),
//!     Some(&PredicateValue::Match(MatchOptions::any(["a", "b"])))
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::predicate::Predicate;

/// Backend record type a query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEntity {
    Item,
    Group,
    User,
    Event,
}

impl TargetEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Group => "group",
            Self::User => "user",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for TargetEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    And,
    Or,
}

impl Operation {
    /// Join token with surrounding spaces
    pub fn joiner(&self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

/// Predicates combined with one operation
///
/// `operation` is optional; each serializer applies its own default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    #[serde(default)]
    pub predicates: Vec<Predicate>,
}

impl Filter {
    /// Filter with no explicit operation
    pub fn new(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            operation: None,
            predicates: predicates.into_iter().collect(),
        }
    }

    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::new(predicates).with_operation(Operation::And)
    }

    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::new(predicates).with_operation(Operation::Or)
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Operation, falling back to a serializer-specific default
    pub fn operation_or(&self, default: Operation) -> Operation {
        self.operation.unwrap_or(default)
    }
}

/// Top-level search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub target_entity: TargetEntity,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl Query {
    pub fn new(target_entity: TargetEntity) -> Self {
        Self {
            target_entity,
            filters: Vec::new(),
        }
    }

    /// Item query with a single one-predicate filter
    pub fn item(predicate: Predicate) -> Self {
        Self::new(TargetEntity::Item).with_filter(Filter::new([predicate]))
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// All predicates across all filters, in order
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.filters.iter().flat_map(|f| f.predicates.iter())
    }
}
