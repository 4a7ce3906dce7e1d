// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Infrastructure
//!
//! Declarative Hub queries compiled for two search backends.
//!
//! # Architecture
//!
//! ```text
//! Query (targetEntity + filters of predicates)
//!     ↓
//!     ├─→ expand_query → PortalTranslator → q="(tags:\"water\")" + passthrough
//!     └─→ OgcTranslator → ?filter=((type=typeA))&token=...&limit=...
//! ```
//!
//! # Example
//!
//! ```rust
//! use hub_search::search::{
//!     MatchOptions, OgcTranslator, PortalTranslator, Predicate, PredicateValue, Query,
//! };
//! use hub_search::SearchOptions;
//!
//! let query = Query::item(Predicate::new().with(
//!     "tags",
//!     PredicateValue::Match(MatchOptions::any(["water", "rivers"]).with_not(["preview"])),
//! ));
//!
//! let portal = PortalTranslator::translate(&query);
//! assert_eq!(portal.q, r#"((tags:"water" OR tags:"rivers") AND -tags:"preview")"#);
//!
//! let ogc = OgcTranslator::query_params(&query, &SearchOptions::default()).unwrap();
//! assert_eq!(ogc, "?filter=((tags IN (water, rivers) AND tags NOT IN (preview)))");
//! ```

mod collection;
mod expand;
mod fields;
mod ogc_translator;
mod portal_translator;
mod predicate;
mod query_builder;
mod relative_date;

pub use collection::{Catalog, CatalogScopes, Collection};
pub use expand::{expand_filter, expand_filter_at, expand_predicate, expand_predicate_at, expand_query};
pub use fields::{
    is_date_field, is_passthrough, is_portal_field, portal_allow_list, portal_field_name,
    DATE_FIELDS, PASSTHROUGH_FIELDS, TERM_FIELD,
};
pub use ogc_translator::{format_filter_block, format_predicate, get_ogc_item_query_params, OgcTranslator};
pub use portal_translator::{
    serialize_query_for_portal, PortalSearchOptions, PortalSearchRequest, PortalTranslator,
};
pub use predicate::{
    DateRange, MatchOptions, Predicate, PredicateValue, RelativeDate, RelativeUnit, Scalar,
};
pub use query_builder::{Filter, Operation, Query, TargetEntity};
pub use relative_date::{resolve_relative_date, resolve_relative_date_at};

use crate::error::Result;
use crate::request::SearchOptions;

/// A backend query dialect
///
/// Lets callers hold either translator behind one interface.
pub trait QuerySerializer {
    type Output;

    /// Backend name used in logs and metrics
    fn backend(&self) -> &'static str;

    fn serialize(&self, query: &Query, options: &SearchOptions) -> Result<Self::Output>;
}

impl QuerySerializer for PortalTranslator {
    type Output = PortalSearchOptions;

    fn backend(&self) -> &'static str {
        "portal"
    }

    fn serialize(&self, query: &Query, _options: &SearchOptions) -> Result<PortalSearchOptions> {
        Ok(Self::translate(query))
    }
}

impl QuerySerializer for OgcTranslator {
    type Output = String;

    fn backend(&self) -> &'static str {
        "ogc"
    }

    fn serialize(&self, query: &Query, options: &SearchOptions) -> Result<String> {
        Self::query_params(query, options)
    }
}
