// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Hub Search
//!
//! Compiles declarative Hub search requests into backend query dialects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Query                              │
//! │  • targetEntity: item | group | user | event               │
//! │  • filters (AND) of predicates (operation AND / OR)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                     (expand_query: canonical form)
//!                              ▼
//! ┌────────────────────────────┐   ┌────────────────────────────┐
//! │     Portal Translator      │   │       OGC Translator       │
//! │  q=(tags:"water") AND ...  │   │  ?filter=((type=typeA))    │
//! │  + searchUserAccess etc.   │   │  &token&limit&startindex   │
//! └────────────────────────────┘   └────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Containment checks                        │
//! │  sites/<id>/initiatives/<id>/... verified bottom-up        │
//! │  through CatalogStore + SearchBackend                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hub_search::search::{Query, PortalTranslator};
//! use hub_search::{HubSearchConfig, RequestOptions, SearchOptions};
//!
//! let query: Query = serde_json::from_str(r#"{
//!     "targetEntity": "item",
//!     "filters": [
//!         {"predicates": [{"term": "austin"}]},
//!         {"operation": "OR", "predicates": [{"type": "Web Map"}, {"type": "Hub Site Application"}]}
//!     ]
//! }"#).unwrap();
//!
//! let options = SearchOptions::new(RequestOptions::with_token("t0k", "https://org.maps.arcgis.com/sharing/rest"));
//! let request = PortalTranslator::build_request(&query, &options, &HubSearchConfig::default()).unwrap();
//!
//! assert_eq!(request.url, "https://org.maps.arcgis.com/sharing/rest/search");
//! assert_eq!(request.q, r#"austin AND (type:"Web Map" OR type:"Hub Site Application")"#);
//! ```
//!
//! ## Modules
//!
//! - [`search`]: Query model, expansion, portal and OGC translators, catalogs
//! - [`containment`]: Containment path parsing and deep containment checks
//! - [`request`]: Auth, base URLs, paging and sort
//! - [`config`]: Defaults for portal/Hub API URLs and paging
//! - [`metrics`]: Counters and latency histograms

pub mod config;
pub mod containment;
pub mod error;
pub mod metrics;
pub mod request;
pub mod search;

pub use config::HubSearchConfig;
pub use containment::{
    deep_contains, deep_contains_with_config, parse_containment_path, CatalogStore,
    ContainmentPathResult, DeepContainsResult, EntityRef, InMemoryCatalogStore, SearchBackend,
};
pub use error::{HubError, Result};
pub use metrics::LatencyTimer;
pub use request::{Authentication, RequestOptions, SearchOptions, SortOrder};
pub use search::{
    expand_predicate, get_ogc_item_query_params, serialize_query_for_portal, Filter, Operation,
    Predicate, PredicateValue, Query, QuerySerializer, TargetEntity,
};
