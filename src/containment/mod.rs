// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Containment paths
//!
//! A containment path names a chain of entities, outermost first:
//!
//! ```text
//! sites/00a/initiatives/00b/projects/00c
//! ```
//!
//! [`parse_containment_path`] validates the shape. [`deep_contains`] checks
//! that every entity is actually in scope of its parent's catalog, walking
//! bottom-up one `(parent, child)` pair at a time:
//!
//! ```text
//! initiatives/00b ⊇ projects/00c ?   catalog(00b).scopes.item + id:"00c" → count
//! sites/00a ⊇ initiatives/00b ?      catalog(00a).scopes.item + id:"00b" → count
//! ```
//!
//! Event children have no portal endpoint and are counted through
//! [`SearchBackend::count_events`] instead.
//!
//! The walk is sequential and stops at the first pair that fails.

mod memory;
mod path;
mod traits;

pub use memory::InMemoryCatalogStore;
pub use path::{parse_containment_path, ContainmentPathResult, EntityRef, CONTAINMENT_SEGMENTS, MAX_DEPTH};
pub use traits::{CatalogStore, SearchBackend};

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::HubSearchConfig;
use crate::error::Result;
use crate::metrics::{self, LatencyTimer};
use crate::request::SearchOptions;
use crate::search::{Filter, PortalTranslator, Predicate, TargetEntity};

/// Reason reported when a catalog fetch or search fails mid-walk
pub const BACKEND_FAILURE_REASON: &str = "An error occurred while parsing path.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepContainsResult {
    /// The path as given
    pub identifier: String,
    pub is_contained: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub duration: Duration,
}

/// Check a containment path with the default configuration
pub async fn deep_contains(
    path: &str,
    catalogs: &dyn CatalogStore,
    backend: &dyn SearchBackend,
    options: &SearchOptions,
) -> DeepContainsResult {
    deep_contains_with_config(path, catalogs, backend, options, &HubSearchConfig::default()).await
}

pub async fn deep_contains_with_config(
    path: &str,
    catalogs: &dyn CatalogStore,
    backend: &dyn SearchBackend,
    options: &SearchOptions,
    config: &HubSearchConfig,
) -> DeepContainsResult {
    let timer = LatencyTimer::new("deep_contains");
    let result = |is_contained: bool, reason: Option<String>| DeepContainsResult {
        identifier: path.to_string(),
        is_contained,
        reason,
        duration: timer.elapsed(),
    };

    let parsed = parse_containment_path(path);
    if !parsed.valid {
        debug!(path, reason = %parsed.reason, "Rejected containment path");
        metrics::record_containment_check("invalid");
        return result(false, Some(parsed.reason));
    }

    let entities = parsed.entities();
    for pair in entities.windows(2).rev() {
        let (parent, child) = (&pair[0], &pair[1]);
        match contains(parent, child, catalogs, backend, options, config).await {
            Ok(true) => debug!(%parent, %child, "Containment pair verified"),
            Ok(false) => {
                info!(path, %parent, %child, "Entity not contained");
                metrics::record_containment_check("not_contained");
                return result(false, Some(format!("{} is not contained in {}.", child, parent)));
            }
            Err(e) => {
                warn!(path, %parent, %child, error = %e, "Containment check failed");
                metrics::record_containment_check("error");
                return result(false, Some(BACKEND_FAILURE_REASON.to_string()));
            }
        }
    }

    metrics::record_containment_check("contained");
    result(true, None)
}

/// Does `parent`'s catalog scope match `child`?
async fn contains(
    parent: &EntityRef,
    child: &EntityRef,
    catalogs: &dyn CatalogStore,
    backend: &dyn SearchBackend,
    options: &SearchOptions,
    config: &HubSearchConfig,
) -> Result<bool> {
    let catalog = catalogs.get_catalog(parent).await;
    metrics::record_backend_call("catalog", catalog.is_ok());
    let Some(catalog) = catalog? else {
        debug!(%parent, "No catalog");
        return Ok(false);
    };

    let target = child.target_entity();
    let Some(scope) = catalog.scope_for(target) else {
        debug!(%parent, target_entity = %target, "Catalog has no scope for target");
        return Ok(false);
    };

    let query = scope
        .clone()
        .with_filter(Filter::new([Predicate::new().with("id", child.id.as_str())]));
    let count = if target == TargetEntity::Event {
        let count = backend.count_events(&query, options).await;
        metrics::record_backend_call("count_events", count.is_ok());
        count
    } else {
        let request = PortalTranslator::build_request(&query, options, config)?;
        let count = backend.count(&request).await;
        metrics::record_backend_call("count", count.is_ok());
        count
    };
    Ok(count? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HubError;
    use crate::search::{Catalog, PortalSearchRequest, Query};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Counts 1 when the query names an id in `present`, records every q
    struct MockBackend {
        present: Vec<&'static str>,
        fail: bool,
        seen: Mutex<Vec<String>>,
        event_queries: Mutex<Vec<Query>>,
    }

    impl MockBackend {
        fn new(present: Vec<&'static str>) -> Self {
            Self {
                present,
                fail: false,
                seen: Mutex::new(Vec::new()),
                event_queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for MockBackend {
        async fn count(&self, request: &PortalSearchRequest) -> Result<u64> {
            self.seen.lock().unwrap().push(request.q.clone());
            if self.fail {
                return Err(HubError::Backend("connection reset".into()));
            }
            let hit = self
                .present
                .iter()
                .any(|id| request.q.contains(&format!("id:\"{}\"", id)));
            Ok(u64::from(hit))
        }

        async fn count_events(&self, query: &Query, _options: &SearchOptions) -> Result<u64> {
            self.event_queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(HubError::Backend("connection reset".into()));
            }
            let hit = query
                .predicates()
                .filter_map(|p| p.get("id"))
                .any(|id| self.present.iter().any(|present| id.to_json() == *present));
            Ok(u64::from(hit))
        }
    }

    fn store() -> InMemoryCatalogStore {
        let store = InMemoryCatalogStore::new();
        let scope = Query::item(Predicate::new().with("group", "g1"));
        store.insert(EntityRef::new("sites", "00a"), Catalog::default().with_scope(scope.clone()));
        store.insert(EntityRef::new("initiatives", "00b"), Catalog::default().with_scope(scope));
        store
    }

    #[tokio::test]
    async fn test_contained_walks_bottom_up() {
        let backend = MockBackend::new(vec!["00b", "00c"]);
        let result = deep_contains(
            "sites/00a/initiatives/00b/projects/00c",
            &store(),
            &backend,
            &SearchOptions::default(),
        )
        .await;

        assert!(result.is_contained);
        assert_eq!(result.reason, None);
        assert_eq!(result.identifier, "sites/00a/initiatives/00b/projects/00c");
        let seen = backend.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                r#"(group:"g1") AND (id:"00c")"#.to_string(),
                r#"(group:"g1") AND (id:"00b")"#.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let backend = MockBackend::new(vec!["00b"]);
        let result = deep_contains(
            "sites/00a/initiatives/00b/projects/00c",
            &store(),
            &backend,
            &SearchOptions::default(),
        )
        .await;

        assert!(!result.is_contained);
        assert_eq!(result.reason.as_deref(), Some("projects/00c is not contained in initiatives/00b."));
        assert_eq!(backend.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_path_reason() {
        let backend = MockBackend::new(vec![]);
        let result = deep_contains("/sites/00b/initiatives", &store(), &backend, &SearchOptions::default()).await;
        assert!(!result.is_contained);
        assert_eq!(result.reason.as_deref(), Some("Path does not contain an even number of parts."));
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_reason() {
        let mut backend = MockBackend::new(vec!["00b"]);
        backend.fail = true;
        let result = deep_contains("sites/00a/initiatives/00b", &store(), &backend, &SearchOptions::default()).await;
        assert!(!result.is_contained);
        assert_eq!(result.reason.as_deref(), Some(BACKEND_FAILURE_REASON));
    }

    #[tokio::test]
    async fn test_missing_catalog_not_contained() {
        let backend = MockBackend::new(vec!["00x"]);
        let result = deep_contains("pages/00p/content/00x", &store(), &backend, &SearchOptions::default()).await;
        assert!(!result.is_contained);
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    fn event_store() -> InMemoryCatalogStore {
        let store = InMemoryCatalogStore::new();
        let catalog = Catalog::default()
            .with_scope(Query::item(Predicate::new().with("group", "g1")))
            .with_scope(Query::new(TargetEntity::Event).with_filter(Filter::new([
                Predicate::new().with("group", "g1"),
            ])));
        store.insert(EntityRef::new("sites", "00a"), catalog);
        store
    }

    #[tokio::test]
    async fn test_event_child_uses_event_count() {
        let backend = MockBackend::new(vec!["00e"]);
        let result = deep_contains("sites/00a/events/00e", &event_store(), &backend, &SearchOptions::default()).await;

        assert!(result.is_contained, "{:?}", result.reason);
        assert!(backend.seen.lock().unwrap().is_empty());
        let queries = backend.event_queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].target_entity, TargetEntity::Event);
        assert_eq!(queries[0].filters.len(), 2);
    }

    #[tokio::test]
    async fn test_event_child_not_found() {
        let backend = MockBackend::new(vec![]);
        let result = deep_contains("sites/00a/events/00e", &event_store(), &backend, &SearchOptions::default()).await;
        assert!(!result.is_contained);
        assert_eq!(result.reason.as_deref(), Some("events/00e is not contained in sites/00a."));
    }

    #[tokio::test]
    async fn test_event_count_error_reason() {
        let mut backend = MockBackend::new(vec!["00e"]);
        backend.fail = true;
        let result = deep_contains("sites/00a/events/00e", &event_store(), &backend, &SearchOptions::default()).await;
        assert!(!result.is_contained);
        assert_eq!(result.reason.as_deref(), Some(BACKEND_FAILURE_REASON));
    }

    #[tokio::test]
    async fn test_single_entity_is_contained() {
        let backend = MockBackend::new(vec![]);
        let result = deep_contains("sites/00a", &store(), &backend, &SearchOptions::default()).await;
        assert!(result.is_contained);
    }
}
