// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;

use super::path::EntityRef;
use crate::error::Result;
use crate::request::SearchOptions;
use crate::search::{Catalog, PortalSearchRequest, Query};

/// Source of entity catalogs, implemented by the HTTP layer
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Catalog of an entity, `None` when the entity has none
    async fn get_catalog(&self, entity: &EntityRef) -> Result<Option<Catalog>>;
}

/// Executes searches, implemented by the HTTP layer
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Total number of records matching the portal request
    async fn count(&self, request: &PortalSearchRequest) -> Result<u64>;

    /// Total number of events matching the query.
    ///
    /// Events live behind the events API, which has no portal endpoint, so
    /// the query arrives unserialized.
    async fn count_events(&self, query: &Query, options: &SearchOptions) -> Result<u64>;
}
