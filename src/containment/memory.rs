// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use dashmap::DashMap;

use super::path::EntityRef;
use super::traits::CatalogStore;
use crate::error::Result;
use crate::search::Catalog;

/// Catalogs held in memory, keyed by entity
pub struct InMemoryCatalogStore {
    catalogs: DashMap<EntityRef, Catalog>,
}

impl InMemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalogs: DashMap::new(),
        }
    }

    pub fn insert(&self, entity: EntityRef, catalog: Catalog) {
        self.catalogs.insert(entity, catalog);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn get_catalog(&self, entity: &EntityRef) -> Result<Option<Catalog>> {
        Ok(self.catalogs.get(entity).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{Predicate, Query};

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = InMemoryCatalogStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get_catalog(&EntityRef::new("sites", "a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = InMemoryCatalogStore::default();
        let catalog = Catalog::default().with_scope(Query::item(Predicate::new().with("group", "g1")));
        store.insert(EntityRef::new("sites", "a"), catalog.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_catalog(&EntityRef::new("sites", "a")).await.unwrap(),
            Some(catalog)
        );
        assert_eq!(store.get_catalog(&EntityRef::new("pages", "a")).await.unwrap(), None);
    }
}
