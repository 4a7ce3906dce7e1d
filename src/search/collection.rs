// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Collections and catalogs.
//!
//! A [`Catalog`] describes what an entity (site, initiative, ...) contains:
//! one scope [`Query`] per target entity, plus named [`Collection`]s that
//! narrow a scope for display.

use serde::{Deserialize, Serialize};

use super::portal_translator::{PortalSearchRequest, PortalTranslator};
use super::query_builder::{Query, TargetEntity};
use crate::config::HubSearchConfig;
use crate::error::Result;
use crate::request::{SearchOptions, SortOrder};

fn default_sort_field() -> String { "title".to_string() }
fn default_schema_version() -> u32 { 1 }

/// Named, sorted view over a scope query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub key: String,
    pub label: String,
    pub target_entity: TargetEntity,
    pub scope: Query,
    #[serde(default = "default_sort_field")]
    pub sort_field: String,
    #[serde(default)]
    pub sort_direction: SortOrder,
    /// Related resources the caller should fetch alongside results
    #[serde(default)]
    pub include: Vec<String>,
}

impl Collection {
    pub fn new(key: impl Into<String>, label: impl Into<String>, scope: Query) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            target_entity: scope.target_entity,
            scope,
            sort_field: default_sort_field(),
            sort_direction: SortOrder::default(),
            include: Vec::new(),
        }
    }

    /// Portal request for this collection. Sort from `options` wins over the
    /// collection's own.
    pub fn portal_request(
        &self,
        options: &SearchOptions,
        config: &HubSearchConfig,
    ) -> Result<PortalSearchRequest> {
        let mut options = options.clone();
        if options.sort_field.is_none() {
            options.sort_field = Some(self.sort_field.clone());
            options.sort_order = Some(self.sort_direction);
        }
        PortalTranslator::build_request(&self.scope, &options, config)
    }
}

/// Scope query per target entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogScopes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Query>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub scopes: CatalogScopes,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: None,
            scopes: CatalogScopes::default(),
            collections: Vec::new(),
        }
    }
}

impl Catalog {
    #[must_use]
    pub fn with_scope(mut self, scope: Query) -> Self {
        let slot = match scope.target_entity {
            TargetEntity::Item => &mut self.scopes.item,
            TargetEntity::Group => &mut self.scopes.group,
            TargetEntity::User => &mut self.scopes.user,
            TargetEntity::Event => &mut self.scopes.event,
        };
        *slot = Some(scope);
        self
    }

    pub fn scope_for(&self, target: TargetEntity) -> Option<&Query> {
        match target {
            TargetEntity::Item => self.scopes.item.as_ref(),
            TargetEntity::Group => self.scopes.group.as_ref(),
            TargetEntity::User => self.scopes.user.as_ref(),
            TargetEntity::Event => self.scopes.event.as_ref(),
        }
    }

    pub fn collection(&self, key: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.key == key)
    }
}
