// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use thiserror::Error;

use crate::search::TargetEntity;

#[derive(Error, Debug)]
pub enum HubError {
    /// The serializer cannot express queries against this entity type.
    #[error("Only queries with targetEntity: \"item\" are supported by the {serializer} serializer (got \"{target}\")")]
    UnsupportedTarget {
        target: TargetEntity,
        serializer: &'static str,
    },
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Search backend error: {0}")]
    Backend(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;
