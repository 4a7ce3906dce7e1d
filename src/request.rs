// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Request options consumed by the serializers.
//!
//! Only base URLs and `authentication.token` are read; nothing here is ever
//! mutated by serialization.
//!
//! # Example
//!
//! ```rust
//! use hub_search::{RequestOptions, SearchOptions, SortOrder};
//!
//! let opts = SearchOptions::new(RequestOptions::with_token("abc", "https://www.arcgis.com/sharing/rest"))
//!     .paged(20, 41)
//!     .sorted("modified", SortOrder::Desc);
//!
//! assert_eq!(opts.token(), Some("abc"));
//! assert_eq!(opts.num, Some(20));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session credentials supplied by the authentication layer
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    pub token: String,
    pub portal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("token", &"<redacted>")
            .field("portal", &self.portal)
            .field("username", &self.username)
            .finish()
    }
}

/// Auth + base URLs for one request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_portal: Option<bool>,
}

impl RequestOptions {
    pub fn with_token(token: impl Into<String>, portal: impl Into<String>) -> Self {
        let portal = portal.into();
        Self {
            authentication: Some(Authentication {
                token: token.into(),
                portal: portal.clone(),
                username: None,
            }),
            portal: Some(portal),
            ..Default::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.authentication.as_ref().map(|auth| auth.token.as_str())
    }

    /// Explicit portal, then the session's portal
    pub fn portal_url(&self) -> Option<&str> {
        self.portal
            .as_deref()
            .or_else(|| self.authentication.as_ref().map(|auth| auth.portal.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Request options plus paging and sort
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default)]
    pub request_options: RequestOptions,
    /// Page size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    /// 1-based start index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl SearchOptions {
    pub fn new(request_options: RequestOptions) -> Self {
        Self {
            request_options,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn paged(mut self, num: u32, start: u32) -> Self {
        self.num = Some(num);
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn sorted(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_field = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.request_options.token()
    }
}
