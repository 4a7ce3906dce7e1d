// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for hub-search.
//!
//! # Example
//!
//! ```
//! use hub_search::HubSearchConfig;
//!
//! // Minimal config (uses defaults)
//! let config = HubSearchConfig::default();
//! assert_eq!(config.portal_url, "https://www.arcgis.com/sharing/rest");
//!
//! // Enterprise portal
//! let config = HubSearchConfig {
//!     portal_url: "https://gis.example.org/portal/sharing/rest".into(),
//!     default_num: 25,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for query serialization.
///
/// Values carried in [`RequestOptions`](crate::RequestOptions) override these.
#[derive(Debug, Clone, Deserialize)]
pub struct HubSearchConfig {
    /// Portal REST base URL (e.g., "https://www.arcgis.com/sharing/rest")
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Hub API base URL for OGC item search
    #[serde(default = "default_hub_api_url")]
    pub hub_api_url: String,

    /// Page size when the caller gives none
    #[serde(default = "default_num")]
    pub default_num: u32,

    /// OGC collection searched by `items_url`
    #[serde(default = "default_ogc_collection")]
    pub ogc_collection: String,
}

fn default_portal_url() -> String { "https://www.arcgis.com/sharing/rest".to_string() }
fn default_hub_api_url() -> String { "https://hub.arcgis.com".to_string() }
fn default_num() -> u32 { 10 }
fn default_ogc_collection() -> String { "all".to_string() }

impl Default for HubSearchConfig {
    fn default() -> Self {
        Self {
            portal_url: default_portal_url(),
            hub_api_url: default_hub_api_url(),
            default_num: default_num(),
            ogc_collection: default_ogc_collection(),
        }
    }
}
