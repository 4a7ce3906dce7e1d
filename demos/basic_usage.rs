// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic hub-search usage example.
//!
//! Demonstrates:
//! 1. Building a query from JSON
//! 2. Serializing it for the portal and for the OGC item search
//! 3. Validating containment paths
//! 4. Running a deep containment check against in-memory collaborators
//! 5. Displaying metrics
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=hub_search=debug cargo run --example basic_usage
//! ```

use async_trait::async_trait;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use hub_search::search::{Catalog, Filter, OgcTranslator, PortalSearchRequest, PortalTranslator, Predicate, Query};
use hub_search::{
    deep_contains, parse_containment_path, EntityRef, HubSearchConfig, InMemoryCatalogStore,
    RequestOptions, SearchBackend, SearchOptions,
};

/// Pretends every id except "missing" exists
struct DemoBackend;

#[async_trait]
impl SearchBackend for DemoBackend {
    async fn count(&self, request: &PortalSearchRequest) -> hub_search::Result<u64> {
        println!("   │  └─ GET {} q={}", request.url, request.q);
        Ok(u64::from(!request.q.contains("\"missing\"")))
    }

    async fn count_events(&self, query: &Query, _options: &SearchOptions) -> hub_search::Result<u64> {
        println!("   │  └─ events search {}", serde_json::to_string(query)?);
        Ok(1)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder.install().expect("failed to install metrics recorder");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║             hub-search: Basic Usage Example                   ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Build a query
    // ─────────────────────────────────────────────────────────────────────────
    let query: Query = serde_json::from_value(json!({
        "targetEntity": "item",
        "filters": [
            {"predicates": [{"term": "water"}]},
            {"predicates": [{
                "tags": {"any": ["water", "rivers"], "not": "preview"},
                "modified": {"type": "relative-date", "num": 6, "unit": "months"},
                "searchUserAccess": "groupMember"
            }]},
            {"operation": "OR", "predicates": [{"type": "Web Map"}, {"type": "Feature Service"}]}
        ]
    }))?;
    println!("📝 Query: {}", serde_json::to_string(&query)?);

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Serialize
    // ─────────────────────────────────────────────────────────────────────────
    let config = HubSearchConfig::default();
    let options = SearchOptions::new(RequestOptions::with_token("demo-token", &config.portal_url)).paged(20, 1);

    let request = PortalTranslator::build_request(&query, &options, &config)?;
    println!("\n🔎 Portal request");
    println!("   └─ url: {}", request.url);
    for (key, value) in request.to_query_pairs() {
        println!("   └─ {} = {}", key, value);
    }

    let ogc_query = Query::item(Predicate::new().with("type", "Web Map").with("owner", "casey"));
    println!("\n🔎 OGC request");
    println!("   └─ {}", OgcTranslator::items_url(&ogc_query, &options, &config)?);
    if let Err(e) = OgcTranslator::items_url(&Query::new(hub_search::TargetEntity::Group), &options, &config) {
        println!("   └─ group query rejected: {}", e);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Containment paths
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🧭 Containment paths");
    for path in ["sites/00a/initiatives/00b/projects/00c", "/sites/00b/initiatives", "sites/00a/widgets/00b"] {
        let result = parse_containment_path(path);
        println!("   └─ {} → valid={} {}", path, result.valid, result.reason);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Deep containment
    // ─────────────────────────────────────────────────────────────────────────
    let catalogs = InMemoryCatalogStore::new();
    let scope = Query::item(Predicate::new().with("group", "3ef"));
    let events = Query::new(hub_search::TargetEntity::Event).with_filter(Filter::new([Predicate::new().with("group", "3ef")]));
    catalogs.insert(
        EntityRef::new("sites", "00a"),
        Catalog::default().with_scope(scope.clone()).with_scope(events),
    );
    catalogs.insert(EntityRef::new("initiatives", "00b"), Catalog::default().with_scope(scope));

    println!("\n🔗 Deep containment");
    for path in ["sites/00a/initiatives/00b/projects/00c", "sites/00a/initiatives/missing", "sites/00a/events/00e"] {
        println!("   ┌─ {}", path);
        let result = deep_contains(path, &catalogs, &DemoBackend, &options).await;
        println!(
            "   └─ contained={} reason={} ({:?})",
            result.is_contained,
            result.reason.as_deref().unwrap_or("-"),
            result.duration
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Metrics
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📈 Metrics:");
    dump_metrics(&snapshotter);

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║                    Example complete!                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    Ok(())
}

/// Print captured counters and histogram summaries
fn dump_metrics(snapshotter: &Snapshotter) {
    let mut lines = Vec::new();
    for (composite_key, _, _, value) in snapshotter.snapshot().into_vec() {
        let (_, key) = composite_key.into_parts();
        let labels: Vec<_> = key.labels().map(|l| format!("{}={}", l.key(), l.value())).collect();
        let name = format!("{}{{{}}}", key.name(), labels.join(","));
        match value {
            DebugValue::Counter(v) => lines.push(format!("{} = {}", name, v)),
            DebugValue::Gauge(v) => lines.push(format!("{} = {:.2}", name, v.into_inner())),
            DebugValue::Histogram(samples) => {
                let sum: f64 = samples.iter().map(|v| v.into_inner()).sum();
                lines.push(format!("{} count={} sum={:.6}s", name, samples.len(), sum));
            }
        }
    }
    lines.sort();
    for line in lines {
        println!("   └─ {}", line);
    }
}
