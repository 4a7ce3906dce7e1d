// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for hub-search.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application chooses the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `hub_search_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `backend`: portal, ogc
//! - `kind`: predicate, filter, field
//! - `status`: success, error, contained, not_contained, invalid

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record one query serialization
pub fn record_serialization(backend: &str, status: &str) {
    counter!(
        "hub_search_serializations_total",
        "backend" => backend.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a predicate, filter or field left out of the output
pub fn record_elided(backend: &str, kind: &str) {
    counter!(
        "hub_search_elided_total",
        "backend" => backend.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record the outcome of a deep containment check
pub fn record_containment_check(status: &str) {
    counter!(
        "hub_search_containment_checks_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record one external call made while walking a containment path
pub fn record_backend_call(operation: &str, success: bool) {
    counter!(
        "hub_search_backend_calls_total",
        "operation" => operation.to_string(),
        "status" => if success { "success" } else { "error" }.to_string()
    )
    .increment(1);
}

/// Record operation latency
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "hub_search_operation_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records latency on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.operation, self.start.elapsed());
    }
}
