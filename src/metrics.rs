// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for offline-store.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application chooses the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `offline_store_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: get, put, query, durable_put
//! - `status`: local, remote, refreshed, stale, online, offline, error

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Record an engine operation and how it resolved.
pub fn record_operation(operation: &str, status: &str) {
    counter!(
        "offline_store_operations_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record operation latency.
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "offline_store_operation_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Set the current engine mode (1 = online, 0 = offline).
pub fn set_mode(online: bool) {
    gauge!("offline_store_online").set(if online { 1.0 } else { 0.0 });
}

/// Record an automatic flip to offline mode.
pub fn record_mode_flip() {
    counter!("offline_store_mode_flips_total").increment(1);
}

/// Record a purge of the oldest record from durable storage.
pub fn record_purge() {
    counter!("offline_store_purges_total").increment(1);
}

/// Record the number of dirty records at the start of a sync pass.
pub fn record_sync_items(count: usize) {
    histogram!("offline_store_sync_batch_size").record(count as f64);
}
