//! Data models for the latency metrics service.
//!
//! This module contains the request and response structures shared by the
//! aggregator, the HTTP layer and the one-shot CLI mode.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single latency/uptime sample reported for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRecord {
    /// Grouping key (deployment region).
    pub region: String,
    /// Service the sample was taken from. Not used in aggregation.
    pub service: String,
    /// Observed latency in milliseconds.
    pub latency_ms: f64,
    /// Observed uptime percentage.
    pub uptime_pct: f64,
    /// Opaque sample timestamp. Not parsed.
    pub timestamp: String,
}

/// Body of a `POST /calculate-metrics` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRequest {
    pub data: Vec<LatencyRecord>,
}

/// Summary statistics for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    /// Mean latency, rounded to 2 decimal places.
    pub avg_latency_ms: f64,
    /// Minimum latency, rounded to 2 decimal places.
    pub min_latency_ms: f64,
    /// Maximum latency, rounded to 2 decimal places.
    pub max_latency_ms: f64,
    /// Mean uptime, rounded to 2 decimal places.
    pub avg_uptime_pct: f64,
    /// Number of records in the region.
    pub record_count: usize,
}

/// Per-region metrics keyed by region, in first-occurrence order.
pub type RegionReport = IndexMap<String, RegionMetrics>;

/// Static discovery document served at `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub message: String,
    pub endpoints: Vec<String>,
}

impl Default for ServiceDescriptor {
    fn default() -> Self {
        Self {
            message: "Latency Metrics API".to_string(),
            endpoints: vec!["/calculate-metrics".to_string()],
        }
    }
}
