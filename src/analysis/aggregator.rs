//! Region aggregation and statistics.
//!
//! This module groups latency records by region and reduces every
//! partition to a [`RegionMetrics`] summary.

use crate::models::{LatencyRecord, RegionMetrics, RegionReport};
use indexmap::IndexMap;
use thiserror::Error;

/// Errors produced by [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// The batch contained no records.
    #[error("No data provided")]
    EmptyInput,
}

/// Aggregate a batch of records into per-region metrics.
///
/// Regions appear in the order they are first seen in `records`.
pub fn aggregate(records: &[LatencyRecord]) -> Result<RegionReport, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let report = group_by_region(records)
        .into_iter()
        .map(|(region, partition)| {
            let metrics = summarize_partition(&partition);
            (region, metrics)
        })
        .collect();

    Ok(report)
}

/// Group records by region, keeping first-occurrence order of regions and
/// input order within each region.
pub fn group_by_region(records: &[LatencyRecord]) -> IndexMap<String, Vec<&LatencyRecord>> {
    let mut grouped: IndexMap<String, Vec<&LatencyRecord>> = IndexMap::new();

    for record in records {
        grouped
            .entry(record.region.clone())
            .or_default()
            .push(record);
    }

    grouped
}

/// Reduce one region's records to summary metrics.
///
/// `partition` must not be empty; [`group_by_region`] never produces an
/// empty partition.
pub fn summarize_partition(partition: &[&LatencyRecord]) -> RegionMetrics {
    let count = partition.len();
    let latencies = partition.iter().map(|r| r.latency_ms);

    let latency_sum: f64 = latencies.clone().sum();
    let min_latency = latencies.clone().fold(f64::INFINITY, f64::min);
    let max_latency = latencies.fold(f64::NEG_INFINITY, f64::max);
    let uptime_sum: f64 = partition.iter().map(|r| r.uptime_pct).sum();

    RegionMetrics {
        avg_latency_ms: round_to_hundredths(latency_sum / count as f64),
        min_latency_ms: round_to_hundredths(min_latency),
        max_latency_ms: round_to_hundredths(max_latency),
        avg_uptime_pct: round_to_hundredths(uptime_sum / count as f64),
        record_count: count,
    }
}

/// Values at or above this magnitude carry no fractional hundredths.
const ROUNDING_CUTOFF: f64 = 1e15;

/// Round to 2 decimal places.
///
/// Rounds the exact binary value of `value`, ties to even, so `29.575`
/// (stored as `29.57499...`) becomes `29.57`. Non-finite and very large
/// values are returned unchanged.
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_CUTOFF {
        return value;
    }

    format!("{:.2}", value).parse().unwrap_or(value)
}
