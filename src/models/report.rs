//! Aggregate result data models

use crate::types::TrendDirection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-metric aggregate values inside one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Arithmetic mean of the metric in this bucket
    pub avg: f64,
    /// Smallest observed value
    pub min: f64,
    /// Largest observed value
    pub max: f64,
}

impl MetricSummary {
    /// Neutral summary for a bucket with no matching records.
    ///
    /// Zero-valued rather than absent so consumers can render a continuous
    /// axis without special-casing gaps.
    pub fn zero() -> Self {
        Self {
            avg: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }
}

/// One time-unit slot with its aggregated metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    /// Sortable bucket label ("08", "2026-03-14", "2026-W11", "2026-03")
    pub key: String,

    /// Start of the span this bucket covers. Hour-of-day buckets recur each
    /// day of the window, so they carry the full request range here.
    pub range_start: DateTime<Utc>,

    /// End of the span this bucket covers (exclusive)
    pub range_end: DateTime<Utc>,

    /// Number of records assigned to this bucket
    pub count: usize,

    /// Aggregates per metric name; zero-valued when `count` is 0
    pub metrics: HashMap<String, MetricSummary>,
}

impl Bucket {
    /// Get the summary for a metric, if present
    pub fn metric(&self, name: &str) -> Option<&MetricSummary> {
        self.metrics.get(name)
    }

    /// Average for a metric, defaulting to the neutral zero
    pub fn avg(&self, name: &str) -> f64 {
        self.metrics.get(name).map(|s| s.avg).unwrap_or(0.0)
    }
}

/// Trend classification for one metric over the requested period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResult {
    /// Metric the trend was computed for
    pub metric_name: String,

    /// Direction classification
    pub direction: TrendDirection,

    /// Second-half mean minus first-half mean, in the metric's native unit
    pub change: f64,

    /// Coefficient of variation of the period averages, as a percentage
    pub volatility_pct: f64,
}

/// Per-subject performance aggregate for the utilization leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRow {
    /// Machine or operator identifier
    pub subject_id: String,

    /// Total tests attributed to this subject in range
    pub total: usize,

    /// Tests with a pass outcome
    pub pass_count: usize,

    /// Tests with a fail outcome
    pub fail_count: usize,

    /// Pass percentage over all tests (0 when no tests)
    pub pass_rate: f64,

    /// Tests per distinct active day (0 when no active days)
    pub tests_per_day: f64,

    /// Distinct calendar dates with at least one record
    pub active_days: usize,

    /// Active days over working days, as a percentage. Not capped at 100:
    /// weekend activity counts as active days but not as working days.
    pub utilization_rate: f64,

    /// Distinct compound/material types handled
    pub distinct_materials: usize,

    /// Distinct counterpart machines or operators
    pub distinct_counterparts: usize,
}

impl PerformanceRow {
    /// All-zero row for a subject with no records in range
    pub fn empty<S: Into<String>>(subject_id: S) -> Self {
        Self {
            subject_id: subject_id.into(),
            total: 0,
            pass_count: 0,
            fail_count: 0,
            pass_rate: 0.0,
            tests_per_day: 0.0,
            active_days: 0,
            utilization_rate: 0.0,
            distinct_materials: 0,
            distinct_counterparts: 0,
        }
    }
}
