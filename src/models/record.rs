//! Input record and request data models

use crate::error::{AppError, Result};
use crate::types::{EvalOutcome, Granularity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single time-stamped reading produced by the persistence layer.
///
/// Dimensions carry identity (location, machine, operator); metrics carry the
/// numeric fields to aggregate (temperature, humidity, torque). Records are
/// immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    /// When the reading was taken
    pub timestamp: DateTime<Utc>,

    /// Identity labels for this reading (e.g. location, sensor id)
    pub dimensions: HashMap<String, String>,

    /// Numeric fields to aggregate, keyed by metric name
    pub metrics: HashMap<String, f64>,
}

impl MetricRecord {
    /// Create a new record with no dimensions or metrics
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            dimensions: HashMap::new(),
            metrics: HashMap::new(),
        }
    }

    /// Attach a dimension label
    pub fn with_dimension<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.dimensions.insert(key.into(), value.into());
        self
    }

    /// Attach a numeric metric field
    pub fn with_metric<K: Into<String>>(mut self, name: K, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Get a metric field value, if the record carries it
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Get a dimension label, if the record carries it
    pub fn dimension(&self, key: &str) -> Option<&str> {
        self.dimensions.get(key).map(String::as_str)
    }
}

/// A test/production record for machine- and operator-performance reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    /// Machine or operator the record is attributed to
    pub subject_id: String,

    /// Evaluation outcome of this test
    pub outcome: EvalOutcome,

    /// When the test was run
    pub timestamp: DateTime<Utc>,

    /// Compound/material type handled, if recorded
    pub material: Option<String>,

    /// The other party of the test: the machine an operator used, or the
    /// operator who ran the machine
    pub counterpart: Option<String>,
}

impl TestRecord {
    /// Create a new test record
    pub fn new<S: Into<String>>(subject_id: S, outcome: EvalOutcome, timestamp: DateTime<Utc>) -> Self {
        Self {
            subject_id: subject_id.into(),
            outcome,
            timestamp,
            material: None,
            counterpart: None,
        }
    }

    /// Attach the compound/material type
    pub fn with_material<S: Into<String>>(mut self, material: S) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Attach the counterpart machine or operator
    pub fn with_counterpart<S: Into<String>>(mut self, counterpart: S) -> Self {
        self.counterpart = Some(counterpart.into());
        self
    }
}

/// Parameter object describing one aggregation call.
///
/// Record filtering happens upstream in the persistence layer; the filter map
/// here is an echo used only for labeling the produced report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationRequest {
    /// Inclusive start of the reporting window
    pub start: DateTime<Utc>,

    /// Inclusive end of the reporting window
    pub end: DateTime<Utc>,

    /// Bucketing granularity
    pub granularity: Granularity,

    /// Echo of the dimension filters applied upstream
    pub dimension_filters: HashMap<String, String>,
}

impl AggregationRequest {
    /// Create a new request with no filter echoes
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, granularity: Granularity) -> Self {
        Self {
            start,
            end,
            granularity,
            dimension_filters: HashMap::new(),
        }
    }

    /// Record a dimension filter echo for labeling
    pub fn with_filter<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.dimension_filters.insert(key.into(), value.into());
        self
    }

    /// Check the `start <= end` invariant
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(AppError::validation(format!(
                "Invalid date range: start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Check whether a timestamp falls inside the reporting window
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_metric_record_builder() {
        let record = MetricRecord::new(ts(2026, 3, 14, 9))
            .with_dimension("location", "curing-hall")
            .with_metric("temperature", 21.5)
            .with_metric("humidity", 48.0);

        assert_eq!(record.metric("temperature"), Some(21.5));
        assert_eq!(record.metric("pressure"), None);
        assert_eq!(record.dimension("location"), Some("curing-hall"));
        assert_eq!(record.dimension("machine"), None);
    }

    #[test]
    fn test_test_record_builder() {
        let record = TestRecord::new("MDR-02", EvalOutcome::Pass, ts(2026, 3, 14, 9))
            .with_material("NBR-70")
            .with_counterpart("operator-17");

        assert_eq!(record.subject_id, "MDR-02");
        assert!(record.outcome.is_pass());
        assert_eq!(record.material.as_deref(), Some("NBR-70"));
        assert_eq!(record.counterpart.as_deref(), Some("operator-17"));
    }

    #[test]
    fn test_request_validation() {
        let valid = AggregationRequest::new(ts(2026, 3, 1, 0), ts(2026, 3, 31, 23), Granularity::Day);
        assert!(valid.validate().is_ok());

        let inverted =
            AggregationRequest::new(ts(2026, 3, 31, 0), ts(2026, 3, 1, 0), Granularity::Day);
        let error = inverted.validate().unwrap_err();
        assert_eq!(error.category(), "VALIDATION");
    }

    #[test]
    fn test_request_contains() {
        let request =
            AggregationRequest::new(ts(2026, 3, 1, 0), ts(2026, 3, 31, 23), Granularity::Day);

        assert!(request.contains(ts(2026, 3, 15, 12)));
        assert!(request.contains(ts(2026, 3, 1, 0)));
        assert!(!request.contains(ts(2026, 4, 1, 0)));
    }

    #[test]
    fn test_request_filter_echo() {
        let request = AggregationRequest::new(ts(2026, 3, 1, 0), ts(2026, 3, 31, 23), Granularity::Hour)
            .with_filter("location", "mixing-line-2");

        assert_eq!(
            request.dimension_filters.get("location").map(String::as_str),
            Some("mixing-line-2")
        );
    }
}
