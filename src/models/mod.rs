//! Data models for records, requests, and aggregate results

pub mod record;
pub mod report;

pub use record::{AggregationRequest, MetricRecord, TestRecord};
pub use report::{Bucket, MetricSummary, PerformanceRow, TrendResult};
