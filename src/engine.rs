//! Engine facade consolidating the dashboard analytics pipeline
//!
//! The climate and machine/operator dashboards all feed a filtered record
//! set and a request shape through the same three steps: bucket by period,
//! classify per-metric trends, and (for the performance views) rank
//! subjects. This facade is that single shared path; it keeps no state
//! between calls.

use crate::aggregate;
use crate::error::Result;
use crate::logging::{LogLevel, Logger};
use crate::models::{
    AggregationRequest, Bucket, MetricRecord, PerformanceRow, TestRecord, TrendResult,
};
use crate::trend::TrendAnalyzer;
use crate::utilization::UtilizationCalculator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configuration for the insight engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Absolute change threshold for trend classification, in each metric's
    /// native unit
    pub trend_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_threshold: crate::defaults::DEFAULT_TREND_THRESHOLD,
        }
    }
}

/// Full aggregation result for one dashboard request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    /// Echo of the request, for labeling downstream
    pub request: AggregationRequest,

    /// Period buckets in ascending key order
    pub buckets: Vec<Bucket>,

    /// One trend per metric name, computed over the bucket averages
    pub trends: Vec<TrendResult>,

    /// When this report was generated
    pub generated_at: DateTime<Utc>,
}

/// Statistics and trend-reporting engine behind the dashboards
pub struct InsightEngine {
    config: EngineConfig,
    logger: Logger,
}

impl InsightEngine {
    /// Create a new engine
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            logger: Logger::new("insight-engine", LogLevel::Warn),
        }
    }

    /// Create an engine with default configuration
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Replace the logger (e.g. to share the caller's sink or correlation ID)
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Run the aggregation pipeline for one request.
    ///
    /// Records are assumed pre-filtered by the persistence layer; an empty
    /// set is not an error and produces a fully zero-filled axis. Only an
    /// inverted date range is rejected.
    pub fn analyze(
        &self,
        records: &[MetricRecord],
        request: &AggregationRequest,
    ) -> Result<InsightReport> {
        request.validate()?;

        let buckets = aggregate::aggregate(records, request)?;

        let analyzer = TrendAnalyzer::new(self.config.trend_threshold);
        let mut metric_names: Vec<String> = buckets
            .first()
            .map(|b| b.metrics.keys().cloned().collect())
            .unwrap_or_default();
        metric_names.sort_unstable();

        let trends = metric_names
            .into_iter()
            .map(|name| {
                let series: Vec<f64> = buckets.iter().map(|b| b.avg(&name)).collect();
                analyzer.analyze(name, &series)
            })
            .collect::<Vec<TrendResult>>();

        self.logger.debug(format!(
            "analyzed {} records into {} {} buckets, {} trends",
            records.len(),
            buckets.len(),
            request.granularity.name(),
            trends.len()
        ));

        Ok(InsightReport {
            request: request.clone(),
            buckets,
            trends,
            generated_at: Utc::now(),
        })
    }

    /// Build the performance leaderboard for test/production records
    pub fn utilization(
        &self,
        records: &[TestRecord],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PerformanceRow>> {
        self.utilization_with_roster(&[], records, start, end)
    }

    /// Leaderboard variant seeding rows for every roster subject, so idle
    /// machines and operators still appear with neutral values
    pub fn utilization_with_roster(
        &self,
        roster: &[String],
        records: &[TestRecord],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PerformanceRow>> {
        if start > end {
            return Err(crate::error::AppError::validation(format!(
                "Invalid date range: start {} is after end {}",
                start, end
            )));
        }

        let calculator = UtilizationCalculator::new(start, end);
        let rows = calculator.rank_with_roster(roster, records);

        self.logger.debug(format!(
            "ranked {} subjects over {} working days",
            rows.len(),
            calculator.working_days()
        ));

        Ok(rows)
    }

    /// Export a report to pretty-printed JSON
    pub fn export_json(&self, report: &InsightReport) -> Result<String> {
        serde_json::to_string_pretty(report).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EvalOutcome, Granularity, TrendDirection};
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn daily_temps(temps: &[f64]) -> Vec<MetricRecord> {
        temps
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                MetricRecord::new(ts(2026, 3, 2 + i as u32, 12)).with_metric("temperature", t)
            })
            .collect()
    }

    #[test]
    fn test_analyze_produces_buckets_and_trends() {
        let engine = InsightEngine::with_defaults();
        let records = daily_temps(&[20.0, 21.0, 23.0, 22.0, 30.0]);
        let request =
            AggregationRequest::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23), Granularity::Day);

        let report = engine.analyze(&records, &request).unwrap();

        assert_eq!(report.buckets.len(), 5);
        assert_eq!(report.trends.len(), 1);

        let trend = &report.trends[0];
        assert_eq!(trend.metric_name, "temperature");
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert!((trend.change - 3.6667).abs() < 1e-3);
    }

    #[test]
    fn test_analyze_rejects_inverted_range() {
        let engine = InsightEngine::with_defaults();
        let request =
            AggregationRequest::new(ts(2026, 3, 6, 0), ts(2026, 3, 2, 0), Granularity::Day);

        let error = engine.analyze(&[], &request).unwrap_err();
        assert_eq!(error.category(), "VALIDATION");
    }

    #[test]
    fn test_analyze_empty_records_is_not_an_error() {
        let engine = InsightEngine::with_defaults();
        let request =
            AggregationRequest::new(ts(2026, 3, 2, 0), ts(2026, 3, 4, 23), Granularity::Day);

        let report = engine.analyze(&[], &request).unwrap();
        assert_eq!(report.buckets.len(), 3);
        assert!(report.trends.is_empty());
        assert!(report.buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_custom_trend_threshold() {
        let engine = InsightEngine::new(EngineConfig {
            trend_threshold: 10.0,
        });
        let records = daily_temps(&[20.0, 21.0, 23.0, 22.0, 30.0]);
        let request =
            AggregationRequest::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23), Granularity::Day);

        let report = engine.analyze(&records, &request).unwrap();
        // change of 3.67 stays inside the widened band
        assert_eq!(report.trends[0].direction, TrendDirection::Stable);
    }

    #[test]
    fn test_utilization_delegates() {
        let engine = InsightEngine::with_defaults();
        let records = vec![
            TestRecord::new("MDR-02", EvalOutcome::Pass, ts(2026, 3, 2, 9)),
            TestRecord::new("MDR-02", EvalOutcome::Fail, ts(2026, 3, 3, 9)),
        ];

        let rows = engine
            .utilization(&records, ts(2026, 3, 2, 0), ts(2026, 3, 6, 23))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pass_rate, 50.0);

        let error = engine
            .utilization(&records, ts(2026, 3, 6, 0), ts(2026, 3, 2, 0))
            .unwrap_err();
        assert_eq!(error.category(), "VALIDATION");
    }

    #[test]
    fn test_export_json() {
        let engine = InsightEngine::with_defaults();
        let request =
            AggregationRequest::new(ts(2026, 3, 2, 0), ts(2026, 3, 3, 23), Granularity::Day);
        let report = engine.analyze(&[], &request).unwrap();

        let json = engine.export_json(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["buckets"].as_array().unwrap().len(), 2);
    }
}
