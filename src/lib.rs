//! Factory Insight Engine
//!
//! Time-series statistics and trend-reporting engine behind the factory
//! operations dashboards: climate monitoring (temperature/humidity) and
//! rheometer/mixer machine- and operator-performance reports. Callers supply
//! a filtered, time-ordered record set and a request shape; the engine
//! returns immutable aggregate structures and retains no state between
//! calls.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod progress;
pub mod report;
pub mod stats;
pub mod trend;
pub mod types;
pub mod utilization;

// Re-export commonly used types
pub use engine::{EngineConfig, InsightEngine, InsightReport};
pub use error::{AppError, Result};
pub use models::{
    AggregationRequest, Bucket, MetricRecord, MetricSummary, PerformanceRow, TestRecord,
    TrendResult,
};
pub use progress::{ProgressObserver, ProgressPhase, ProgressTracker};
pub use report::{ChartData, ChartDataset, TableData};
pub use trend::TrendAnalyzer;
pub use types::{EvalOutcome, Granularity, RenderContext, TrendDirection};
pub use utilization::UtilizationCalculator;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Absolute trend-classification threshold in the metric's native unit
    pub const DEFAULT_TREND_THRESHOLD: f64 = 1.0;

    /// Minimum number of period averages required before a trend is
    /// anything but stable
    pub const MIN_TREND_PERIODS: usize = 2;

    /// Slots on the hour-of-day axis
    pub const HOURS_PER_DAY: usize = 24;
}
