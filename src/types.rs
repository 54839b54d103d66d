//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Time unit used to bucket records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    /// Hour of day (00-23), a fixed 24-slot axis regardless of range length
    Hour,
    /// Calendar day
    Day,
    /// ISO week
    Week,
    /// Calendar month
    Month,
}

impl Granularity {
    /// Get a human-readable name for this granularity
    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Number of bucket slots this granularity always produces, if fixed.
    ///
    /// Only the hour-of-day axis has a fixed cardinality; calendar axes
    /// depend on the requested range.
    pub fn fixed_cardinality(&self) -> Option<usize> {
        match self {
            Granularity::Hour => Some(24),
            _ => None,
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hour" | "hourly" => Ok(Granularity::Hour),
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            _ => Err(AppError::parse(format!("Invalid granularity: {}", s))),
        }
    }
}

/// Direction of a metric trend across the requested period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    /// Second half of the period averages is more than the threshold above the first
    Increasing,
    /// Second half of the period averages is more than the threshold below the first
    Decreasing,
    /// Change stayed within the threshold band
    Stable,
}

impl TrendDirection {
    /// Get a human-readable name for this direction
    pub fn name(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Evaluation outcome recorded on a test/production record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalOutcome {
    /// Test passed
    Pass,
    /// Test failed
    Fail,
    /// Outcome pending, inconclusive, or not evaluated
    Other,
}

impl EvalOutcome {
    /// Check if this outcome counts toward the pass tally
    pub fn is_pass(&self) -> bool {
        matches!(self, EvalOutcome::Pass)
    }

    /// Check if this outcome counts toward the fail tally
    pub fn is_fail(&self) -> bool {
        matches!(self, EvalOutcome::Fail)
    }
}

impl std::str::FromStr for EvalOutcome {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pass" | "passed" | "ok" => Ok(EvalOutcome::Pass),
            "fail" | "failed" | "ng" => Ok(EvalOutcome::Fail),
            _ => Ok(EvalOutcome::Other),
        }
    }
}

/// Explicit display context for formatting and labeling steps.
///
/// Formatting code receives this as a parameter instead of reading theme or
/// locale flags from ambient session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    /// BCP 47 language tag used for labels (e.g. "en", "zh-CN")
    pub locale: String,
    /// Whether the consuming dashboard renders in dark mode
    pub dark_mode: bool,
    /// strftime pattern applied to calendar-day bucket labels
    pub date_format: String,
    /// Decimal places for percentage values in tables
    pub percent_precision: usize,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            dark_mode: false,
            date_format: "%Y-%m-%d".to_string(),
            percent_precision: 1,
        }
    }
}
