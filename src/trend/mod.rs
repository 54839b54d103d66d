//! Trend classification and volatility over per-period averages

use crate::models::TrendResult;
use crate::stats;
use crate::types::TrendDirection;

/// Default classification threshold, in the metric's native unit
pub const DEFAULT_CHANGE_THRESHOLD: f64 = 1.0;

/// Classifies trend direction and volatility for one metric's ordered
/// sequence of per-period averages (typically daily output of the period
/// aggregator).
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    /// Absolute change beyond which a trend counts as increasing/decreasing.
    /// Not normalized: the unit is the metric's own scale (°C, %, Nm).
    change_threshold: f64,
}

impl TrendAnalyzer {
    /// Create an analyzer with a custom classification threshold
    pub fn new(change_threshold: f64) -> Self {
        Self { change_threshold }
    }

    /// Analyze one metric series.
    ///
    /// The sequence splits into a leading half of `ceil(n/2)` elements and a
    /// trailing half starting at index `floor(n/2)`. For odd-length input the
    /// middle element is counted in both halves, matching the dashboards this
    /// engine consolidates.
    pub fn analyze<S: Into<String>>(&self, metric_name: S, period_averages: &[f64]) -> TrendResult {
        let n = period_averages.len();
        if n < 2 {
            return TrendResult {
                metric_name: metric_name.into(),
                direction: TrendDirection::Stable,
                change: 0.0,
                volatility_pct: 0.0,
            };
        }

        let first_half = &period_averages[..n.div_ceil(2)];
        let second_half = &period_averages[n / 2..];

        let change = stats::mean(second_half) - stats::mean(first_half);

        let direction = if change > self.change_threshold {
            TrendDirection::Increasing
        } else if change < -self.change_threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        TrendResult {
            metric_name: metric_name.into(),
            direction,
            change,
            volatility_pct: volatility_pct(period_averages),
        }
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_THRESHOLD)
    }
}

/// Coefficient of variation as a percentage: `stddev / mean * 100`.
///
/// A zero mean yields 0 rather than a division error.
pub fn volatility_pct(values: &[f64]) -> f64 {
    let avg = stats::mean(values);
    if avg == 0.0 {
        return 0.0;
    }
    stats::stddev(values) / avg * 100.0
}
