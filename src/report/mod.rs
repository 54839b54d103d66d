//! View-model shaping for chart and table consumers
//!
//! Shapes engine output into the plain serializable structures the external
//! chart-rendering adapter and tabular views expect. All labeling decisions
//! flow from an explicit [`RenderContext`] parameter, never from ambient
//! session state.

use crate::models::{Bucket, PerformanceRow};
use crate::types::{Granularity, RenderContext};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    /// Series label shown in the legend
    pub label: String,
    /// One value per axis label, zero-filled for empty buckets
    pub data: Vec<f64>,
}

/// Chart view model: `{labels, datasets}` as the chart adapter expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Axis labels, one per bucket, in bucket order
    pub labels: Vec<String>,
    /// Plotted series, one per metric
    pub datasets: Vec<ChartDataset>,
}

/// Tabular view model for the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Column headers
    pub headers: Vec<String>,
    /// Row cells, pre-formatted per the render context
    pub rows: Vec<Vec<String>>,
}

/// Shape buckets into a chart view model, one dataset per metric name.
///
/// Metric names come from the buckets themselves (their union is identical
/// across buckets by construction) and are emitted in sorted order so the
/// legend is deterministic.
pub fn chart_data(buckets: &[Bucket], granularity: Granularity, ctx: &RenderContext) -> ChartData {
    let labels = buckets
        .iter()
        .map(|b| bucket_label(&b.key, granularity, ctx))
        .collect();

    let mut metric_names: Vec<&str> = buckets
        .first()
        .map(|b| b.metrics.keys().map(String::as_str).collect())
        .unwrap_or_default();
    metric_names.sort_unstable();

    let datasets = metric_names
        .into_iter()
        .map(|name| ChartDataset {
            label: name.to_string(),
            data: buckets.iter().map(|b| b.avg(name)).collect(),
        })
        .collect();

    ChartData { labels, datasets }
}

/// Shape performance rows into the leaderboard table
pub fn leaderboard_table(rows: &[PerformanceRow], ctx: &RenderContext) -> TableData {
    let headers = vec![
        localized(ctx, "Subject", "对象"),
        localized(ctx, "Tests", "测试数"),
        localized(ctx, "Pass rate", "合格率"),
        localized(ctx, "Tests/day", "日均测试"),
        localized(ctx, "Utilization", "稼动率"),
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                row.subject_id.clone(),
                row.total.to_string(),
                format_percent(row.pass_rate, ctx),
                format!("{:.1}", row.tests_per_day),
                format_percent(row.utilization_rate, ctx),
            ]
        })
        .collect();

    TableData {
        headers,
        rows: table_rows,
    }
}

/// Format a percentage per the context's precision
pub fn format_percent(value: f64, ctx: &RenderContext) -> String {
    format!("{:.*}%", ctx.percent_precision, value)
}

/// Axis label for one bucket key.
///
/// Hour keys become clock labels; day keys re-format through the context's
/// date pattern; week and month keys are already presentation-ready.
fn bucket_label(key: &str, granularity: Granularity, ctx: &RenderContext) -> String {
    match granularity {
        Granularity::Hour => format!("{}:00", key),
        Granularity::Day => NaiveDate::parse_from_str(key, "%Y-%m-%d")
            .map(|d| d.format(&ctx.date_format).to_string())
            .unwrap_or_else(|_| key.to_string()),
        Granularity::Week | Granularity::Month => key.to_string(),
    }
}

fn localized(ctx: &RenderContext, en: &str, zh: &str) -> String {
    if ctx.locale.starts_with("zh") {
        zh.to_string()
    } else {
        en.to_string()
    }
}
