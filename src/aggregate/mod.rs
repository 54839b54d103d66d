//! Period aggregation: bucketing ordered records by a requested granularity
//!
//! Produces the full bucket axis implied by the request range, zero-filling
//! slots with no matching records so dashboard consumers can render a
//! continuous axis without special-casing gaps.

use crate::error::Result;
use crate::models::{AggregationRequest, Bucket, MetricRecord, MetricSummary};
use crate::stats;
use crate::types::Granularity;
use chrono::{DateTime, Datelike, IsoWeek, NaiveDate, TimeDelta, TimeZone, Timelike, Utc};
use std::collections::{BTreeSet, HashMap};

/// Bucket a record set by the requested granularity and compute per-bucket
/// aggregates.
///
/// Records are assumed already filtered to the request window and by any
/// dimension filters; records outside the window are skipped rather than
/// failing the call. Buckets come back in ascending key order regardless of
/// input order.
pub fn aggregate(records: &[MetricRecord], request: &AggregationRequest) -> Result<Vec<Bucket>> {
    let spans = bucket_spans(request);

    let mut index: HashMap<String, usize> = HashMap::with_capacity(spans.len());
    for (i, (key, _, _)) in spans.iter().enumerate() {
        index.insert(key.clone(), i);
    }

    // Union of metric names across the whole set, so empty buckets still
    // carry every series the consumer will chart
    let metric_names: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.metrics.keys().map(String::as_str))
        .collect();

    let mut counts = vec![0usize; spans.len()];
    let mut samples: Vec<HashMap<&str, Vec<f64>>> = vec![HashMap::new(); spans.len()];

    for record in records {
        if !request.contains(record.timestamp) {
            continue;
        }
        let key = bucket_key(record.timestamp, request.granularity);
        let Some(&slot) = index.get(&key) else {
            continue;
        };

        counts[slot] += 1;
        for (name, &value) in &record.metrics {
            samples[slot].entry(name.as_str()).or_default().push(value);
        }
    }

    let buckets = spans
        .into_iter()
        .enumerate()
        .map(|(slot, (key, range_start, range_end))| {
            let metrics = metric_names
                .iter()
                .map(|&name| {
                    let summary = match samples[slot].get(name) {
                        Some(values) if !values.is_empty() => MetricSummary {
                            avg: stats::mean(values),
                            min: values.iter().cloned().fold(f64::INFINITY, f64::min),
                            max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                        },
                        _ => MetricSummary::zero(),
                    };
                    (name.to_string(), summary)
                })
                .collect();

            Bucket {
                key,
                range_start,
                range_end,
                count: counts[slot],
                metrics,
            }
        })
        .collect();

    Ok(buckets)
}

/// Bucket key for a timestamp at the given granularity
pub fn bucket_key(timestamp: DateTime<Utc>, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hour => format!("{:02}", timestamp.hour()),
        Granularity::Day => timestamp.date_naive().format("%Y-%m-%d").to_string(),
        Granularity::Week => format_week(timestamp.date_naive().iso_week()),
        Granularity::Month => format!("{:04}-{:02}", timestamp.year(), timestamp.month()),
    }
}

/// The full ordered set of bucket keys implied by the request, each with the
/// span it covers.
///
/// Hour-of-day is a recurring clock axis, so all 24 slots exist no matter how
/// long the window is and each carries the whole request range. Calendar
/// granularities carry their own span with an exclusive end.
fn bucket_spans(request: &AggregationRequest) -> Vec<(String, DateTime<Utc>, DateTime<Utc>)> {
    match request.granularity {
        Granularity::Hour => (0..24)
            .map(|h| (format!("{:02}", h), request.start, request.end))
            .collect(),
        Granularity::Day => {
            let mut spans = Vec::new();
            let mut day = request.start.date_naive();
            let last = request.end.date_naive();
            while day <= last {
                spans.push((
                    day.format("%Y-%m-%d").to_string(),
                    day_start(day),
                    day_start(day + TimeDelta::days(1)),
                ));
                day += TimeDelta::days(1);
            }
            spans
        }
        Granularity::Week => {
            let mut spans = Vec::new();
            let mut monday = monday_of_week(request.start.date_naive().iso_week());
            let last = monday_of_week(request.end.date_naive().iso_week());
            while monday <= last {
                spans.push((
                    format_week(monday.iso_week()),
                    day_start(monday),
                    day_start(monday + TimeDelta::weeks(1)),
                ));
                monday += TimeDelta::weeks(1);
            }
            spans
        }
        Granularity::Month => {
            let mut spans = Vec::new();
            let (mut year, mut month) = (request.start.year(), request.start.month());
            let (end_year, end_month) = (request.end.year(), request.end.month());
            while (year, month) <= (end_year, end_month) {
                let first = NaiveDate::from_ymd_opt(year, month, 1)
                    .unwrap_or(request.start.date_naive());
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
                    .unwrap_or(request.end.date_naive());
                spans.push((
                    format!("{:04}-{:02}", year, month),
                    day_start(first),
                    day_start(next_first),
                ));
                (year, month) = (next_year, next_month);
            }
            spans
        }
    }
}

/// Midnight UTC for a calendar date
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is valid"))
}

/// Get the Monday (NaiveDate) of a given ISO week
fn monday_of_week(week: IsoWeek) -> NaiveDate {
    NaiveDate::from_isoywd_opt(week.year(), week.week(), chrono::Weekday::Mon)
        .expect("valid ISO week")
}

/// Format an ISO week as a sortable label, e.g. "2026-W11"
fn format_week(week: IsoWeek) -> String {
    format!("{}-W{:02}", week.year(), week.week())
}
