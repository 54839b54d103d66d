//! Machine- and operator-utilization aggregates and the ranked leaderboard

use crate::models::{PerformanceRow, TestRecord};
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc, Weekday};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Computes per-subject performance rows for test/production records inside
/// one reporting window.
#[derive(Debug, Clone)]
pub struct UtilizationCalculator {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Mutable tallies accumulated per subject before the rows are finalized
#[derive(Default)]
struct SubjectTally {
    total: usize,
    pass_count: usize,
    fail_count: usize,
    active_days: BTreeSet<NaiveDate>,
    materials: HashSet<String>,
    counterparts: HashSet<String>,
}

impl UtilizationCalculator {
    /// Create a calculator for the inclusive `[start, end]` window
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Build the ranked leaderboard from the records alone.
    ///
    /// Subjects appear in descending test-volume order; ties keep first-
    /// encounter order (stable sort, no secondary key).
    pub fn rank(&self, records: &[TestRecord]) -> Vec<PerformanceRow> {
        self.rank_with_roster(&[], records)
    }

    /// Build the leaderboard, seeding a row for every roster subject so that
    /// machines or operators with zero records in range still show up with
    /// neutral values.
    pub fn rank_with_roster(&self, roster: &[String], records: &[TestRecord]) -> Vec<PerformanceRow> {
        let mut order: Vec<String> = Vec::new();
        let mut tallies: HashMap<String, SubjectTally> = HashMap::new();

        for subject in roster {
            if !tallies.contains_key(subject) {
                order.push(subject.clone());
                tallies.insert(subject.clone(), SubjectTally::default());
            }
        }

        for record in records {
            if record.timestamp < self.start || record.timestamp > self.end {
                continue;
            }

            if !tallies.contains_key(&record.subject_id) {
                order.push(record.subject_id.clone());
            }
            let tally = tallies.entry(record.subject_id.clone()).or_default();

            tally.total += 1;
            if record.outcome.is_pass() {
                tally.pass_count += 1;
            } else if record.outcome.is_fail() {
                tally.fail_count += 1;
            }
            tally.active_days.insert(record.timestamp.date_naive());
            if let Some(material) = &record.material {
                tally.materials.insert(material.clone());
            }
            if let Some(counterpart) = &record.counterpart {
                tally.counterparts.insert(counterpart.clone());
            }
        }

        let working_days = working_days(self.start, self.end);

        let mut rows: Vec<PerformanceRow> = order
            .into_iter()
            .map(|subject_id| {
                let tally = tallies.remove(&subject_id).unwrap_or_default();
                finalize_row(subject_id, tally, working_days)
            })
            .collect();

        // Stable sort keeps encounter order for equal volumes
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }

    /// Number of Monday-Friday calendar dates inside this window
    pub fn working_days(&self) -> usize {
        working_days(self.start, self.end)
    }
}

fn finalize_row(subject_id: String, tally: SubjectTally, working_days: usize) -> PerformanceRow {
    let total = tally.total;
    let active_days = tally.active_days.len();

    let pass_rate = if total > 0 {
        tally.pass_count as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let tests_per_day = if active_days > 0 {
        total as f64 / active_days as f64
    } else {
        0.0
    };

    // Weekend activity still counts as active days, so this can exceed 100
    let utilization_rate = if working_days > 0 {
        active_days as f64 / working_days as f64 * 100.0
    } else {
        0.0
    };

    PerformanceRow {
        subject_id,
        total,
        pass_count: tally.pass_count,
        fail_count: tally.fail_count,
        pass_rate,
        tests_per_day,
        active_days,
        utilization_rate,
        distinct_materials: tally.materials.len(),
        distinct_counterparts: tally.counterparts.len(),
    }
}

/// Count Monday-Friday calendar dates in `[start, end]` inclusive.
///
/// No holiday calendar: weekends are excluded unconditionally and nothing
/// else is.
pub fn working_days(start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
    let mut day = start.date_naive();
    let last = end.date_naive();
    let mut count = 0;
    while day <= last {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        day += TimeDelta::days(1);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EvalOutcome;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn record(subject: &str, outcome: EvalOutcome, y: i32, m: u32, d: u32, h: u32) -> TestRecord {
        TestRecord::new(subject, outcome, ts(y, m, d, h))
    }

    #[test]
    fn test_working_days_full_week() {
        // 2026-03-02 (Mon) through 2026-03-08 (Sun)
        assert_eq!(working_days(ts(2026, 3, 2, 0), ts(2026, 3, 8, 23)), 5);
    }

    #[test]
    fn test_working_days_single_days() {
        // A lone Wednesday
        assert_eq!(working_days(ts(2026, 3, 4, 0), ts(2026, 3, 4, 23)), 1);
        // A lone Saturday
        assert_eq!(working_days(ts(2026, 3, 7, 0), ts(2026, 3, 7, 23)), 0);
    }

    #[test]
    fn test_tallies_and_pass_rate() {
        let calc = UtilizationCalculator::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23));
        let records = vec![
            record("MDR-02", EvalOutcome::Pass, 2026, 3, 2, 9),
            record("MDR-02", EvalOutcome::Pass, 2026, 3, 2, 14),
            record("MDR-02", EvalOutcome::Fail, 2026, 3, 3, 9),
            record("MDR-02", EvalOutcome::Other, 2026, 3, 4, 9),
        ];

        let rows = calc.rank(&records);
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.total, 4);
        assert_eq!(row.pass_count, 2);
        assert_eq!(row.fail_count, 1);
        assert_eq!(row.pass_rate, 50.0);
        assert_eq!(row.active_days, 3);
        assert!((row.tests_per_day - 4.0 / 3.0).abs() < 1e-10);
        // 3 active days over 5 working days
        assert_eq!(row.utilization_rate, 60.0);
    }

    #[test]
    fn test_ranking_by_volume_with_stable_ties() {
        let calc = UtilizationCalculator::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23));
        let records = vec![
            record("low-volume", EvalOutcome::Pass, 2026, 3, 2, 8),
            record("tie-a", EvalOutcome::Pass, 2026, 3, 2, 9),
            record("tie-a", EvalOutcome::Pass, 2026, 3, 3, 9),
            record("tie-b", EvalOutcome::Pass, 2026, 3, 2, 10),
            record("tie-b", EvalOutcome::Fail, 2026, 3, 3, 10),
        ];

        let rows = calc.rank(&records);
        let ids: Vec<&str> = rows.iter().map(|r| r.subject_id.as_str()).collect();
        // tie-a encountered before tie-b, both at volume 2
        assert_eq!(ids, ["tie-a", "tie-b", "low-volume"]);
    }

    #[test]
    fn test_roster_subject_with_no_records() {
        let calc = UtilizationCalculator::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23));
        let roster = vec!["idle-press".to_string(), "MDR-02".to_string()];
        let records = vec![record("MDR-02", EvalOutcome::Pass, 2026, 3, 2, 9)];

        let rows = calc.rank_with_roster(&roster, &records);
        assert_eq!(rows.len(), 2);

        let idle = rows.iter().find(|r| r.subject_id == "idle-press").unwrap();
        assert_eq!(idle.total, 0);
        assert_eq!(idle.pass_rate, 0.0);
        assert_eq!(idle.tests_per_day, 0.0);
        assert_eq!(idle.utilization_rate, 0.0);
    }

    #[test]
    fn test_weekend_activity_exceeds_100_percent() {
        // Window is one Saturday: zero working days means rate clamps to 0
        let saturday_only = UtilizationCalculator::new(ts(2026, 3, 7, 0), ts(2026, 3, 7, 23));
        let weekend_record = vec![record("MDR-02", EvalOutcome::Pass, 2026, 3, 7, 9)];
        assert_eq!(saturday_only.rank(&weekend_record)[0].utilization_rate, 0.0);

        // Friday through Saturday: 2 active days over 1 working day = 200%
        let calc = UtilizationCalculator::new(ts(2026, 3, 6, 0), ts(2026, 3, 7, 23));
        let records = vec![
            record("MDR-02", EvalOutcome::Pass, 2026, 3, 6, 9),
            record("MDR-02", EvalOutcome::Pass, 2026, 3, 7, 9),
        ];
        assert_eq!(calc.rank(&records)[0].utilization_rate, 200.0);
    }

    #[test]
    fn test_secondary_distinct_counts() {
        let calc = UtilizationCalculator::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23));
        let records = vec![
            record("operator-17", EvalOutcome::Pass, 2026, 3, 2, 9)
                .with_material("NBR-70")
                .with_counterpart("MDR-02"),
            record("operator-17", EvalOutcome::Pass, 2026, 3, 2, 11)
                .with_material("NBR-70")
                .with_counterpart("MDR-03"),
            record("operator-17", EvalOutcome::Pass, 2026, 3, 3, 9)
                .with_material("EPDM-60")
                .with_counterpart("MDR-02"),
        ];

        let row = &calc.rank(&records)[0];
        assert_eq!(row.distinct_materials, 2);
        assert_eq!(row.distinct_counterparts, 2);
    }

    #[test]
    fn test_records_outside_window_ignored() {
        let calc = UtilizationCalculator::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23));
        let records = vec![
            record("MDR-02", EvalOutcome::Pass, 2026, 3, 4, 9),
            record("MDR-02", EvalOutcome::Pass, 2026, 2, 4, 9),
        ];

        let rows = calc.rank(&records);
        assert_eq!(rows[0].total, 1);
    }

    #[test]
    fn test_empty_input() {
        let calc = UtilizationCalculator::new(ts(2026, 3, 2, 0), ts(2026, 3, 6, 23));
        assert!(calc.rank(&[]).is_empty());
    }
}
