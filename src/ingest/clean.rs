//! Series-table cleaning: duplicate removal and plausibility flags.
//!
//! Both functions return a new table; the caller's table is consumed, not
//! mutated behind its back.

use crate::types::SeriesRow;
use chrono::{Datelike, NaiveDateTime};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Drop exact (tail, timestamp) duplicates, keeping the first occurrence
/// in file order.
pub fn remove_duplicates(rows: Vec<SeriesRow>) -> Vec<SeriesRow> {
    let mut seen: HashSet<(Option<String>, NaiveDateTime)> = HashSet::with_capacity(rows.len());
    let before = rows.len();

    let deduped: Vec<SeriesRow> = rows
        .into_iter()
        .filter(|r| seen.insert((r.tail.clone(), r.timestamp)))
        .collect();

    let removed = before - deduped.len();
    if removed > 0 {
        warn!(removed, "Duplicate (tail, timestamp) series rows removed");
    }
    deduped
}

/// Flag rows whose timestamp year is below the configured minimum.
/// Suspect rows stay in the table — flagging is for the reporting
/// collaborator, not a drop filter.
pub fn flag_plausible_years(rows: Vec<SeriesRow>, min_year: i32) -> Vec<SeriesRow> {
    let mut implausible = 0usize;

    let flagged: Vec<SeriesRow> = rows
        .into_iter()
        .map(|mut r| {
            r.year_plausible = r.timestamp.year() >= min_year;
            if !r.year_plausible {
                implausible += 1;
            }
            r
        })
        .collect();

    if implausible > 0 {
        debug!(implausible, min_year, "Series rows flagged with implausible years");
    }
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(tail: &str, day: u32) -> SeriesRow {
        SeriesRow::new(
            Some(tail.to_string()),
            NaiveDate::from_ymd_opt(2023, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            Some(1.0),
            None,
        )
    }

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let mut first = row("N1", 1);
        first.perf_factor = Some(1.0);
        let mut dup = row("N1", 1);
        dup.perf_factor = Some(9.0);

        let out = remove_duplicates(vec![first, dup, row("N1", 2), row("N2", 1)]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].perf_factor, Some(1.0));
    }

    #[test]
    fn test_flag_plausible_years() {
        let mut old = row("N1", 1);
        old.timestamp = NaiveDate::from_ymd_opt(1999, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let out = flag_plausible_years(vec![old, row("N1", 2)], 2020);
        assert!(!out[0].year_plausible);
        assert!(out[1].year_plausible);
    }
}
