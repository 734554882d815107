//! Per-tail rolling baseline of the selected metric.
//!
//! An auxiliary column for the series export — the estimation core never
//! reads it. For each row, the mean of the same tail's metric values in
//! the trailing window `(t - window, t]`, defined only once the window
//! holds enough samples.

use crate::types::{MetricKind, SeriesRow};
use chrono::Duration;
use std::collections::BTreeMap;

/// Trailing window length in days.
pub const ROLLING_WINDOW_DAYS: i64 = 30;

/// Minimum samples in the window before the baseline is defined.
pub const ROLLING_MIN_SAMPLES: usize = 5;

/// Fill `rolling_baseline` on every row; rows whose tail/window lacks
/// enough samples keep it undefined. Returns a new table.
pub fn rolling_baseline(rows: Vec<SeriesRow>, kind: MetricKind) -> Vec<SeriesRow> {
    let metric = |r: &SeriesRow| match kind {
        MetricKind::PerfFactor => r.perf_factor,
        MetricKind::FuelFlow => r.fuel_flow,
    };

    // Row indices grouped per tail, time-ordered (stable on ties).
    let mut groups: BTreeMap<Option<String>, Vec<usize>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        groups.entry(row.tail.clone()).or_default().push(idx);
    }

    let mut baselines: Vec<Option<f64>> = vec![None; rows.len()];
    let window = Duration::days(ROLLING_WINDOW_DAYS);

    for indices in groups.values() {
        let mut ordered = indices.clone();
        ordered.sort_by_key(|&i| rows[i].timestamp);

        // Two-pointer trailing window over the tail's valued samples.
        let valued: Vec<(usize, f64)> = ordered
            .iter()
            .filter_map(|&i| metric(&rows[i]).map(|v| (i, v)))
            .collect();

        let mut lo = 0usize;
        let mut hi = 0usize;
        let mut sum = 0.0;
        for &row_idx in &ordered {
            let t = rows[row_idx].timestamp;
            while hi < valued.len() && rows[valued[hi].0].timestamp <= t {
                sum += valued[hi].1;
                hi += 1;
            }
            while lo < hi && rows[valued[lo].0].timestamp <= t - window {
                sum -= valued[lo].1;
                lo += 1;
            }
            let count = hi - lo;
            if count >= ROLLING_MIN_SAMPLES {
                baselines[row_idx] = Some(sum / count as f64);
            }
        }
    }

    rows.into_iter()
        .enumerate()
        .map(|(idx, mut row)| {
            row.rolling_baseline = baselines[idx];
            row
        })
        .collect()
}
