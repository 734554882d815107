//! Interval Metrics Computer
//!
//! Per interval, this stage measures three things about the selected
//! metric:
//!
//! - `baseline_before`: mean over the previous window
//!   `[previous_event_start, interval_start)` — or, for the first event,
//!   over a fallback window of configurable length ending at the interval
//!   start (`used_fallback_baseline` is set).
//! - `mean_after`: mean over the fixed-length stabilization window
//!   `[interval_start, interval_start + stabilization_window_days)`.
//! - `drift_rate`: least-squares slope over the current window
//!   `[interval_start, interval_end)`, referenced to the interval start.
//!
//! Validity gates everything downstream: baseline and mean-after must be
//! present, both windows must meet the point-count minimums, and a
//! fallback baseline disqualifies the interval when a real previous
//! interval is required.

use super::{estimate_drift, extract_segment, mean_of, MIN_DRIFT_POINTS};
use crate::config::AnalysisParams;
use crate::types::{EventInterval, IntervalMetrics, MetricSample};
use chrono::Duration;
use tracing::{debug, info};

/// Compute one metrics record per interval. Output order follows the
/// interval sequence; the input tables are read-only.
pub fn compute_interval_metrics(
    intervals: &[EventInterval],
    samples: &[MetricSample],
    params: &AnalysisParams,
) -> Vec<IntervalMetrics> {
    let mut records = Vec::with_capacity(intervals.len());
    let mut valid_count = 0usize;
    let mut fallback_count = 0usize;

    for interval in intervals {
        let tail = interval.tail.as_deref();

        // 1. Previous window, or the fallback baseline window for the
        //    first event in the sequence.
        let (prev_start, used_fallback_baseline) = match interval.previous_event_start {
            Some(prev) => (prev, false),
            None => (
                interval.start - Duration::days(params.fallback_baseline_days),
                true,
            ),
        };
        let prev_segment = extract_segment(samples, prev_start, interval.start, tail);
        let n_points_prev = prev_segment.len();
        let baseline_before = mean_of(&prev_segment.iter().map(|s| s.value).collect::<Vec<f64>>());

        // 2. Stabilization window.
        let stab_end = interval.start + Duration::days(params.stabilization_window_days);
        let stab_segment = extract_segment(samples, interval.start, stab_end, tail);
        let mean_after = mean_of(&stab_segment.iter().map(|s| s.value).collect::<Vec<f64>>());

        // 3. Current window drift.
        let curr_segment = extract_segment(samples, interval.start, interval.end, tail);
        let n_points_curr = curr_segment.len();
        let drift_rate =
            match estimate_drift(&curr_segment, interval.start, MIN_DRIFT_POINTS, params.time_axis)
            {
                Ok(slope) => Some(slope),
                Err(reason) => {
                    debug!(
                        interval = interval.index,
                        %reason,
                        "Drift undefined for interval"
                    );
                    None
                }
            };

        // 4. Validity gate.
        let min_prev = if params.require_prev_interval {
            params.min_points_per_interval
        } else {
            1
        };
        let valid = baseline_before.is_some()
            && n_points_prev >= min_prev
            && mean_after.is_some()
            && n_points_curr >= params.min_points_per_interval
            && (!used_fallback_baseline || !params.require_prev_interval);

        valid_count += usize::from(valid);
        fallback_count += usize::from(used_fallback_baseline);

        records.push(IntervalMetrics {
            interval_index: interval.index,
            event_type: interval.event_type.clone(),
            tail: interval.tail.clone(),
            interval_start: interval.start,
            interval_end: interval.end,
            baseline_before,
            mean_after,
            drift_rate,
            n_points_prev,
            n_points_curr,
            valid,
            used_fallback_baseline,
        });
    }

    info!(
        intervals = records.len(),
        valid = valid_count,
        invalid = records.len() - valid_count,
        fallback_baselines = fallback_count,
        "Computed interval metrics"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::build_intervals;
    use crate::types::MaintenanceEvent;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 3, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn event(day: u32, event_type: &str) -> MaintenanceEvent {
        MaintenanceEvent {
            tail: None,
            timestamp: ts(day),
            event_type: event_type.to_string(),
        }
    }

    fn sample(day: u32, value: f64) -> MetricSample {
        MetricSample {
            tail: None,
            timestamp: ts(day),
            value,
        }
    }

    fn params() -> AnalysisParams {
        AnalysisParams {
            min_points_per_interval: 2,
            stabilization_window_days: 5,
            fallback_baseline_days: 10,
            ..AnalysisParams::default()
        }
    }

    #[test]
    fn test_windows_and_means() {
        // Events at day 10 and day 20; samples before, between, after.
        let intervals = build_intervals(&[event(5, "a"), event(10, "wash"), event(20, "b")]);
        let samples = vec![
            sample(6, 10.0),
            sample(8, 12.0),  // previous window of the wash interval
            sample(11, 4.0),
            sample(13, 6.0),  // stabilization (day 10..15) and current window
            sample(17, 8.0),  // current window only (day 10..20)
        ];

        let records = compute_interval_metrics(&intervals, &samples, &params());
        let wash = &records[1];

        assert_eq!(wash.event_type, "wash");
        assert!(!wash.used_fallback_baseline);
        assert_eq!(wash.baseline_before, Some(11.0));
        assert_eq!(wash.mean_after, Some(5.0));
        assert_eq!(wash.n_points_prev, 2);
        assert_eq!(wash.n_points_curr, 3);
        assert!(wash.drift_rate.is_some());
        assert!(wash.valid);
    }

    #[test]
    fn test_empty_previous_window_with_require_prev() {
        // First interval has no previous event; fallback window is empty too.
        let intervals = build_intervals(&[event(10, "wash"), event(20, "b")]);
        let samples = vec![sample(11, 4.0), sample(12, 5.0), sample(13, 6.0)];

        let mut strict = params();
        strict.require_prev_interval = true;
        let records = compute_interval_metrics(&intervals, &samples, &strict);
        assert!(!records[0].valid);
        assert_eq!(records[0].baseline_before, None);

        // Relaxed: still invalid, the fallback window has no samples.
        let records = compute_interval_metrics(&intervals, &samples, &params());
        assert!(!records[0].valid);
    }

    #[test]
    fn test_fallback_baseline_permits_validity_when_allowed() {
        // Samples inside the fallback window (day 10 back to day 1).
        let intervals = build_intervals(&[event(10, "wash"), event(20, "b")]);
        let samples = vec![
            sample(3, 9.0),
            sample(7, 11.0),
            sample(11, 4.0),
            sample(12, 5.0),
            sample(13, 6.0),
        ];

        let records = compute_interval_metrics(&intervals, &samples, &params());
        let first = &records[0];
        assert!(first.used_fallback_baseline);
        assert_eq!(first.baseline_before, Some(10.0));
        assert!(first.valid);

        // The same interval with require_prev_interval = true must be invalid.
        let mut strict = params();
        strict.require_prev_interval = true;
        let records = compute_interval_metrics(&intervals, &samples, &strict);
        assert!(!records[0].valid);
    }

    #[test]
    fn test_below_minimum_current_window_invalidates() {
        let intervals = build_intervals(&[event(5, "a"), event(10, "wash"), event(20, "b")]);
        // Only one sample in the wash interval's current window.
        let samples = vec![sample(6, 10.0), sample(8, 12.0), sample(11, 4.0)];

        let records = compute_interval_metrics(&intervals, &samples, &params());
        let wash = &records[1];
        assert_eq!(wash.n_points_curr, 1);
        assert!(!wash.valid);
        // Drift is also undefined with a single point — uniform sentinel.
        assert_eq!(wash.drift_rate, None);
    }

    #[test]
    fn test_per_tail_extraction() {
        let mut ev = event(10, "wash");
        ev.tail = Some("N1".to_string());
        let mut ev2 = event(20, "b");
        ev2.tail = Some("N1".to_string());
        let intervals = build_intervals(&[ev, ev2]);

        let mut other = sample(12, 100.0);
        other.tail = Some("N2".to_string());
        let mut own1 = sample(11, 4.0);
        own1.tail = Some("N1".to_string());
        let mut own2 = sample(12, 6.0);
        own2.tail = Some("N1".to_string());

        let records =
            compute_interval_metrics(&intervals, &[other, own1, own2], &params());
        // The N2 sample is filtered out of the N1-scoped interval.
        assert_eq!(records[0].n_points_curr, 2);
        assert_eq!(records[0].mean_after, Some(5.0));
    }
}
