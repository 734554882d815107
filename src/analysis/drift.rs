//! Drift Estimator — degree-1 least-squares fit of a metric segment
//! against an elapsed-time axis.
//!
//! The slope is the non-maintenance degradation reference (metric per time
//! unit). Undefined outcomes keep their reason internally but degrade to
//! one uniform sentinel at the public record level.

use crate::config::TimeAxis;
use crate::types::{InsufficientData, MetricSample};

/// Minimum points for a line fit. Callers may require more.
pub const MIN_DRIFT_POINTS: usize = 2;

/// Fit `value = slope * elapsed + intercept` over the segment and return
/// the slope.
///
/// The elapsed axis is relative to `reference` in the configured unit; on
/// the `index` axis it is the sample position. Closed-form least squares:
///
/// slope = (n·Σty − Σt·Σy) / (n·Σt² − (Σt)²)
///
/// Undefined when the segment has fewer than `min_points.max(2)` samples
/// or the elapsed axis has zero range.
pub fn estimate_drift(
    segment: &[&MetricSample],
    reference: chrono::NaiveDateTime,
    min_points: usize,
    axis: TimeAxis,
) -> Result<f64, InsufficientData> {
    if segment.is_empty() {
        return Err(InsufficientData::EmptySegment);
    }
    let need = min_points.max(MIN_DRIFT_POINTS);
    if segment.len() < need {
        return Err(InsufficientData::BelowMinimum {
            have: segment.len(),
            need,
        });
    }

    let t: Vec<f64> = match axis {
        TimeAxis::Index => (0..segment.len()).map(|i| i as f64).collect(),
        TimeAxis::Days | TimeAxis::Hours => segment
            .iter()
            .map(|s| axis.elapsed(reference, s.timestamp))
            .collect(),
    };

    let t_min = t.iter().copied().fold(f64::INFINITY, f64::min);
    let t_max = t.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if t_max - t_min <= 0.0 {
        return Err(InsufficientData::ZeroTimeRange);
    }

    let n = t.len() as f64;
    let sum_t: f64 = t.iter().sum();
    let sum_y: f64 = segment.iter().map(|s| s.value).sum();
    let sum_ty: f64 = t.iter().zip(segment.iter()).map(|(ti, s)| ti * s.value).sum();
    let sum_t2: f64 = t.iter().map(|ti| ti * ti).sum();

    Ok((n * sum_ty - sum_t * sum_y) / (n * sum_t2 - sum_t * sum_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn ref_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_at(days: i64, value: f64) -> MetricSample {
        MetricSample {
            tail: None,
            timestamp: ref_time() + Duration::days(days),
            value,
        }
    }

    #[test]
    fn test_perfect_linear_segment() {
        // y = 3t + 7 over days 0, 2, 5, 9
        let samples: Vec<MetricSample> = [0, 2, 5, 9]
            .iter()
            .map(|&d| sample_at(d, 3.0 * d as f64 + 7.0))
            .collect();
        let refs: Vec<&MetricSample> = samples.iter().collect();

        let slope = estimate_drift(&refs, ref_time(), 2, TimeAxis::Days).unwrap();
        assert!((slope - 3.0).abs() < 1e-9, "slope = {slope}");
    }

    #[test]
    fn test_hours_axis_scales_slope() {
        // 3 per day is 0.125 per hour
        let samples: Vec<MetricSample> = [0, 2, 4]
            .iter()
            .map(|&d| sample_at(d, 3.0 * d as f64))
            .collect();
        let refs: Vec<&MetricSample> = samples.iter().collect();

        let slope = estimate_drift(&refs, ref_time(), 2, TimeAxis::Hours).unwrap();
        assert!((slope - 0.125).abs() < 1e-9, "slope = {slope}");
    }

    #[test]
    fn test_index_axis_ignores_spacing() {
        // Irregular spacing, but consecutive positions: slope per index is 5
        let samples = vec![sample_at(0, 10.0), sample_at(7, 15.0), sample_at(8, 20.0)];
        let refs: Vec<&MetricSample> = samples.iter().collect();

        let slope = estimate_drift(&refs, ref_time(), 2, TimeAxis::Index).unwrap();
        assert!((slope - 5.0).abs() < 1e-9, "slope = {slope}");
    }

    #[test]
    fn test_undefined_below_minimum() {
        let samples = vec![sample_at(0, 1.0)];
        let refs: Vec<&MetricSample> = samples.iter().collect();

        assert_eq!(
            estimate_drift(&refs, ref_time(), 2, TimeAxis::Days),
            Err(InsufficientData::BelowMinimum { have: 1, need: 2 })
        );
        assert_eq!(
            estimate_drift(&[], ref_time(), 2, TimeAxis::Days),
            Err(InsufficientData::EmptySegment)
        );
    }

    #[test]
    fn test_undefined_for_zero_time_range() {
        // All samples coincide in time
        let samples = vec![sample_at(3, 1.0), sample_at(3, 2.0), sample_at(3, 3.0)];
        let refs: Vec<&MetricSample> = samples.iter().collect();

        assert_eq!(
            estimate_drift(&refs, ref_time(), 2, TimeAxis::Days),
            Err(InsufficientData::ZeroTimeRange)
        );
    }

    #[test]
    fn test_caller_minimum_is_respected() {
        let samples = vec![sample_at(0, 1.0), sample_at(1, 2.0), sample_at(2, 3.0)];
        let refs: Vec<&MetricSample> = samples.iter().collect();

        assert_eq!(
            estimate_drift(&refs, ref_time(), 4, TimeAxis::Days),
            Err(InsufficientData::BelowMinimum { have: 3, need: 4 })
        );
    }
}
