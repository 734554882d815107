//! Global Summarizer — one-row rollup of coverage and central tendencies.
//!
//! Pure aggregation: no branching beyond presence checks.

use super::{mean_of, sample_std};
use crate::types::{AnalysisSummary, IntervalMetrics, ProjectedImpact, RateSource, TypeRate};

pub fn summarize(
    metrics: &[IntervalMetrics],
    type_rates: &[TypeRate],
    impacts: &[ProjectedImpact],
) -> AnalysisSummary {
    let drift_values: Vec<f64> = metrics
        .iter()
        .filter(|m| m.valid)
        .filter_map(|m| m.drift_rate)
        .collect();
    let rate_means: Vec<f64> = type_rates.iter().map(|r| r.rate_mean).collect();
    let model_values: Vec<f64> = impacts.iter().map(|i| i.impact_model).collect();

    AnalysisSummary {
        valid_intervals: metrics.iter().filter(|m| m.valid).count(),
        drift_rate_mean: mean_of(&drift_values),
        drift_rate_std: sample_std(&drift_values),
        covered_types: type_rates.len(),
        mean_type_rate: mean_of(&rate_means),
        projected_impacts: impacts.len(),
        impact_model_mean: mean_of(&model_values),
        impact_model_std: sample_std(&model_values),
        fallback_drift_count: impacts
            .iter()
            .filter(|i| i.rate_source == RateSource::FallbackDrift)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 9, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn record(valid: bool, drift: Option<f64>) -> IntervalMetrics {
        IntervalMetrics {
            interval_index: 0,
            event_type: "wash".to_string(),
            tail: None,
            interval_start: ts(1),
            interval_end: ts(2),
            baseline_before: Some(1.0),
            mean_after: Some(1.0),
            drift_rate: drift,
            n_points_prev: 1,
            n_points_curr: 1,
            valid,
            used_fallback_baseline: false,
        }
    }

    fn impact(model: f64, source: RateSource) -> ProjectedImpact {
        ProjectedImpact {
            event_date: ts(1),
            event_type: "wash".to_string(),
            tail: None,
            delta_t: 1.0,
            impact_model: model,
            impact_observed: None,
            rate_source: source,
        }
    }

    #[test]
    fn test_rollup_counts_and_means() {
        let metrics = vec![
            record(true, Some(0.2)),
            record(true, Some(0.4)),
            record(true, None),
            record(false, Some(99.0)), // invalid drift excluded
        ];
        let rates = vec![TypeRate {
            event_type: "wash".to_string(),
            rate_mean: 3.0,
            rate_std: None,
            sample_count: 1,
        }];
        let impacts = vec![
            impact(2.0, RateSource::TypeRate),
            impact(4.0, RateSource::FallbackDrift),
        ];

        let summary = summarize(&metrics, &rates, &impacts);
        assert_eq!(summary.valid_intervals, 3);
        assert!((summary.drift_rate_mean.unwrap() - 0.3).abs() < 1e-12);
        assert!(summary.drift_rate_std.is_some());
        assert_eq!(summary.covered_types, 1);
        assert_eq!(summary.mean_type_rate, Some(3.0));
        assert_eq!(summary.projected_impacts, 2);
        assert_eq!(summary.impact_model_mean, Some(3.0));
        assert_eq!(summary.fallback_drift_count, 1);
    }

    #[test]
    fn test_empty_run_is_all_undefined() {
        let summary = summarize(&[], &[], &[]);
        assert_eq!(summary.valid_intervals, 0);
        assert_eq!(summary.drift_rate_mean, None);
        assert_eq!(summary.drift_rate_std, None);
        assert_eq!(summary.mean_type_rate, None);
        assert_eq!(summary.impact_model_mean, None);
        assert_eq!(summary.fallback_drift_count, 0);
    }
}
