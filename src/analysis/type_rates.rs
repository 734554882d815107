//! Type-Rate Estimator
//!
//! Aggregates per-maintenance-type impact rates from valid intervals that
//! follow a prior occurrence of the same type. For each qualifying
//! interval the instantaneous observed impact is
//! `J = baseline_before − mean_after` (positive = improvement), and the
//! rate is `J / Δt` where `Δt` is the elapsed time since the prior
//! same-type occurrence in the configured unit.

use super::{chronological, mean_of, most_recent_prior, sample_std};
use crate::config::AnalysisParams;
use crate::types::{IntervalMetrics, MaintenanceEvent, TypeRate};
use std::collections::BTreeMap;
use tracing::info;

/// Aggregate rates per type over the valid, allow-listed interval records.
/// Output is ordered by type name for reproducibility.
pub fn estimate_type_rates(
    metrics: &[IntervalMetrics],
    events: &[MaintenanceEvent],
    params: &AnalysisParams,
) -> Vec<TypeRate> {
    let ordered = chronological(events);
    let mut rates_by_type: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut skipped_no_prior = 0usize;
    let mut skipped_nonpositive_dt = 0usize;

    for record in metrics.iter().filter(|m| m.valid) {
        if !params.allowed_maintenance_types.contains(&record.event_type) {
            continue;
        }
        // Both present on a valid record; guard anyway to keep the
        // undefined sentinel authoritative.
        let (Some(baseline), Some(after)) = (record.baseline_before, record.mean_after) else {
            continue;
        };

        let Some(prior) = most_recent_prior(
            &ordered,
            &record.event_type,
            record.tail.as_deref(),
            record.interval_start,
        ) else {
            skipped_no_prior += 1;
            continue;
        };

        let delta_t = params
            .time_axis
            .elapsed(prior.timestamp, record.interval_start);
        if delta_t <= 0.0 {
            skipped_nonpositive_dt += 1;
            continue;
        }

        let impact = baseline - after;
        rates_by_type
            .entry(record.event_type.as_str())
            .or_default()
            .push(impact / delta_t);
    }

    let rates: Vec<TypeRate> = rates_by_type
        .into_iter()
        .filter_map(|(event_type, samples)| {
            mean_of(&samples).map(|rate_mean| TypeRate {
                event_type: event_type.to_string(),
                rate_mean,
                rate_std: sample_std(&samples),
                sample_count: samples.len(),
            })
        })
        .collect();

    info!(
        types = rates.len(),
        skipped_no_prior,
        skipped_nonpositive_dt,
        "Estimated per-type impact rates"
    );
    rates
}
