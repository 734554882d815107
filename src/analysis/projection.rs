//! Impact Projector
//!
//! Projects a model impact for every eligible maintenance event:
//!
//! 1. The event type's own `rate_mean`, when the Type-Rate Estimator
//!    produced one (`rate_source = type_rate`).
//! 2. Otherwise the global mean drift rate over valid intervals
//!    (`rate_source = fallback_drift`).
//! 3. Otherwise the event is skipped — no usable estimator exists, and an
//!    absent record is not the same thing as a zero impact.
//!
//! Events are also skipped when no same-type prior occurrence exists in
//! their entity scope, or when the elapsed time since it is not positive.
//! The observed impact rides along only when the event's own interval was
//! valid, so consumers can compare projected vs. measured effect.

use super::{chronological, mean_of, most_recent_prior};
use crate::config::AnalysisParams;
use crate::types::{IntervalMetrics, MaintenanceEvent, ProjectedImpact, RateSource, TypeRate};
use std::collections::BTreeMap;
use tracing::info;

/// Project impacts for all allow-listed events, in chronological order.
pub fn project_impacts(
    events: &[MaintenanceEvent],
    metrics: &[IntervalMetrics],
    type_rates: &[TypeRate],
    params: &AnalysisParams,
) -> Vec<ProjectedImpact> {
    let ordered = chronological(events);
    let rate_by_type: BTreeMap<&str, f64> = type_rates
        .iter()
        .map(|r| (r.event_type.as_str(), r.rate_mean))
        .collect();

    // Global non-maintenance drift reference: mean drift over valid
    // intervals that have one.
    let drift_values: Vec<f64> = metrics
        .iter()
        .filter(|m| m.valid)
        .filter_map(|m| m.drift_rate)
        .collect();
    let global_drift_mean = mean_of(&drift_values);

    let mut impacts = Vec::new();
    let mut skipped_no_prior = 0usize;
    let mut skipped_nonpositive_dt = 0usize;
    let mut skipped_no_rate = 0usize;

    for event in &ordered {
        if !params.allowed_maintenance_types.contains(&event.event_type) {
            continue;
        }

        let Some(prior) = most_recent_prior(
            &ordered,
            &event.event_type,
            event.tail.as_deref(),
            event.timestamp,
        ) else {
            skipped_no_prior += 1;
            continue;
        };

        let delta_t = params.time_axis.elapsed(prior.timestamp, event.timestamp);
        if delta_t <= 0.0 {
            skipped_nonpositive_dt += 1;
            continue;
        }

        let (rate, rate_source) = match rate_by_type.get(event.event_type.as_str()) {
            Some(&rate) => (rate, RateSource::TypeRate),
            None => match global_drift_mean {
                Some(drift) => (drift, RateSource::FallbackDrift),
                None => {
                    skipped_no_rate += 1;
                    continue;
                }
            },
        };

        let impact_observed = metrics
            .iter()
            .find(|m| {
                m.valid
                    && m.interval_start == event.timestamp
                    && m.event_type == event.event_type
                    && m.tail == event.tail
            })
            .and_then(|m| match (m.baseline_before, m.mean_after) {
                (Some(baseline), Some(after)) => Some(baseline - after),
                _ => None,
            });

        impacts.push(ProjectedImpact {
            event_date: event.timestamp,
            event_type: event.event_type.clone(),
            tail: event.tail.clone(),
            delta_t,
            impact_model: rate * delta_t,
            impact_observed,
            rate_source,
        });
    }

    info!(
        projected = impacts.len(),
        skipped_no_prior,
        skipped_nonpositive_dt,
        skipped_no_rate,
        "Projected maintenance impacts"
    );
    impacts
}
