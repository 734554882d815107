//! Event-Impact Estimation Core
//!
//! The only part of the repository with non-trivial algorithmic policy.
//! Data flows strictly left to right:
//!
//! events → intervals → interval metrics → type rates → projected impacts
//! → summary
//!
//! Each stage is a pure function of immutable input tables plus the
//! explicit `AnalysisParams` value; no stage mutates a table it does not
//! own, and everything is synchronous single-pass batch work.
//!
//! Insufficient data is never an error here: it degrades to `None` fields
//! (with the reason kept distinguishable for debug logs) or to an omitted
//! output record, per the uniform-sentinel contract.

mod drift;
mod interval_metrics;
mod intervals;
mod projection;
mod segments;
mod summary;
mod type_rates;

pub use drift::{estimate_drift, MIN_DRIFT_POINTS};
pub use interval_metrics::compute_interval_metrics;
pub use intervals::build_intervals;
pub use projection::project_impacts;
pub use segments::extract_segment;
pub use summary::summarize;
pub use type_rates::estimate_type_rates;

use crate::types::MaintenanceEvent;
use chrono::NaiveDateTime;
use statrs::statistics::Statistics;

/// Arithmetic mean, undefined for an empty set.
pub(crate) fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Sample standard deviation (ddof = 1), undefined below 2 values.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        None
    } else {
        Some(values.iter().std_dev())
    }
}

/// Whether an event belongs to the entity scope of a record.
///
/// An unscoped record (no tail) matches every event; a scoped record only
/// matches events carrying the same tail.
pub(crate) fn tail_matches(record_tail: Option<&str>, event_tail: Option<&str>) -> bool {
    record_tail.map_or(true, |t| event_tail == Some(t))
}

/// Most recent event of `event_type` strictly before `before`, within the
/// entity scope of `tail`. `events` must already be in chronological
/// order.
pub(crate) fn most_recent_prior<'a>(
    events: &[&'a MaintenanceEvent],
    event_type: &str,
    tail: Option<&str>,
    before: NaiveDateTime,
) -> Option<&'a MaintenanceEvent> {
    events
        .iter()
        .take_while(|e| e.timestamp < before)
        .filter(|e| e.event_type == event_type && tail_matches(tail, e.tail.as_deref()))
        .last()
        .copied()
}

/// Chronologically ordered view of the event table. The sort is stable, so
/// duplicate timestamps keep their original file order.
pub(crate) fn chronological<'a>(events: &'a [MaintenanceEvent]) -> Vec<&'a MaintenanceEvent> {
    let mut ordered: Vec<&MaintenanceEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);
    ordered
}
