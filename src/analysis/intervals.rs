//! Interval Builder — turns the chronological event log into consecutive
//! half-open `[event_i, event_{i+1})` windows.
//!
//! The sequence is one global chronological order even when tail numbers
//! are present; downstream extraction filters by tail. Only events with a
//! successor produce an interval — there is no open-ended trailing
//! interval.

use super::chronological;
use crate::types::{EventInterval, MaintenanceEvent};
use tracing::debug;

/// Build the interval sequence. Produces exactly N−1 intervals for N
/// chronologically valid events, and an empty set below 2 events.
///
/// Duplicate-timestamp neighbours yield a degenerate zero-width interval;
/// the validity gate downstream rejects it through the empty-segment path.
pub fn build_intervals(events: &[MaintenanceEvent]) -> Vec<EventInterval> {
    let ordered = chronological(events);

    if ordered.len() < 2 {
        debug!(
            events = ordered.len(),
            "Fewer than 2 events — no intervals to build"
        );
        return Vec::new();
    }

    let mut intervals = Vec::with_capacity(ordered.len() - 1);
    for (index, pair) in ordered.windows(2).enumerate() {
        intervals.push(EventInterval {
            index,
            start: pair[0].timestamp,
            end: pair[1].timestamp,
            previous_event_start: index.checked_sub(1).map(|p| ordered[p].timestamp),
            event_type: pair[0].event_type.clone(),
            tail: pair[0].tail.clone(),
        });
    }

    debug!(intervals = intervals.len(), "Built event intervals");
    intervals
}
