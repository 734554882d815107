//! Maintenance event log records and derived event intervals.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A discrete, timestamped maintenance or operational occurrence.
///
/// Identity is (tail, event_type, timestamp). Immutable once loaded.
/// Duplicate timestamps for the same tail are permitted and keep their
/// original file order (the interval builder sorts stably).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    /// Aircraft tail number, when the event log carries one.
    pub tail: Option<String>,

    /// Event timestamp (canonical "event timestamp" after ingestion).
    pub timestamp: NaiveDateTime,

    /// Free-text event type name, e.g. "engine_wash".
    pub event_type: String,
}

/// The half-open time span `[start, end)` between two consecutive events.
///
/// Derived entity: recomputed fully on every pipeline run, never mutated
/// in place. Produced only for events that have a following event — there
/// is no open-ended trailing interval. Invariant: `start < end` except for
/// duplicate-timestamp neighbours, which downstream stages reject via the
/// empty-segment path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInterval {
    /// Position in the chronological interval sequence.
    pub index: usize,

    /// Timestamp of the event opening this interval.
    pub start: NaiveDateTime,

    /// Timestamp of the next event (exclusive bound).
    pub end: NaiveDateTime,

    /// Timestamp of the event before `start`, absent for the first event.
    pub previous_event_start: Option<NaiveDateTime>,

    /// Type name of the event opening this interval.
    pub event_type: String,

    /// Tail number of the event opening this interval.
    pub tail: Option<String>,
}
