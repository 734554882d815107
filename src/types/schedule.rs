//! Scheduler output records.

use serde::{Deserialize, Serialize};

/// One accepted maintenance action in the greedy schedule.
///
/// Output only — recomputed each run. Ordered by descending ROI, with
/// running cost/downtime totals against the configured constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub name: String,
    pub cost: f64,
    pub downtime_hours: f64,

    /// Mean projected effect size over impact records of this type.
    pub expected_gain_units: f64,

    /// Monetized gain minus cost: `expected_gain_units * unit_value - cost`.
    pub roi: f64,

    /// Cost of this entry plus all entries accepted before it.
    pub cumulative_cost: f64,

    /// Downtime of this entry plus all entries accepted before it.
    pub cumulative_downtime: f64,
}
