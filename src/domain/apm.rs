//! APM pointwise transforms.
//!
//! These are pure per-row maps applied to the series table before the
//! estimation core runs — the core itself never touches them. A row
//! missing its input column simply keeps the derived column undefined.

use crate::config::ApmConfig;
use crate::types::SeriesRow;

/// Stamp the fleet-wide basic performance factor onto every row.
pub fn apply_constants(rows: Vec<SeriesRow>, apm: &ApmConfig) -> Vec<SeriesRow> {
    rows.into_iter()
        .map(|mut r| {
            r.basic_perf_factor = Some(apm.basic_perf_factor);
            r
        })
        .collect()
}

/// Linear performance-to-fuel-factor map:
/// `fuel_factor = perf_factor * slope + intercept`.
pub fn perf_to_fuel_factor(rows: Vec<SeriesRow>, apm: &ApmConfig) -> Vec<SeriesRow> {
    rows.into_iter()
        .map(|mut r| {
            r.fuel_factor = r
                .perf_factor
                .map(|pf| pf * apm.perf_to_fuel_slope + apm.perf_to_fuel_intercept);
            r
        })
        .collect()
}

/// Corrected expected fuel: `fuel_flow * (1 + fuel_factor)`.
pub fn expected_fuel(rows: Vec<SeriesRow>) -> Vec<SeriesRow> {
    rows.into_iter()
        .map(|mut r| {
            r.fuel_expected_corr = match (r.fuel_flow, r.fuel_factor) {
                (Some(flow), Some(factor)) => Some(flow * (1.0 + factor)),
                _ => None,
            };
            r
        })
        .collect()
}
