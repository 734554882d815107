//! Time-series table rows and metric sample views.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the uniform time-series table produced by ingestion.
///
/// Raw metric columns come from the source file; derived columns
/// (`fuel_factor`, `fuel_expected_corr`, `rolling_baseline`) are filled in
/// by the APM transforms and feature stages, each of which returns a new
/// table rather than touching its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    /// Aircraft tail number, when the source table carries one.
    pub tail: Option<String>,

    /// Sample timestamp.
    pub timestamp: NaiveDateTime,

    /// Normalized performance factor (preferred analysis metric).
    pub perf_factor: Option<f64>,

    /// Raw fuel flow (fallback analysis metric).
    pub fuel_flow: Option<f64>,

    /// Fleet-wide basic performance factor constant, applied per row.
    pub basic_perf_factor: Option<f64>,

    /// Linear perf-to-fuel-factor mapping output.
    pub fuel_factor: Option<f64>,

    /// Corrected expected fuel: `fuel_flow * (1 + fuel_factor)`.
    pub fuel_expected_corr: Option<f64>,

    /// Per-tail rolling mean of the selected metric (auxiliary feature).
    pub rolling_baseline: Option<f64>,

    /// False when the timestamp year is below the configured minimum.
    /// Suspect rows are flagged, not dropped.
    pub year_plausible: bool,
}

impl SeriesRow {
    /// Bare row with only identity and raw metrics set.
    pub fn new(
        tail: Option<String>,
        timestamp: NaiveDateTime,
        perf_factor: Option<f64>,
        fuel_flow: Option<f64>,
    ) -> Self {
        Self {
            tail,
            timestamp,
            perf_factor,
            fuel_flow,
            basic_perf_factor: None,
            fuel_factor: None,
            fuel_expected_corr: None,
            rolling_baseline: None,
            year_plausible: true,
        }
    }
}

/// Which metric column the run analyzes.
///
/// Chosen once per run, before interval metrics are computed, and applied
/// uniformly: the normalized performance factor when any row has one, else
/// raw fuel flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    PerfFactor,
    FuelFlow,
}

impl MetricKind {
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::PerfFactor => "perf_factor",
            Self::FuelFlow => "fuel_flow",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One sample of the selected metric. The core analysis components only
/// ever read slices of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub tail: Option<String>,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Select the metric column for this run and project the series table onto
/// it. Rows without a value for the selected metric are omitted from the
/// sample view (they remain in the series table itself).
///
/// Returns `None` when neither metric column has a single value.
pub fn select_metric(rows: &[SeriesRow]) -> Option<(MetricKind, Vec<MetricSample>)> {
    let kind = if rows.iter().any(|r| r.perf_factor.is_some()) {
        MetricKind::PerfFactor
    } else if rows.iter().any(|r| r.fuel_flow.is_some()) {
        MetricKind::FuelFlow
    } else {
        return None;
    };

    let samples = rows
        .iter()
        .filter_map(|r| {
            let value = match kind {
                MetricKind::PerfFactor => r.perf_factor?,
                MetricKind::FuelFlow => r.fuel_flow?,
            };
            Some(MetricSample {
                tail: r.tail.clone(),
                timestamp: r.timestamp,
                value,
            })
        })
        .collect();

    Some((kind, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_prefers_perf_factor_when_present() {
        let rows = vec![
            SeriesRow::new(None, ts(1), None, Some(2100.0)),
            SeriesRow::new(None, ts(2), Some(1.2), Some(2110.0)),
        ];

        let (kind, samples) = select_metric(&rows).unwrap();
        assert_eq!(kind, MetricKind::PerfFactor);
        // Only the row carrying a perf_factor value is projected
        assert_eq!(samples.len(), 1);
        assert!((samples[0].value - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_falls_back_to_fuel_flow() {
        let rows = vec![
            SeriesRow::new(None, ts(1), None, Some(2100.0)),
            SeriesRow::new(None, ts(2), None, None),
        ];

        let (kind, samples) = select_metric(&rows).unwrap();
        assert_eq!(kind, MetricKind::FuelFlow);
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_no_metric_at_all() {
        let rows = vec![SeriesRow::new(None, ts(1), None, None)];
        assert!(select_metric(&rows).is_none());
    }
}
