//! Analysis output records: interval metrics, type rates, projected
//! impacts, and the one-row run summary.
//!
//! Undefined statistical quantities are `Option<f64>` — `None` means
//! "unknown effect", which the pipeline never collapses to `0.0`. The
//! distinct non-fatal reasons behind a `None` are kept as
//! [`InsufficientData`] so stages can log *why* without widening the
//! public sentinel.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Why a statistic could not be computed from a segment.
///
/// All three degrade to the same public `None`; the variant only reaches
/// debug logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsufficientData {
    /// The extracted segment had no samples.
    EmptySegment,
    /// Fewer samples than the required minimum.
    BelowMinimum { have: usize, need: usize },
    /// All samples coincide in time — no axis to fit against.
    ZeroTimeRange,
}

impl std::fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySegment => write!(f, "empty segment"),
            Self::BelowMinimum { have, need } => {
                write!(f, "below minimum point count ({have} < {need})")
            }
            Self::ZeroTimeRange => write!(f, "zero elapsed-time range"),
        }
    }
}

/// Per-interval statistics: baseline level before the event, stabilized
/// level after it, and the within-interval drift trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalMetrics {
    /// Index of the source interval in the chronological sequence.
    pub interval_index: usize,

    /// Type name of the event opening the interval.
    pub event_type: String,

    /// Tail number of the event opening the interval.
    pub tail: Option<String>,

    pub interval_start: NaiveDateTime,
    pub interval_end: NaiveDateTime,

    /// Mean metric value over the previous window (or fallback window).
    pub baseline_before: Option<f64>,

    /// Mean metric value over the fixed-length stabilization window.
    pub mean_after: Option<f64>,

    /// Linear trend of the metric over `[start, end)`, metric per time unit.
    pub drift_rate: Option<f64>,

    /// Samples found in the previous (or fallback) window.
    pub n_points_prev: usize,

    /// Samples found in the current window `[start, end)`.
    pub n_points_curr: usize,

    /// True only when baseline and mean-after are present, point-count
    /// minimums are met, and fallback-baseline use is permitted.
    pub valid: bool,

    /// True when no previous event existed and the configurable fallback
    /// baseline window was used instead.
    pub used_fallback_baseline: bool,
}

/// Aggregated per-maintenance-type impact rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeRate {
    pub event_type: String,

    /// Mean of observed impact rates (metric per time unit).
    pub rate_mean: f64,

    /// Sample standard deviation (ddof = 1); undefined below 2 samples.
    pub rate_std: Option<f64>,

    pub sample_count: usize,
}

/// Which estimator produced a projected impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The event type had its own historical rate.
    TypeRate,
    /// Global mean non-maintenance drift rate was substituted.
    FallbackDrift,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeRate => f.write_str("type_rate"),
            Self::FallbackDrift => f.write_str("fallback_drift"),
        }
    }
}

/// Model-projected impact of one maintenance event, with the measured
/// impact alongside when the event's own interval was valid — downstream
/// consumers compare projected vs. measured effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedImpact {
    pub event_date: NaiveDateTime,
    pub event_type: String,
    pub tail: Option<String>,

    /// Elapsed time since the previous same-type occurrence, in the
    /// configured time unit.
    pub delta_t: f64,

    /// Rate × delta_t.
    pub impact_model: f64,

    /// `baseline_before - mean_after` of the event's own interval, only
    /// when that interval was valid.
    pub impact_observed: Option<f64>,

    pub rate_source: RateSource,
}

/// Single-row rollup of coverage and central tendencies across the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub valid_intervals: usize,
    pub drift_rate_mean: Option<f64>,
    pub drift_rate_std: Option<f64>,
    pub covered_types: usize,
    pub mean_type_rate: Option<f64>,
    pub projected_impacts: usize,
    pub impact_model_mean: Option<f64>,
    pub impact_model_std: Option<f64>,
    pub fallback_drift_count: usize,
}
