//! AeroPerf: Aircraft Performance Monitoring
//!
//! Quantifies the effect of discrete maintenance events on a continuously
//! logged performance metric (fuel flow / performance factor) and turns
//! that effect into a prioritized maintenance plan under budget and
//! downtime constraints.
//!
//! ## Architecture
//!
//! - **Ingest**: uniform series/event tables from delimited text
//! - **Analysis**: intervals → interval metrics → type rates → projected
//!   impacts → summary (the estimation core)
//! - **Optimization**: greedy ROI-ranked maintenance scheduling
//! - **Report**: flat CSV export of every output table

pub mod analysis;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod optimization;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod types;

// Re-export the configuration entry point
pub use config::{AnalysisConfig, Limit, TimeAxis};

// Re-export commonly used record types
pub use types::{
    AnalysisSummary, EventInterval, IntervalMetrics, MaintenanceEvent, MetricKind, MetricSample,
    ProjectedImpact, RateSource, ScheduleEntry, SeriesRow, TypeRate,
};

// Re-export the core stage entry points
pub use analysis::{
    build_intervals, compute_interval_metrics, estimate_drift, estimate_type_rates,
    extract_segment, project_impacts, summarize,
};
pub use optimization::build_schedule;
