//! Pipeline Coordinator
//!
//! One synchronous pass over the immutable input tables:
//!
//! ingest → clean → APM transforms → metric selection → intervals →
//! interval metrics → type rates → projected impacts → summary →
//! schedule → export
//!
//! Fatal errors (shape, config, I/O) abort before any output is
//! committed; insufficient-data conditions flow through as undefined
//! values or omitted records and are only ever logged as counts.

use crate::analysis::{
    build_intervals, compute_interval_metrics, estimate_type_rates, project_impacts, summarize,
};
use crate::config::AnalysisConfig;
use crate::domain::{self, MaintenanceCatalog};
use crate::ingest::{self, IngestError};
use crate::optimization::build_schedule;
use crate::processing::rolling_baseline;
use crate::report::{ExportError, Reporter};
use crate::types::{
    select_metric, AnalysisSummary, EventInterval, IntervalMetrics, MaintenanceEvent, MetricKind,
    ProjectedImpact, ScheduleEntry, SeriesRow, TypeRate,
};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("series table has no usable metric column values")]
    NoMetric,

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Everything one run produces, before export.
#[derive(Debug)]
pub struct PipelineOutput {
    pub metric: MetricKind,
    pub series: Vec<SeriesRow>,
    pub events: Vec<MaintenanceEvent>,
    pub intervals: Vec<EventInterval>,
    pub interval_metrics: Vec<IntervalMetrics>,
    pub type_rates: Vec<TypeRate>,
    pub impacts: Vec<ProjectedImpact>,
    pub summary: AnalysisSummary,
    pub schedule: Vec<ScheduleEntry>,
}

/// Run the full analysis over the two input files.
pub fn run(
    series_path: &Path,
    events_path: &Path,
    config: &AnalysisConfig,
) -> Result<PipelineOutput, PipelineError> {
    // 1. Ingestion boundary — shape errors are fatal here.
    let series = ingest::load_series(series_path, &config.ingest)?;
    let events = ingest::load_events(events_path, &config.ingest)?;

    // 2. Cleaning and pointwise APM transforms.
    let series = ingest::remove_duplicates(series);
    let series = ingest::flag_plausible_years(series, config.ingest.min_plausible_year);
    let series = domain::apply_constants(series, &config.apm);
    let series = domain::perf_to_fuel_factor(series, &config.apm);
    let series = domain::expected_fuel(series);

    // 3. Metric selection — once per run, applied uniformly.
    let (metric, samples) = select_metric(&series).ok_or(PipelineError::NoMetric)?;
    info!(metric = %metric, samples = samples.len(), "Selected analysis metric");

    let series = rolling_baseline(series, metric);

    // 4. Estimation core.
    let intervals = build_intervals(&events);
    let interval_metrics = compute_interval_metrics(&intervals, &samples, &config.analysis);
    let type_rates = estimate_type_rates(&interval_metrics, &events, &config.analysis);
    let impacts = project_impacts(&events, &interval_metrics, &type_rates, &config.analysis);
    let summary = summarize(&interval_metrics, &type_rates, &impacts);

    // 5. Scheduling.
    let catalog = MaintenanceCatalog::from_entries(&config.economics.catalog);
    let schedule = build_schedule(&catalog, &impacts, &config.economics);

    Ok(PipelineOutput {
        metric,
        series,
        events,
        intervals,
        interval_metrics,
        type_rates,
        impacts,
        summary,
        schedule,
    })
}

/// Write every output table into `out_dir`.
pub fn export(output: &PipelineOutput, out_dir: &Path) -> Result<(), ExportError> {
    let reporter = Reporter::new(out_dir)?;
    reporter.export_series(&output.series)?;
    reporter.export_interval_metrics(&output.interval_metrics)?;
    reporter.export_type_rates(&output.type_rates)?;
    reporter.export_projected_impacts(&output.impacts)?;
    reporter.export_impact_summary(&output.impacts)?;
    reporter.export_summary(&output.summary)?;
    reporter.export_schedule(&output.schedule)?;
    Ok(())
}
