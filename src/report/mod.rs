//! Output Table Export
//!
//! Serializes the pipeline's output tables to comma-separated files in the
//! output directory, one file per table:
//!
//! - `interval_metrics.csv`
//! - `type_rates.csv`
//! - `projected_impacts.csv` (event order) and `impact_summary.csv`
//!   (sorted descending by model impact)
//! - `summary.csv` (single row)
//! - `schedule.csv`
//! - `series_enriched.csv` (input series plus derived columns)
//!
//! Undefined statistics serialize as **empty fields** — an empty cell
//! means "unknown effect", which is not the same thing as `0`. Formatting
//! is plain `Display`, so identical inputs produce byte-identical files.

use crate::types::{
    AnalysisSummary, IntervalMetrics, ProjectedImpact, ScheduleEntry, SeriesRow, TypeRate,
};
use chrono::NaiveDateTime;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Writes output tables into a directory, creating it on construction.
pub struct Reporter {
    output_dir: PathBuf,
}

impl Reporter {
    pub fn new(output_dir: &Path) -> Result<Self, ExportError> {
        std::fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    fn write_rows(
        &self,
        filename: &str,
        header: &str,
        rows: impl Iterator<Item = String>,
    ) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(filename);
        let io_err = |source| ExportError::Io {
            path: path.clone(),
            source,
        };

        let file = std::fs::File::create(&path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{header}").map_err(io_err)?;
        let mut count = 0usize;
        for row in rows {
            writeln!(out, "{row}").map_err(io_err)?;
            count += 1;
        }
        out.flush().map_err(io_err)?;

        info!(file = filename, rows = count, "Exported table");
        Ok(path)
    }

    pub fn export_interval_metrics(
        &self,
        records: &[IntervalMetrics],
    ) -> Result<PathBuf, ExportError> {
        self.write_rows(
            "interval_metrics.csv",
            "interval_index,event_type,tail,interval_start,interval_end,baseline_before,mean_after,drift_rate,n_points_prev,n_points_curr,valid,used_fallback_baseline",
            records.iter().map(|m| {
                format!(
                    "{},{},{},{},{},{},{},{},{},{},{},{}",
                    m.interval_index,
                    quote(&m.event_type),
                    opt_str(m.tail.as_deref()),
                    timestamp(m.interval_start),
                    timestamp(m.interval_end),
                    opt_num(m.baseline_before),
                    opt_num(m.mean_after),
                    opt_num(m.drift_rate),
                    m.n_points_prev,
                    m.n_points_curr,
                    m.valid,
                    m.used_fallback_baseline,
                )
            }),
        )
    }

    pub fn export_type_rates(&self, rates: &[TypeRate]) -> Result<PathBuf, ExportError> {
        self.write_rows(
            "type_rates.csv",
            "event_type,rate_mean,rate_std,sample_count",
            rates.iter().map(|r| {
                format!(
                    "{},{},{},{}",
                    quote(&r.event_type),
                    r.rate_mean,
                    opt_num(r.rate_std),
                    r.sample_count,
                )
            }),
        )
    }

    pub fn export_projected_impacts(
        &self,
        impacts: &[ProjectedImpact],
    ) -> Result<PathBuf, ExportError> {
        self.write_impacts("projected_impacts.csv", impacts.iter().collect())
    }

    /// The same table sorted descending by model impact, for the planning
    /// collaborator's top-effects view.
    pub fn export_impact_summary(
        &self,
        impacts: &[ProjectedImpact],
    ) -> Result<PathBuf, ExportError> {
        let mut sorted: Vec<&ProjectedImpact> = impacts.iter().collect();
        sorted.sort_by(|a, b| {
            b.impact_model
                .partial_cmp(&a.impact_model)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.write_impacts("impact_summary.csv", sorted)
    }

    fn write_impacts(
        &self,
        filename: &str,
        impacts: Vec<&ProjectedImpact>,
    ) -> Result<PathBuf, ExportError> {
        self.write_rows(
            filename,
            "event_date,event_type,tail,delta_t,impact_model,impact_observed,rate_source",
            impacts.into_iter().map(|i| {
                format!(
                    "{},{},{},{},{},{},{}",
                    timestamp(i.event_date),
                    quote(&i.event_type),
                    opt_str(i.tail.as_deref()),
                    i.delta_t,
                    i.impact_model,
                    opt_num(i.impact_observed),
                    i.rate_source,
                )
            }),
        )
    }

    pub fn export_summary(&self, summary: &AnalysisSummary) -> Result<PathBuf, ExportError> {
        let row = format!(
            "{},{},{},{},{},{},{},{},{}",
            summary.valid_intervals,
            opt_num(summary.drift_rate_mean),
            opt_num(summary.drift_rate_std),
            summary.covered_types,
            opt_num(summary.mean_type_rate),
            summary.projected_impacts,
            opt_num(summary.impact_model_mean),
            opt_num(summary.impact_model_std),
            summary.fallback_drift_count,
        );
        self.write_rows(
            "summary.csv",
            "valid_intervals,drift_rate_mean,drift_rate_std,covered_types,mean_type_rate,projected_impacts,impact_model_mean,impact_model_std,fallback_drift_count",
            std::iter::once(row),
        )
    }

    pub fn export_schedule(&self, schedule: &[ScheduleEntry]) -> Result<PathBuf, ExportError> {
        self.write_rows(
            "schedule.csv",
            "name,cost,downtime_hours,expected_gain_units,roi,cumulative_cost,cumulative_downtime",
            schedule.iter().map(|s| {
                format!(
                    "{},{},{},{},{},{},{}",
                    quote(&s.name),
                    s.cost,
                    s.downtime_hours,
                    s.expected_gain_units,
                    s.roi,
                    s.cumulative_cost,
                    s.cumulative_downtime,
                )
            }),
        )
    }

    pub fn export_series(&self, rows: &[SeriesRow]) -> Result<PathBuf, ExportError> {
        self.write_rows(
            "series_enriched.csv",
            "tail,timestamp,perf_factor,fuel_flow,basic_perf_factor,fuel_factor,fuel_expected_corr,rolling_baseline,year_plausible",
            rows.iter().map(|r| {
                format!(
                    "{},{},{},{},{},{},{},{},{}",
                    opt_str(r.tail.as_deref()),
                    timestamp(r.timestamp),
                    opt_num(r.perf_factor),
                    opt_num(r.fuel_flow),
                    opt_num(r.basic_perf_factor),
                    opt_num(r.fuel_factor),
                    opt_num(r.fuel_expected_corr),
                    opt_num(r.rolling_baseline),
                    r.year_plausible,
                )
            }),
        )
    }
}

// ============================================================================
// Cell formatting
// ============================================================================

fn timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Undefined serializes as an empty field, never as 0.
fn opt_num(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

fn opt_str(value: Option<&str>) -> String {
    value.map_or_else(String::new, quote)
}

/// Quote a free-text field when it would break the row.
fn quote(text: &str) -> String {
    if text.contains(|c: char| c == ',' || c == '"' || c == '\n') {
        let mut quoted = String::with_capacity(text.len() + 2);
        quoted.push('"');
        for ch in text.chars() {
            if ch == '"' {
                quoted.push('"');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_undefined_exports_as_empty_field() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path()).unwrap();

        let rates = vec![TypeRate {
            event_type: "wash".to_string(),
            rate_mean: 2.5,
            rate_std: None,
            sample_count: 1,
        }];
        let path = reporter.export_type_rates(&rates).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "event_type,rate_mean,rate_std,sample_count\nwash,2.5,,1\n"
        );
    }

    #[test]
    fn test_quoting_free_text() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_impact_summary_sorted_descending() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path()).unwrap();

        let mk = |event_type: &str, model: f64| ProjectedImpact {
            event_date: ts(),
            event_type: event_type.to_string(),
            tail: None,
            delta_t: 1.0,
            impact_model: model,
            impact_observed: None,
            rate_source: crate::types::RateSource::TypeRate,
        };
        let impacts = vec![mk("low", 1.0), mk("high", 9.0), mk("mid", 4.0)];

        let path = reporter.export_impact_summary(&impacts).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let order: Vec<&str> = content
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_summary_single_row() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path()).unwrap();

        let summary = AnalysisSummary {
            valid_intervals: 3,
            drift_rate_mean: Some(0.25),
            drift_rate_std: None,
            covered_types: 1,
            mean_type_rate: Some(2.0),
            projected_impacts: 2,
            impact_model_mean: Some(5.0),
            impact_model_std: Some(1.0),
            fallback_drift_count: 1,
        };
        let path = reporter.export_summary(&summary).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "3,0.25,,1,2,2,5,1,1");
    }
}
