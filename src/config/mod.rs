//! Analysis Configuration Module
//!
//! Every tunable the pipeline consumes lives in one `AnalysisConfig` value,
//! loaded from a TOML (or legacy JSON) settings file and validated once at
//! the boundary. The value is then passed explicitly and immutably into
//! each component's entry point — there is no global config singleton, and
//! no component re-validates keys downstream.
//!
//! ## Loading Order
//!
//! 1. `--config <path>` CLI argument (TOML or JSON, by extension)
//! 2. `aeroperf.toml` in the current working directory
//! 3. Built-in defaults

mod validation;

pub use validation::{validate_unknown_keys, ValidationWarning};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config extension '{0}' (expected .toml or .json)")]
    UnsupportedExtension(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Bounded-or-unbounded constraint values
// ============================================================================

/// A constraint that is either a finite limit or unbounded.
///
/// Serialized as a number, or as the string `"unbounded"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit(pub Option<f64>);

impl Limit {
    pub const UNBOUNDED: Self = Self(None);

    /// Whether a cumulative total stays within this limit.
    pub fn allows(self, total: f64) -> bool {
        self.0.map_or(true, |max| total <= max)
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Serialize for Limit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_str("unbounded"),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Self(Some(v))),
            Raw::Text(s) if s.eq_ignore_ascii_case("unbounded") => Ok(Self(None)),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"unbounded\", got \"{s}\""
            ))),
        }
    }
}

// ============================================================================
// Time axis
// ============================================================================

/// Unit of the elapsed-time axis used for drift fitting and event spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeAxis {
    #[default]
    Days,
    Hours,
    /// Raw sample position. Event-to-event spacing has no sample index, so
    /// it degrades to whole days on this axis.
    Index,
}

impl TimeAxis {
    /// Elapsed time from `from` to `to` in this unit (negative when `to`
    /// precedes `from`). For `Index` see the type-level note.
    pub fn elapsed(self, from: chrono::NaiveDateTime, to: chrono::NaiveDateTime) -> f64 {
        let delta = to.signed_duration_since(from);
        match self {
            Self::Days => delta.num_seconds() as f64 / 86_400.0,
            Self::Hours => delta.num_seconds() as f64 / 3_600.0,
            Self::Index => delta.num_days() as f64,
        }
    }
}

impl std::fmt::Display for TimeAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days => f.write_str("days"),
            Self::Hours => f.write_str("hours"),
            Self::Index => f.write_str("index"),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Ingestion boundary settings: separators, date conventions, renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Parse ambiguous dates day-first (European convention).
    pub dayfirst: bool,

    /// Years below this flag the row as implausible (flagged, not dropped).
    pub min_plausible_year: i32,

    /// Candidate field separators, tried in order against the header row.
    pub separators: Vec<String>,

    /// Source-to-canonical column renames for the time-series table,
    /// applied after trim/lowercase/underscore normalization.
    pub series_columns: BTreeMap<String, String>,

    /// Source-to-canonical column renames for the event table.
    pub event_columns: BTreeMap<String, String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            dayfirst: true,
            min_plausible_year: 2020,
            separators: vec![
                ",".to_string(),
                ";".to_string(),
                "\t".to_string(),
                "|".to_string(),
            ],
            series_columns: BTreeMap::new(),
            event_columns: BTreeMap::new(),
        }
    }
}

/// Core estimation parameters: window lengths and validity gates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub time_axis: TimeAxis,

    /// Fixed-length window right after each event used for the settled
    /// post-event metric level, in days.
    pub stabilization_window_days: i64,

    /// Minimum samples for a window to count toward validity.
    pub min_points_per_interval: usize,

    /// When true, an interval is invalid unless a real previous interval
    /// (not the fallback baseline window) supplied its baseline.
    pub require_prev_interval: bool,

    /// Length of the substitute baseline window for the first event, days.
    pub fallback_baseline_days: i64,

    /// Event types eligible for rate estimation and impact projection.
    pub allowed_maintenance_types: BTreeSet<String>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            time_axis: TimeAxis::Days,
            stabilization_window_days: 14,
            min_points_per_interval: 5,
            require_prev_interval: false,
            fallback_baseline_days: 30,
            allowed_maintenance_types: BTreeSet::new(),
        }
    }
}

/// APM constants: the linear performance-to-fuel-factor map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApmConfig {
    pub basic_perf_factor: f64,
    pub perf_to_fuel_slope: f64,
    pub perf_to_fuel_intercept: f64,
}

impl Default for ApmConfig {
    fn default() -> Self {
        Self {
            basic_perf_factor: 0.0,
            perf_to_fuel_slope: 1.0,
            perf_to_fuel_intercept: 0.0,
        }
    }
}

/// One maintenance action in the catalog. Static reference data, not
/// derived from events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub cost: f64,
    pub downtime_hours: f64,

    /// Expected performance-factor delta, used by planning collaborators.
    pub expected_delta_pf: f64,
}

/// Monetary value and scheduling constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    /// Monetary value of one unit of projected effect.
    pub fuel_price_per_unit: f64,

    pub budget: Limit,
    pub max_downtime_hours: Limit,

    /// Catalog entries in declaration order (scheduler tie-break order).
    pub catalog: Vec<CatalogEntry>,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            fuel_price_per_unit: 1.0,
            budget: Limit::UNBOUNDED,
            max_downtime_hours: Limit::UNBOUNDED,
            catalog: Vec::new(),
        }
    }
}

// ============================================================================
// Top-level config
// ============================================================================

/// Root configuration for an analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ingest: IngestConfig,
    pub analysis: AnalysisParams,
    pub apm: ApmConfig,
    pub economics: EconomicsConfig,
}

impl AnalysisConfig {
    /// Load configuration using the standard search order:
    /// 1. explicit path (TOML or JSON by extension)
    /// 2. `./aeroperf.toml`
    /// 3. built-in defaults
    ///
    /// A present-but-broken file is fatal — silently falling back to
    /// defaults would change analysis semantics mid-deployment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), "Loaded analysis config");
            return Ok(config);
        }

        let local = PathBuf::from("aeroperf.toml");
        if local.exists() {
            let config = Self::load_from_file(&local)?;
            info!("Loaded analysis config from ./aeroperf.toml");
            return Ok(config);
        }

        info!("No config file found — using built-in defaults");
        Ok(Self::default())
    }

    /// Load from a specific file. `.toml` and `.json` are supported; the
    /// JSON path exists for legacy `settings.json` deployments.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let config: Self = match ext.as_str() {
            "toml" => {
                for warning in validate_unknown_keys(&contents) {
                    warn!(field = %warning.field, "{warning}");
                }
                toml::from_str(&contents)?
            }
            "json" => serde_json::from_str(&contents)?,
            other => return Err(ConfigError::UnsupportedExtension(other.to_string())),
        };

        config.validate()?;
        Ok(config)
    }

    /// Range checks, run once at the boundary. Invalid values are fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        if a.stabilization_window_days < 1 {
            return Err(ConfigError::Invalid(format!(
                "analysis.stabilization_window_days = {} must be >= 1",
                a.stabilization_window_days
            )));
        }
        if a.min_points_per_interval < 1 {
            return Err(ConfigError::Invalid(
                "analysis.min_points_per_interval must be >= 1".to_string(),
            ));
        }
        if a.fallback_baseline_days < 1 {
            return Err(ConfigError::Invalid(format!(
                "analysis.fallback_baseline_days = {} must be >= 1",
                a.fallback_baseline_days
            )));
        }

        let e = &self.economics;
        if !e.fuel_price_per_unit.is_finite() || e.fuel_price_per_unit < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "economics.fuel_price_per_unit = {} must be finite and >= 0",
                e.fuel_price_per_unit
            )));
        }
        for limit in [("budget", e.budget), ("max_downtime_hours", e.max_downtime_hours)] {
            if let Some(v) = limit.1 .0 {
                if !v.is_finite() || v < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "economics.{} = {v} must be finite and >= 0 (or \"unbounded\")",
                        limit.0
                    )));
                }
            }
        }
        for entry in &e.catalog {
            if entry.cost < 0.0 || entry.downtime_hours < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "catalog entry '{}' has negative cost or downtime",
                    entry.name
                )));
            }
        }

        Ok(())
    }
}
