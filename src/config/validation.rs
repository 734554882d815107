//! Config validation: unknown-key detection with Levenshtein suggestions.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs; range errors
//! are handled separately in `AnalysisConfig::validate`.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

/// Returns the complete set of valid dotted key paths for AnalysisConfig.
///
/// Maintained manually to match the struct hierarchy in mod.rs. Any new
/// field added there must be added here too. The two rename tables take
/// arbitrary user keys, so they are matched by prefix instead.
fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [ingest]
        "ingest",
        "ingest.dayfirst",
        "ingest.min_plausible_year",
        "ingest.separators",
        "ingest.series_columns",
        "ingest.event_columns",
        // [analysis]
        "analysis",
        "analysis.time_axis",
        "analysis.stabilization_window_days",
        "analysis.min_points_per_interval",
        "analysis.require_prev_interval",
        "analysis.fallback_baseline_days",
        "analysis.allowed_maintenance_types",
        // [apm]
        "apm",
        "apm.basic_perf_factor",
        "apm.perf_to_fuel_slope",
        "apm.perf_to_fuel_intercept",
        // [economics]
        "economics",
        "economics.fuel_price_per_unit",
        "economics.budget",
        "economics.max_downtime_hours",
        "economics.catalog",
        "economics.catalog.name",
        "economics.catalog.cost",
        "economics.catalog.downtime_hours",
        "economics.catalog.expected_delta_pf",
    ];
    keys.iter().copied().collect()
}

/// Key prefixes whose children are free-form user mappings.
const FREE_FORM_PREFIXES: &[&str] = &["ingest.series_columns.", "ingest.event_columns."];

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
/// Array-of-table elements (e.g. `[[economics.catalog]]`) collapse onto the
/// array's own path so their fields validate once.
fn walk_toml_keys(value: &toml::Value, prefix: &str, keys: &mut Vec<String>) {
    match value {
        toml::Value::Table(table) => {
            for (k, v) in table {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                keys.push(path.clone());
                walk_toml_keys(v, &path, keys);
            }
        }
        toml::Value::Array(items) => {
            for item in items {
                if item.is_table() {
                    walk_toml_keys(item, prefix, keys);
                }
            }
        }
        _ => {}
    }
}

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 && best.map_or(true, |(_, d)| dist < d) {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys — it only warns. Existing configs
/// always continue to work.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let mut found = Vec::new();
    walk_toml_keys(&value, "", &mut found);

    let mut warnings = Vec::new();
    for key in &found {
        if known.contains(key.as_str()) {
            continue;
        }
        if FREE_FORM_PREFIXES.iter().any(|p| key.starts_with(p)) {
            continue;
        }
        warnings.push(ValidationWarning {
            field: key.clone(),
            message: format!("Unknown config key '{key}'"),
            suggestion: suggest_correction(key, &known),
        });
    }

    warnings
}
