//! Maintenance Scheduler — greedy ROI-ranked selection.
//!
//! For each catalog action, the expected gain is the mean projected effect
//! over all impact records of that action's type (0 when none exist — an
//! unobserved action earns nothing, per the catalog contract), and
//! `roi = gain * unit_value - cost`. Actions are scanned in descending ROI
//! order (stable sort, so catalog declaration order breaks ties) and
//! accepted while `roi > 0` and the running cost/downtime totals stay
//! within the constraints. An action that does not fit is skipped, not a
//! stopping point — a cheaper action further down may still fit.
//!
//! This is a single-pass greedy heuristic, not a global optimum (no
//! knapsack solve). That is a deliberate design choice: the catalog is
//! small, the estimates are coarse, and a ranking operators can follow by
//! hand beats an opaque optimal packing.

use crate::config::EconomicsConfig;
use crate::domain::MaintenanceCatalog;
use crate::types::{ProjectedImpact, ScheduleEntry};
use tracing::{debug, info};

/// Build the schedule from the catalog and the projected impact table.
/// Returns an empty schedule when nothing qualifies.
pub fn build_schedule(
    catalog: &MaintenanceCatalog,
    impacts: &[ProjectedImpact],
    economics: &EconomicsConfig,
) -> Vec<ScheduleEntry> {
    // Rank every catalog action by ROI.
    let mut ranked: Vec<(f64, f64, &crate::config::CatalogEntry)> = catalog
        .list_all()
        .iter()
        .map(|entry| {
            let gains: Vec<f64> = impacts
                .iter()
                .filter(|i| i.event_type == entry.name)
                .map(|i| i.impact_model)
                .collect();
            let mean_gain = if gains.is_empty() {
                0.0
            } else {
                gains.iter().sum::<f64>() / gains.len() as f64
            };
            let roi = mean_gain * economics.fuel_price_per_unit - entry.cost;
            (mean_gain, roi, entry)
        })
        .collect();

    // Stable: equal ROIs keep catalog declaration order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut schedule = Vec::new();
    let mut cost_sum = 0.0;
    let mut downtime_sum = 0.0;

    for (mean_gain, roi, entry) in ranked {
        if roi <= 0.0 {
            // Descending order: nothing after this can be positive either.
            break;
        }
        if !economics.budget.allows(cost_sum + entry.cost)
            || !economics
                .max_downtime_hours
                .allows(downtime_sum + entry.downtime_hours)
        {
            debug!(action = %entry.name, roi, "Action does not fit remaining constraints");
            continue;
        }

        cost_sum += entry.cost;
        downtime_sum += entry.downtime_hours;
        schedule.push(ScheduleEntry {
            name: entry.name.clone(),
            cost: entry.cost,
            downtime_hours: entry.downtime_hours,
            expected_gain_units: mean_gain,
            roi,
            cumulative_cost: cost_sum,
            cumulative_downtime: downtime_sum,
        });
    }

    info!(
        accepted = schedule.len(),
        total_cost = cost_sum,
        total_downtime = downtime_sum,
        "Built maintenance schedule"
    );
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogEntry, Limit};
    use crate::types::RateSource;
    use chrono::NaiveDate;

    fn impact(event_type: &str, model: f64) -> ProjectedImpact {
        ProjectedImpact {
            event_date: NaiveDate::from_ymd_opt(2023, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            event_type: event_type.to_string(),
            tail: None,
            delta_t: 1.0,
            impact_model: model,
            impact_observed: None,
            rate_source: RateSource::TypeRate,
        }
    }

    fn entry(name: &str, cost: f64, downtime: f64) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            cost,
            downtime_hours: downtime,
            expected_delta_pf: 0.5,
        }
    }

    fn economics(budget: Limit, downtime: Limit) -> EconomicsConfig {
        EconomicsConfig {
            fuel_price_per_unit: 10.0,
            budget,
            max_downtime_hours: downtime,
            catalog: Vec::new(),
        }
    }

    #[test]
    fn test_greedy_order_and_budget_cutoff() {
        // A: gain 50 → roi 400; B: gain 10 → roi 50. Budget fits both.
        let catalog =
            MaintenanceCatalog::from_entries(&[entry("A", 100.0, 2.0), entry("B", 50.0, 1.0)]);
        let impacts = vec![impact("A", 50.0), impact("B", 10.0)];

        let schedule = build_schedule(
            &catalog,
            &impacts,
            &economics(Limit(Some(120.0)), Limit::UNBOUNDED),
        );

        // A exhausts the 120 budget (remaining 20 < B's 50) — only A fits.
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].name, "A");
        assert!((schedule[0].roi - 400.0).abs() < 1e-9);
        assert!((schedule[0].cumulative_cost - 100.0).abs() < 1e-9);

        // With budget 160 both fit, highest ROI first.
        let schedule = build_schedule(
            &catalog,
            &impacts,
            &economics(Limit(Some(160.0)), Limit::UNBOUNDED),
        );
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].name, "A");
        assert_eq!(schedule[1].name, "B");
        assert!((schedule[1].cumulative_cost - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_skip_does_not_stop_the_scan() {
        // A has the best ROI but busts the budget alone; cheap C still fits.
        let catalog = MaintenanceCatalog::from_entries(&[
            entry("A", 500.0, 1.0),
            entry("C", 20.0, 1.0),
        ]);
        let impacts = vec![impact("A", 100.0), impact("C", 10.0)];

        let schedule = build_schedule(
            &catalog,
            &impacts,
            &economics(Limit(Some(100.0)), Limit::UNBOUNDED),
        );
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].name, "C");
    }

    #[test]
    fn test_downtime_constraint() {
        let catalog =
            MaintenanceCatalog::from_entries(&[entry("A", 10.0, 8.0), entry("B", 10.0, 8.0)]);
        let impacts = vec![impact("A", 50.0), impact("B", 10.0)];

        let schedule = build_schedule(
            &catalog,
            &impacts,
            &economics(Limit::UNBOUNDED, Limit(Some(10.0))),
        );
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].name, "A");
    }

    #[test]
    fn test_non_positive_roi_rejected() {
        // Gain 1 × price 10 = 10 < cost 100.
        let catalog = MaintenanceCatalog::from_entries(&[entry("A", 100.0, 1.0)]);
        let impacts = vec![impact("A", 1.0)];

        assert!(build_schedule(&catalog, &impacts, &economics(Limit::UNBOUNDED, Limit::UNBOUNDED))
            .is_empty());
    }

    #[test]
    fn test_unobserved_action_gains_nothing() {
        // No impact records for A: mean gain 0, roi = -cost, rejected.
        let catalog = MaintenanceCatalog::from_entries(&[entry("A", 10.0, 1.0)]);

        assert!(
            build_schedule(&catalog, &[], &economics(Limit::UNBOUNDED, Limit::UNBOUNDED))
                .is_empty()
        );
    }

    #[test]
    fn test_roi_tie_keeps_declaration_order() {
        let catalog =
            MaintenanceCatalog::from_entries(&[entry("B", 50.0, 1.0), entry("A", 50.0, 1.0)]);
        let impacts = vec![impact("A", 10.0), impact("B", 10.0)];

        let schedule = build_schedule(
            &catalog,
            &impacts,
            &economics(Limit::UNBOUNDED, Limit::UNBOUNDED),
        );
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0].name, "B");
        assert_eq!(schedule[1].name, "A");
    }
}
