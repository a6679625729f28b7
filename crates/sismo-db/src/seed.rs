//! Scenario seeding.

use crate::error::Result;
use crate::store::{read_summaries_rw, write_summary, Store};
use native_db::transaction::RwTransaction;
use sismo_core::time::Timestamp;
use sismo_core::{backfill, select_current, IncidentSummary, MetricPoint, MetricTag, Scenario};
use tracing::info;

/// What a seed run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Id of the summary holding the scenario figures.
    pub summary_id: u64,
    /// Whether that summary was created rather than overwritten.
    pub summary_created: bool,
    pub bridges: usize,
    pub hospitals: usize,
    pub shelters: usize,
    pub services: usize,
    /// Backfilled samples, all tags together.
    pub metric_points: usize,
}

impl Store {
    /// Write a scenario.
    ///
    /// - The current summary takes the scenario figures (created if missing)
    /// - Every resource is upserted by name
    /// - Each of the four incident series is replaced by its backfill
    pub fn seed_scenario(&self, scenario: &Scenario, now: Timestamp) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        let rw = self.db.rw_transaction()?;
        let summary = overwrite_current(&rw, scenario, now, &mut report)?;
        rw.commit()?;
        report.summary_id = summary.id.unwrap_or_default();
        info!(
            summary = report.summary_id,
            created = report.summary_created,
            "incident summary seeded"
        );

        for bridge in &scenario.bridges {
            self.upsert_bridge(bridge)?;
            report.bridges += 1;
        }
        for hospital in &scenario.hospitals {
            self.upsert_hospital(hospital)?;
            report.hospitals += 1;
        }
        for shelter in &scenario.shelters {
            self.upsert_shelter(shelter)?;
            report.shelters += 1;
        }
        for service in &scenario.services {
            self.upsert_service(service, now)?;
            report.services += 1;
        }
        info!(
            bridges = report.bridges,
            hospitals = report.hospitals,
            shelters = report.shelters,
            services = report.services,
            "resources seeded"
        );

        let history = backfill(&scenario.summary, &scenario.timeline, now);
        for tag in MetricTag::ALL {
            let series: Vec<MetricPoint> = history.iter().filter(|p| p.is(tag)).cloned().collect();
            report.metric_points += self.replace_metric_series(tag.as_str(), &series)?.len();
        }
        info!(points = report.metric_points, "metric series backfilled");

        Ok(report)
    }
}

fn overwrite_current(
    rw: &RwTransaction<'_>,
    scenario: &Scenario,
    now: Timestamp,
    report: &mut SeedReport,
) -> Result<IncidentSummary> {
    let summaries = read_summaries_rw(rw)?;
    let summary = match select_current(summaries) {
        Some(mut current) => {
            current.values = scenario.summary;
            current
        }
        None => {
            report.summary_created = true;
            IncidentSummary::new(now, scenario.summary)
        }
    };
    write_summary(rw, &summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sismo_core::group_series;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 4, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_seed_empty_store() {
        let store = Store::in_memory().unwrap();
        let scenario = Scenario::las_malvinas().unwrap();

        let report = store.seed_scenario(&scenario, now()).unwrap();
        assert!(report.summary_created);
        assert_eq!(report.bridges, 2);
        assert_eq!(report.hospitals, 2);
        assert_eq!(report.shelters, 3);
        assert_eq!(report.services, 5);
        assert_eq!(report.metric_points, 20);

        let current = store.load_current_summary().unwrap().unwrap();
        assert_eq!(current.id, Some(report.summary_id));
        assert_eq!(current.values, scenario.summary);

        let series = group_series(store.list_metric_points().unwrap());
        assert_eq!(series.len(), 4);
        let hospital: Vec<f64> = series["hospital_operational_pct"]
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(hospital, vec![40.0, 36.0, 30.0, 20.0, 15.0]);
        assert_eq!(
            series["fatalities"][0].timestamp,
            now() - Duration::hours(72)
        );
    }

    #[test]
    fn test_seed_twice_replaces_history() {
        let store = Store::in_memory().unwrap();
        let scenario = Scenario::las_malvinas().unwrap();

        let first = store.seed_scenario(&scenario, now()).unwrap();
        store.advance_simulation(now()).unwrap();
        let second = store
            .seed_scenario(&scenario, now() + Duration::hours(1))
            .unwrap();

        assert!(!second.summary_created);
        assert_eq!(second.summary_id, first.summary_id);
        assert_eq!(store.load_all_summaries().unwrap().len(), 1);
        assert_eq!(store.list_bridges().unwrap().len(), 2);
        assert_eq!(store.list_services().unwrap().len(), 5);

        // The simulated samples are gone along with the first backfill.
        let points = store.list_metric_points().unwrap();
        assert_eq!(points.len(), 20);

        let current = store.load_current_summary().unwrap().unwrap();
        assert_eq!(current.values.fatalities, 80);
        assert_eq!(current.created_at, now());
    }
}
