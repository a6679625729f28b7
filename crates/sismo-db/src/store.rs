//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use crate::queries::insert_points;
use native_db::transaction::{RTransaction, RwTransaction};
use native_db::*;
use sismo_core::time::Timestamp;
use sismo_core::{select_current, simulate, IncidentSummary, SimulationOutcome};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models
        .define::<StoredSummary>()
        .expect("summary model definition");
    models
        .define::<StoredBridge>()
        .expect("bridge model definition");
    models
        .define::<StoredHospital>()
        .expect("hospital model definition");
    models
        .define::<StoredShelter>()
        .expect("shelter model definition");
    models
        .define::<StoredService>()
        .expect("service model definition");
    models
        .define::<StoredMetricPoint>()
        .expect("metric point model definition");
    models
        .define::<StoredSequence>()
        .expect("sequence model definition");
    models
});

/// Sequence names, one per table with numeric ids.
pub(crate) const SUMMARY_SEQ: &str = "summary";
pub(crate) const BRIDGE_SEQ: &str = "bridge";
pub(crate) const HOSPITAL_SEQ: &str = "hospital";
pub(crate) const SHELTER_SEQ: &str = "shelter";
pub(crate) const SERVICE_SEQ: &str = "service";
pub(crate) const METRIC_SEQ: &str = "metric_point";

/// Database store for the dashboard records.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Builder::new()
            .create(&MODELS, path)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Load the summary with the latest creation time.
    pub fn load_current_summary(&self) -> Result<Option<IncidentSummary>> {
        let r = self.db.r_transaction()?;
        Ok(select_current(read_summaries(&r)?))
    }

    /// Load all summaries, current and past, in id order.
    pub fn load_all_summaries(&self) -> Result<Vec<IncidentSummary>> {
        let r = self.db.r_transaction()?;
        read_summaries(&r)
    }

    /// Load the current summary, creating the baseline one if there is none.
    pub fn current_or_default(&self, now: Timestamp) -> Result<IncidentSummary> {
        let rw = self.db.rw_transaction()?;
        let summary = current_or_create(&rw, now)?;
        rw.commit()?;
        Ok(summary)
    }

    /// Save a summary.
    ///
    /// Unsaved summaries get a fresh id. Saved ones are updated in place and
    /// keep the creation time already on record.
    pub fn save_summary(&self, summary: &IncidentSummary) -> Result<IncidentSummary> {
        let rw = self.db.rw_transaction()?;
        let saved = write_summary(&rw, summary)?;
        rw.commit()?;
        Ok(saved)
    }

    /// Run one simulation step on the current summary.
    ///
    /// Reading the current summary, saving the next one and appending the
    /// samples happen in one write transaction.
    pub fn advance_simulation(&self, now: Timestamp) -> Result<SimulationOutcome> {
        let rw = self.db.rw_transaction()?;
        let current = current_or_create(&rw, now)?;
        let outcome = simulate(&current, now);
        let next = write_summary(&rw, &outcome.next)?;
        let samples = insert_points(&rw, &outcome.samples)?;
        rw.commit()?;

        info!(
            summary = ?next.id,
            fatalities = next.values.fatalities,
            hospital_operational_pct = next.values.hospital_operational_pct,
            "simulation step applied"
        );
        Ok(SimulationOutcome { next, samples })
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

/// Hand out the next id of a table.
pub(crate) fn next_id(rw: &RwTransaction<'_>, table: &str) -> Result<u64> {
    let current: Option<StoredSequence> = rw.get().primary(table.to_string())?;
    let id = current.map(|s| s.next).unwrap_or(1);
    rw.upsert(StoredSequence {
        name: table.to_string(),
        next: id + 1,
    })?;
    Ok(id)
}

fn read_summaries(r: &RTransaction<'_>) -> Result<Vec<IncidentSummary>> {
    let scan = r.scan().primary::<StoredSummary>()?;
    let iter = scan.all()?;
    let stored: std::result::Result<Vec<StoredSummary>, _> = iter.collect();
    let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
    stored.iter().map(StoredSummary::to_summary).collect()
}

pub(crate) fn read_summaries_rw(rw: &RwTransaction<'_>) -> Result<Vec<IncidentSummary>> {
    let scan = rw.scan().primary::<StoredSummary>()?;
    let iter = scan.all()?;
    let stored: std::result::Result<Vec<StoredSummary>, _> = iter.collect();
    let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
    stored.iter().map(StoredSummary::to_summary).collect()
}

/// Current summary inside a write transaction, created when missing.
pub(crate) fn current_or_create(
    rw: &RwTransaction<'_>,
    now: Timestamp,
) -> Result<IncidentSummary> {
    if let Some(current) = select_current(read_summaries_rw(rw)?) {
        return Ok(current);
    }
    let created = write_summary(rw, &IncidentSummary::baseline(now))?;
    info!(summary = ?created.id, "no incident on record, created baseline summary");
    Ok(created)
}

/// Insert or update a summary inside a write transaction.
pub(crate) fn write_summary(
    rw: &RwTransaction<'_>,
    summary: &IncidentSummary,
) -> Result<IncidentSummary> {
    let mut saved = summary.clone();
    match summary.id {
        Some(id) => {
            let existing: Option<StoredSummary> = rw.get().primary(id)?;
            let existing = existing.ok_or_else(|| Error::NotFound(format!("summary {}", id)))?;
            saved.created_at = decode_timestamp(existing.created_at)?;
            rw.upsert(StoredSummary::from_summary(id, &saved))?;
            debug!(summary = id, "summary updated");
        }
        None => {
            let id = next_id(rw, SUMMARY_SEQ)?;
            saved.id = Some(id);
            rw.insert(StoredSummary::from_summary(id, &saved))?;
            debug!(summary = id, "summary created");
        }
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sismo_core::MetricTag;

    fn t(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_no_current_summary() {
        let store = Store::in_memory().unwrap();
        assert!(store.load_current_summary().unwrap().is_none());
    }

    #[test]
    fn test_current_or_default_creates_once() {
        let store = Store::in_memory().unwrap();

        let first = store.current_or_default(t(1)).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(first.created_at, t(1));
        assert_eq!(first.values.fatalities, 80);

        let second = store.current_or_default(t(2)).unwrap();
        assert_eq!(second, first);
        assert_eq!(store.load_all_summaries().unwrap().len(), 1);
    }

    #[test]
    fn test_latest_summary_is_current() {
        let store = Store::in_memory().unwrap();
        let older = store.save_summary(&IncidentSummary::baseline(t(5))).unwrap();
        let mut newer = IncidentSummary::baseline(t(9));
        newer.values.fatalities = 120;
        let newer = store.save_summary(&newer).unwrap();
        // Saved after, but created before: not current.
        store.save_summary(&IncidentSummary::baseline(t(3))).unwrap();

        let current = store.load_current_summary().unwrap().unwrap();
        assert_eq!(current.id, newer.id);
        assert_ne!(current.id, older.id);
        assert_eq!(current.values.fatalities, 120);
    }

    #[test]
    fn test_save_keeps_created_at() {
        let store = Store::in_memory().unwrap();
        let mut saved = store.save_summary(&IncidentSummary::baseline(t(4))).unwrap();

        saved.created_at = t(4) + Duration::days(3);
        saved.values.population = 4000;
        let updated = store.save_summary(&saved).unwrap();

        assert_eq!(updated.created_at, t(4));
        let current = store.load_current_summary().unwrap().unwrap();
        assert_eq!(current.created_at, t(4));
        assert_eq!(current.values.population, 4000);
    }

    #[test]
    fn test_save_unknown_id() {
        let store = Store::in_memory().unwrap();
        let mut summary = IncidentSummary::baseline(t(4));
        summary.id = Some(42);
        assert!(matches!(
            store.save_summary(&summary),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_advance_simulation_persists_step() {
        let store = Store::in_memory().unwrap();

        let outcome = store.advance_simulation(t(6)).unwrap();
        assert_eq!(outcome.next.values.fatalities, 84);
        assert_eq!(outcome.samples.len(), 4);
        assert!(outcome.samples.iter().all(|p| p.id.is_some()));

        let current = store.load_current_summary().unwrap().unwrap();
        assert_eq!(current, outcome.next);
        assert_eq!(current.created_at, t(6));

        let outcome = store.advance_simulation(t(7)).unwrap();
        assert_eq!(outcome.next.values.fatalities, 88);
        assert_eq!(store.load_all_summaries().unwrap().len(), 1);

        let points = store.list_metric_points().unwrap();
        assert_eq!(points.len(), 8);
        let fatalities: Vec<f64> = points
            .iter()
            .filter(|p| p.is(MetricTag::Fatalities))
            .map(|p| p.value)
            .collect();
        assert_eq!(fatalities, vec![84.0, 88.0]);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = std::env::temp_dir().join(format!("sismo-db-test-{}", std::process::id()));
        let path = dir.join("nested").join("dashboard.db");

        {
            let store = Store::open(&path).unwrap();
            store.current_or_default(t(1)).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert!(store.load_current_summary().unwrap().is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
