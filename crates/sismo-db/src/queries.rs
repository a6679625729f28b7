//! Resource and metric queries.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::{
    next_id, Store, BRIDGE_SEQ, HOSPITAL_SEQ, METRIC_SEQ, SERVICE_SEQ, SHELTER_SEQ,
};
use native_db::transaction::RwTransaction;
use sismo_core::time::Timestamp;
use sismo_core::{Bridge, Hospital, MetricPoint, ServiceStatus, Shelter};
use tracing::debug;

impl Store {
    /// Get all bridges, in id order.
    pub fn list_bridges(&self) -> Result<Vec<Bridge>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredBridge>()?;
        let iter = scan.all()?;
        let bridges: std::result::Result<Vec<StoredBridge>, _> = iter.collect();
        let bridges = bridges.map_err(|e| Error::Database(e.to_string()))?;
        bridges.iter().map(StoredBridge::to_bridge).collect()
    }

    /// Get all hospitals, in id order.
    pub fn list_hospitals(&self) -> Result<Vec<Hospital>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredHospital>()?;
        let iter = scan.all()?;
        let hospitals: std::result::Result<Vec<StoredHospital>, _> = iter.collect();
        let hospitals = hospitals.map_err(|e| Error::Database(e.to_string()))?;
        Ok(hospitals.iter().map(StoredHospital::to_hospital).collect())
    }

    /// Get all shelters, in id order.
    pub fn list_shelters(&self) -> Result<Vec<Shelter>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredShelter>()?;
        let iter = scan.all()?;
        let shelters: std::result::Result<Vec<StoredShelter>, _> = iter.collect();
        let shelters = shelters.map_err(|e| Error::Database(e.to_string()))?;
        Ok(shelters.iter().map(StoredShelter::to_shelter).collect())
    }

    /// Get all service statuses, in id order.
    pub fn list_services(&self) -> Result<Vec<ServiceStatus>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredService>()?;
        let iter = scan.all()?;
        let services: std::result::Result<Vec<StoredService>, _> = iter.collect();
        let services = services.map_err(|e| Error::Database(e.to_string()))?;
        services.iter().map(StoredService::to_service).collect()
    }

    /// Insert a bridge or replace the one with the same name.
    pub fn upsert_bridge(&self, bridge: &Bridge) -> Result<Bridge> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredBridge> = rw
            .get()
            .secondary(StoredBridgeKey::name, bridge.name.clone())?;
        let id = match existing {
            Some(stored) => stored.id,
            None => next_id(&rw, BRIDGE_SEQ)?,
        };
        let stored = StoredBridge::from_bridge(id, bridge);
        rw.upsert(stored.clone())?;
        rw.commit()?;
        debug!(bridge = %bridge.name, id, "bridge upserted");
        stored.to_bridge()
    }

    /// Insert a hospital or replace the one with the same name.
    pub fn upsert_hospital(&self, hospital: &Hospital) -> Result<Hospital> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredHospital> = rw
            .get()
            .secondary(StoredHospitalKey::name, hospital.name.clone())?;
        let id = match existing {
            Some(stored) => stored.id,
            None => next_id(&rw, HOSPITAL_SEQ)?,
        };
        let stored = StoredHospital::from_hospital(id, hospital);
        rw.upsert(stored.clone())?;
        rw.commit()?;
        debug!(hospital = %hospital.name, id, "hospital upserted");
        Ok(stored.to_hospital())
    }

    /// Insert a shelter or replace the one with the same name.
    pub fn upsert_shelter(&self, shelter: &Shelter) -> Result<Shelter> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredShelter> = rw
            .get()
            .secondary(StoredShelterKey::name, shelter.name.clone())?;
        let id = match existing {
            Some(stored) => stored.id,
            None => next_id(&rw, SHELTER_SEQ)?,
        };
        let stored = StoredShelter::from_shelter(id, shelter);
        rw.upsert(stored.clone())?;
        rw.commit()?;
        debug!(shelter = %shelter.name, id, "shelter upserted");
        Ok(stored.to_shelter())
    }

    /// Insert a service status or replace the one with the same name.
    ///
    /// `updated_at` is set to `now` on every write.
    pub fn upsert_service(&self, service: &ServiceStatus, now: Timestamp) -> Result<ServiceStatus> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredService> = rw
            .get()
            .secondary(StoredServiceKey::name, service.name.clone())?;
        let id = match existing {
            Some(stored) => stored.id,
            None => next_id(&rw, SERVICE_SEQ)?,
        };
        let mut stored = StoredService::from_service(id, service);
        stored.updated_at = sismo_core::time::to_micros(&now);
        rw.upsert(stored.clone())?;
        rw.commit()?;
        debug!(service = %service.name, id, "service upserted");
        stored.to_service()
    }

    /// Append samples; returns them with their ids.
    pub fn append_metric_points(&self, points: &[MetricPoint]) -> Result<Vec<MetricPoint>> {
        let rw = self.db.rw_transaction()?;
        let saved = insert_points(&rw, points)?;
        rw.commit()?;
        Ok(saved)
    }

    /// Delete every sample whose tag is exactly one of `tags`.
    pub fn delete_metric_points_by_tag(&self, tags: &[&str]) -> Result<usize> {
        let rw = self.db.rw_transaction()?;
        let mut removed = 0;
        for tag in tags {
            removed += remove_tag(&rw, tag)?;
        }
        rw.commit()?;
        Ok(removed)
    }

    /// Replace the whole series of `tag` with `points`.
    ///
    /// Delete and insert share one write transaction, so readers see either
    /// the old series or the new one.
    pub fn replace_metric_series(
        &self,
        tag: &str,
        points: &[MetricPoint],
    ) -> Result<Vec<MetricPoint>> {
        if let Some(stray) = points.iter().find(|p| p.metric != tag) {
            return Err(Error::TagMismatch {
                expected: tag.to_string(),
                found: stray.metric.clone(),
            });
        }
        let rw = self.db.rw_transaction()?;
        let removed = remove_tag(&rw, tag)?;
        let saved = insert_points(&rw, points)?;
        rw.commit()?;
        debug!(tag, removed, inserted = saved.len(), "metric series replaced");
        Ok(saved)
    }

    /// Get all samples, ascending by timestamp then id.
    pub fn list_metric_points(&self) -> Result<Vec<MetricPoint>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredMetricPoint>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredMetricPoint>, _> = iter.collect();
        let mut stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        stored.sort_by_key(|p| (p.timestamp, p.id));
        stored.iter().map(StoredMetricPoint::to_point).collect()
    }
}

/// Insert samples inside a write transaction, assigning ids.
pub(crate) fn insert_points(
    rw: &RwTransaction<'_>,
    points: &[MetricPoint],
) -> Result<Vec<MetricPoint>> {
    let mut saved = Vec::with_capacity(points.len());
    for point in points {
        let id = next_id(rw, METRIC_SEQ)?;
        let stored = StoredMetricPoint::from_point(id, point);
        rw.insert(stored)?;
        let mut point = point.clone();
        point.id = Some(id);
        saved.push(point);
    }
    Ok(saved)
}

/// Remove every sample of exactly `tag` inside a write transaction.
fn remove_tag(rw: &RwTransaction<'_>, tag: &str) -> Result<usize> {
    let doomed: Vec<StoredMetricPoint> = {
        let scan = rw
            .scan()
            .secondary::<StoredMetricPoint>(StoredMetricPointKey::metric)?;
        let iter = scan.start_with(tag)?;
        let matches: std::result::Result<Vec<StoredMetricPoint>, _> = iter.collect();
        matches
            .map_err(|e| Error::Database(e.to_string()))?
            .into_iter()
            // start_with is a prefix match
            .filter(|p| p.metric == tag)
            .collect()
    };
    let count = doomed.len();
    for point in doomed {
        rw.remove(point)?;
    }
    Ok(count)
}
