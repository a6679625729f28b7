//! Resource models for database storage.
//!
//! Every resource has a numeric primary key and a unique `name` secondary
//! key; the name is the business key used for upserts.

use super::decode_timestamp;
use crate::error::{Error, Result};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use sismo_core::time;
use sismo_core::{Bridge, BridgeStatus, Hospital, ServiceStatus, Shelter};

/// Stored bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredBridge {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Damage state (serialized).
    pub status: u8,
    pub notes: String,
}

impl StoredBridge {
    /// Create from a Bridge.
    pub fn from_bridge(id: u64, bridge: &Bridge) -> Self {
        let status = match bridge.status {
            BridgeStatus::Derribado => 0,
            BridgeStatus::Parcialmente => 1,
            BridgeStatus::Ok => 2,
        };
        Self {
            id,
            name: bridge.name.clone(),
            lat: bridge.lat,
            lng: bridge.lng,
            status,
            notes: bridge.notes.clone(),
        }
    }

    /// Convert to a Bridge.
    pub fn to_bridge(&self) -> Result<Bridge> {
        let status = match self.status {
            0 => BridgeStatus::Derribado,
            1 => BridgeStatus::Parcialmente,
            2 => BridgeStatus::Ok,
            code => {
                return Err(Error::Serialization(format!(
                    "bridge {}: unknown status code {}",
                    self.id, code
                )))
            }
        };
        Ok(Bridge {
            id: Some(self.id),
            name: self.name.clone(),
            lat: self.lat,
            lng: self.lng,
            status,
            notes: self.notes.clone(),
        })
    }
}

/// Stored hospital.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredHospital {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub total_beds: i64,
    pub available_beds: i64,
    pub operational: bool,
}

impl StoredHospital {
    /// Create from a Hospital.
    pub fn from_hospital(id: u64, hospital: &Hospital) -> Self {
        Self {
            id,
            name: hospital.name.clone(),
            lat: hospital.lat,
            lng: hospital.lng,
            total_beds: hospital.total_beds,
            available_beds: hospital.available_beds,
            operational: hospital.operational,
        }
    }

    /// Convert to a Hospital.
    pub fn to_hospital(&self) -> Hospital {
        Hospital {
            id: Some(self.id),
            name: self.name.clone(),
            lat: self.lat,
            lng: self.lng,
            total_beds: self.total_beds,
            available_beds: self.available_beds,
            operational: self.operational,
        }
    }
}

/// Stored shelter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredShelter {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub capacity: i64,
    pub occupants: i64,
}

impl StoredShelter {
    /// Create from a Shelter.
    pub fn from_shelter(id: u64, shelter: &Shelter) -> Self {
        Self {
            id,
            name: shelter.name.clone(),
            lat: shelter.lat,
            lng: shelter.lng,
            capacity: shelter.capacity,
            occupants: shelter.occupants,
        }
    }

    /// Convert to a Shelter.
    pub fn to_shelter(&self) -> Shelter {
        Shelter {
            id: Some(self.id),
            name: self.name.clone(),
            lat: self.lat,
            lng: self.lng,
            capacity: self.capacity,
            occupants: self.occupants,
        }
    }
}

/// Stored service status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredService {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub name: String,
    pub status: String,
    pub note: String,
    /// Last write, microseconds since the epoch.
    pub updated_at: i64,
}

impl StoredService {
    /// Create from a ServiceStatus.
    pub fn from_service(id: u64, service: &ServiceStatus) -> Self {
        Self {
            id,
            name: service.name.clone(),
            status: service.status.clone(),
            note: service.note.clone(),
            updated_at: time::to_micros(&service.updated_at),
        }
    }

    /// Convert to a ServiceStatus.
    pub fn to_service(&self) -> Result<ServiceStatus> {
        Ok(ServiceStatus {
            id: Some(self.id),
            name: self.name.clone(),
            status: self.status.clone(),
            note: self.note.clone(),
            updated_at: decode_timestamp(self.updated_at)?,
        })
    }
}
