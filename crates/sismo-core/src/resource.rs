//! Located resources: bridges, hospitals, shelters and service statuses
//!
//! Every resource is identified by its `name`. The store enforces that the
//! name is unique and uses it as the upsert key.

use crate::time::{self, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Share of `capacity` taken by `used`, as a percentage rounded to one decimal
///
/// Returns `0.0` when `capacity` is zero.
pub fn occupancy_pct(capacity: i64, used: i64) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    let pct = used as f64 / capacity as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Damage state of a bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeStatus {
    /// Collapsed
    #[default]
    Derribado,
    /// Partially damaged
    Parcialmente,
    /// Operational
    Ok,
}

impl BridgeStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeStatus::Derribado => "derribado",
            BridgeStatus::Parcialmente => "parcialmente",
            BridgeStatus::Ok => "ok",
        }
    }
}

/// A bridge on an access route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub status: BridgeStatus,
    #[serde(default)]
    pub notes: String,
}

/// A hospital and its bed count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub total_beds: i64,
    pub available_beds: i64,
    #[serde(default = "default_operational")]
    pub operational: bool,
}

fn default_operational() -> bool {
    true
}

impl Hospital {
    /// Percentage of beds in use
    pub fn occupancy_pct(&self) -> f64 {
        occupancy_pct(self.total_beds, self.total_beds - self.available_beds)
    }

    /// Attach the derived occupancy
    pub fn view(&self) -> HospitalView {
        HospitalView {
            occupancy_pct: self.occupancy_pct(),
            hospital: self.clone(),
        }
    }
}

/// Hospital as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalView {
    #[serde(flatten)]
    pub hospital: Hospital,
    pub occupancy_pct: f64,
}

/// An emergency shelter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub capacity: i64,
    #[serde(default)]
    pub occupants: i64,
}

impl Shelter {
    /// Percentage of places taken
    pub fn occupancy_pct(&self) -> f64 {
        occupancy_pct(self.capacity, self.occupants)
    }

    /// Attach the derived occupancy
    pub fn view(&self) -> ShelterView {
        ShelterView {
            occupancy_pct: self.occupancy_pct(),
            shelter: self.clone(),
        }
    }
}

/// Shelter as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterView {
    #[serde(flatten)]
    pub shelter: Shelter,
    pub occupancy_pct: f64,
}

/// Status of a basic service (electricity, water, communications...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub note: String,
    /// Refreshed by the store on every write
    #[serde(with = "time::iso", default = "Utc::now")]
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital(total_beds: i64, available_beds: i64) -> Hospital {
        Hospital {
            id: None,
            name: "Hospital Regional San Rafael".to_string(),
            lat: -34.616,
            lng: -68.333,
            total_beds,
            available_beds,
            operational: true,
        }
    }

    #[test]
    fn test_occupancy_zero_capacity() {
        assert_eq!(occupancy_pct(0, 0), 0.0);
        assert_eq!(occupancy_pct(0, 12), 0.0);
        assert_eq!(hospital(0, 5).occupancy_pct(), 0.0);
    }

    #[test]
    fn test_hospital_occupancy() {
        assert_eq!(hospital(200, 80).occupancy_pct(), 60.0);
        assert_eq!(hospital(30, 3).occupancy_pct(), 90.0);
    }

    #[test]
    fn test_occupancy_rounds_to_one_decimal() {
        assert_eq!(occupancy_pct(3, 1), 33.3);
        assert_eq!(occupancy_pct(3, 2), 66.7);
    }

    #[test]
    fn test_shelter_occupancy() {
        let shelter = Shelter {
            id: Some(1),
            name: "Refugio Provisorio - Plaza Central".to_string(),
            lat: -35.02,
            lng: -69.323,
            capacity: 300,
            occupants: 150,
        };
        assert_eq!(shelter.occupancy_pct(), 50.0);

        let json = serde_json::to_value(shelter.view()).unwrap();
        assert_eq!(json["occupancy_pct"], 50.0);
        assert_eq!(json["capacity"], 300);
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_bridge_status_wire_names() {
        let json = serde_json::to_string(&BridgeStatus::Parcialmente).unwrap();
        assert_eq!(json, "\"parcialmente\"");
        assert_eq!(BridgeStatus::Ok.as_str(), "ok");
        assert_eq!(BridgeStatus::default(), BridgeStatus::Derribado);
    }
}
