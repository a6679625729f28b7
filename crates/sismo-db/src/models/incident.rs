//! Incident summary model for database storage.

use super::decode_timestamp;
use crate::error::Result;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use sismo_core::time;
use sismo_core::{IncidentSummary, SummaryValues};

/// Stored incident summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredSummary {
    /// Primary key - summary ID.
    #[primary_key]
    pub id: u64,
    /// Creation time, microseconds since the epoch.
    pub created_at: i64,
    pub population: i64,
    pub affected_pct_min: f64,
    pub affected_pct_max: f64,
    pub shelter_needed_min: i64,
    pub shelter_needed_max: i64,
    pub hospital_operational_pct: f64,
    pub fatalities: i64,
    pub injured_severe_min: i64,
    pub injured_severe_max: i64,
    pub injured_mild_min: i64,
    pub injured_mild_max: i64,
}

impl StoredSummary {
    /// Create from a summary and the id it is stored under.
    pub fn from_summary(id: u64, summary: &IncidentSummary) -> Self {
        let v = &summary.values;
        Self {
            id,
            created_at: time::to_micros(&summary.created_at),
            population: v.population,
            affected_pct_min: v.affected_pct_min,
            affected_pct_max: v.affected_pct_max,
            shelter_needed_min: v.shelter_needed_min,
            shelter_needed_max: v.shelter_needed_max,
            hospital_operational_pct: v.hospital_operational_pct,
            fatalities: v.fatalities,
            injured_severe_min: v.injured_severe_min,
            injured_severe_max: v.injured_severe_max,
            injured_mild_min: v.injured_mild_min,
            injured_mild_max: v.injured_mild_max,
        }
    }

    /// Convert to a summary.
    pub fn to_summary(&self) -> Result<IncidentSummary> {
        Ok(IncidentSummary {
            id: Some(self.id),
            created_at: decode_timestamp(self.created_at)?,
            values: SummaryValues {
                population: self.population,
                affected_pct_min: self.affected_pct_min,
                affected_pct_max: self.affected_pct_max,
                shelter_needed_min: self.shelter_needed_min,
                shelter_needed_max: self.shelter_needed_max,
                hospital_operational_pct: self.hospital_operational_pct,
                fatalities: self.fatalities,
                injured_severe_min: self.injured_severe_min,
                injured_severe_max: self.injured_severe_max,
                injured_mild_min: self.injured_mild_min,
                injured_mild_max: self.injured_mild_max,
            },
        })
    }
}

/// Id allocator, one row per table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 7, version = 1)]
#[native_db]
pub struct StoredSequence {
    /// Primary key - table name.
    #[primary_key]
    pub name: String,
    /// Next id to hand out.
    pub next: u64,
}
