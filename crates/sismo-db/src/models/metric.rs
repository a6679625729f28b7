//! Metric point model for database storage.

use super::decode_timestamp;
use crate::error::Result;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use sismo_core::time;
use sismo_core::MetricPoint;

/// Stored time-series sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredMetricPoint {
    /// Primary key - point ID, increasing in insertion order.
    #[primary_key]
    pub id: u64,
    /// Series tag.
    #[secondary_key]
    pub metric: String,
    /// Sample time, microseconds since the epoch.
    pub timestamp: i64,
    pub value: f64,
    pub note: String,
}

impl StoredMetricPoint {
    /// Create from a metric point and the id it is stored under.
    pub fn from_point(id: u64, point: &MetricPoint) -> Self {
        Self {
            id,
            metric: point.metric.clone(),
            timestamp: time::to_micros(&point.timestamp),
            value: point.value,
            note: point.note.clone(),
        }
    }

    /// Convert to a metric point.
    pub fn to_point(&self) -> Result<MetricPoint> {
        Ok(MetricPoint {
            id: Some(self.id),
            timestamp: decode_timestamp(self.timestamp)?,
            metric: self.metric.clone(),
            value: self.value,
            note: self.note.clone(),
        })
    }
}
