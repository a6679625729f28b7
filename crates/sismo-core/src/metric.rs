//! Time-series samples

use crate::time::{self, Timestamp};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tags of the series produced by the simulation and the backfill
///
/// The string forms are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricTag {
    Fatalities,
    InjuredSevere,
    InjuredMild,
    HospitalOperationalPct,
}

impl MetricTag {
    /// All tags, in emission order
    pub const ALL: [MetricTag; 4] = [
        MetricTag::Fatalities,
        MetricTag::InjuredSevere,
        MetricTag::InjuredMild,
        MetricTag::HospitalOperationalPct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricTag::Fatalities => "fatalities",
            MetricTag::InjuredSevere => "injured_severe",
            MetricTag::InjuredMild => "injured_mild",
            MetricTag::HospitalOperationalPct => "hospital_operational_pct",
        }
    }
}

impl fmt::Display for MetricTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped sample. Append-only: points are created, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Store-assigned id, `None` until appended
    pub id: Option<u64>,
    #[serde(with = "time::iso")]
    pub timestamp: Timestamp,
    /// Series tag; free-form, the known ones are listed in `MetricTag`
    pub metric: String,
    pub value: f64,
    pub note: String,
}

impl MetricPoint {
    /// Create an unsaved sample for a known series
    pub fn new(tag: MetricTag, timestamp: Timestamp, value: f64) -> Self {
        Self {
            id: None,
            timestamp,
            metric: tag.as_str().to_string(),
            value,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Whether this sample belongs to `tag`
    pub fn is(&self, tag: MetricTag) -> bool {
        self.metric == tag.as_str()
    }
}

/// `{timestamp, value}` entry of a served series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    #[serde(with = "time::iso")]
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Series keyed by tag, tags in order of first appearance
pub type SeriesMap = IndexMap<String, Vec<SeriesPoint>>;

/// Group samples per tag, each series ascending by timestamp
///
/// The sort is stable, so samples sharing a timestamp keep their input order.
pub fn group_series(points: impl IntoIterator<Item = MetricPoint>) -> SeriesMap {
    let mut points: Vec<MetricPoint> = points.into_iter().collect();
    points.sort_by_key(|p| p.timestamp);

    let mut series = SeriesMap::new();
    for point in points {
        series.entry(point.metric).or_default().push(SeriesPoint {
            timestamp: point.timestamp,
            value: point.value,
        });
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_tag_wire_names() {
        let names: Vec<String> = MetricTag::ALL.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "fatalities",
                "injured_severe",
                "injured_mild",
                "hospital_operational_pct"
            ]
        );
    }

    #[test]
    fn test_group_series_orders_by_timestamp() {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let points = vec![
            MetricPoint::new(MetricTag::Fatalities, t0 + Duration::hours(2), 84.0),
            MetricPoint::new(MetricTag::HospitalOperationalPct, t0 + Duration::hours(2), 32.0),
            MetricPoint::new(MetricTag::Fatalities, t0, 48.0),
        ];

        let series = group_series(points);
        let tags: Vec<&str> = series.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["fatalities", "hospital_operational_pct"]);

        let fatalities = &series["fatalities"];
        assert_eq!(fatalities.len(), 2);
        assert_eq!(fatalities[0].value, 48.0);
        assert_eq!(fatalities[1].value, 84.0);
    }

    #[test]
    fn test_series_point_wire_shape() {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let series = group_series(vec![MetricPoint::new(MetricTag::InjuredMild, t0, 850.0)]);
        let json = serde_json::to_value(&series).unwrap();

        assert_eq!(json["injured_mild"][0]["value"], 850.0);
        assert_eq!(
            json["injured_mild"][0]["timestamp"],
            "2025-06-01T00:00:00.000000+00:00"
        );
    }
}
