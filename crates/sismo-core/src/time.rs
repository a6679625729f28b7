//! Time helpers shared by the model, the store and the HTTP surface
//!
//! - `Timestamp` - wall-clock instant (UTC)
//! - `to_iso` - wire format used in every JSON payload
//! - `to_micros` / `from_micros` - compact form used as storage keys
//! - `iso` - serde adapter for `Timestamp` fields

use chrono::{DateTime, SecondsFormat, Utc};

/// A wall-clock instant
pub type Timestamp = DateTime<Utc>;

/// Format a timestamp as ISO-8601 with microseconds and an explicit `+00:00` offset
pub fn to_iso(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Microseconds since the Unix epoch
pub fn to_micros(ts: &Timestamp) -> i64 {
    ts.timestamp_micros()
}

/// Inverse of `to_micros`. `None` when the value is outside chrono's range.
pub fn from_micros(micros: i64) -> Option<Timestamp> {
    DateTime::<Utc>::from_timestamp_micros(micros)
}

/// Serde adapter: `#[serde(with = "sismo_core::time::iso")]`
pub mod iso {
    use super::{to_iso, Timestamp};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_iso(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
