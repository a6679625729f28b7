//! Database models for persistent storage.

mod incident;
mod metric;
mod resource;

pub use incident::*;
pub use metric::*;
pub use resource::*;

use crate::error::{Error, Result};
use sismo_core::time::{self, Timestamp};

/// Decode a stored microsecond timestamp.
pub(crate) fn decode_timestamp(micros: i64) -> Result<Timestamp> {
    time::from_micros(micros)
        .ok_or_else(|| Error::Serialization(format!("timestamp out of range: {}", micros)))
}
