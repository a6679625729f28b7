//! Sismo DB - Database layer using native_db
//!
//! Provides persistent storage for:
//! - Incident summaries (the latest one is current)
//! - Bridges, hospitals, shelters and service statuses, keyed by name
//! - Append-only metric points, grouped by tag
//!
//! Composite writes (a simulation step, a series replace) run inside a
//! single write transaction.

mod error;
mod models;
mod queries;
mod seed;
mod store;

pub use error::{Error, Result};
pub use seed::SeedReport;
pub use store::Store;
