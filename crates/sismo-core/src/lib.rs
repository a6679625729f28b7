//! Sismo Core - Incident model and simulation for the earthquake dashboard
//!
//! This crate holds the pure part of the dashboard:
//! - `IncidentSummary` and its derived view (averages of the min/max ranges)
//! - Resource records (`Bridge`, `Hospital`, `Shelter`, `ServiceStatus`) with
//!   occupancy percentages
//! - `MetricPoint` time-series samples and their grouping per tag
//! - `simulate` - one escalation step of the incident
//! - `backfill` - synthetic history at fixed hour marks
//!
//! Nothing here touches storage. Callers pass record values in and persist
//! whatever comes back out.
//!
//! ## Validation
//!
//! Formulas compute with whatever they are given. Range and sign checks live
//! in a separate layer (`Validate`) that the boundary may choose to apply.

mod backfill;
mod error;
mod incident;
mod metric;
mod resource;
pub mod scenario;
mod simulation;
pub mod time;
mod validate;

pub use backfill::{backfill, hospital_operational_pct_at, TimelineMark, DEFAULT_TIMELINE};
pub use error::{Error, Result};
pub use incident::{select_current, IncidentSummary, SummaryValues, SummaryView};
pub use metric::{group_series, MetricPoint, MetricTag, SeriesPoint, SeriesMap};
pub use resource::{
    occupancy_pct, Bridge, BridgeStatus, Hospital, HospitalView, ServiceStatus, Shelter,
    ShelterView,
};
pub use scenario::Scenario;
pub use simulation::{simulate, SimulationOutcome, HOSPITAL_OPERATIONAL_FLOOR};
pub use validate::{Validate, ValidationIssue};
