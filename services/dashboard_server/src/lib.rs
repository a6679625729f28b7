//! HTTP JSON surface for the earthquake dashboard
//!
//! - `GET /api/summary/`: current incident figures with every resource
//! - `GET /api/metrics/`: incident series keyed by tag
//! - `POST /api/simulate/`: advance the incident by one step

pub mod config;
pub mod handlers;
pub mod logging;
pub mod response;
pub mod router;
pub mod seeding;

pub use config::{Config, ConfigError, Coords};
pub use handlers::{dispatch, AppState, SummaryPayload};
pub use router::{route, Route};
pub use seeding::{seed_checked, SeedError};
