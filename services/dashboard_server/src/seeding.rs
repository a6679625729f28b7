//! Scenario seeding with validation

use sismo_core::time::Timestamp;
use sismo_core::Scenario;
use sismo_db::{SeedReport, Store};
use thiserror::Error;
use tracing::{info, warn};

/// Seeding error
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Scenario(#[from] sismo_core::Error),
    #[error(transparent)]
    Store(#[from] sismo_db::Error),
}

/// Validate `scenario`, then write it.
///
/// Every issue is logged. With `strict` set, any issue refuses the write
/// and nothing reaches the store.
pub fn seed_checked(
    store: &Store,
    scenario: &Scenario,
    strict: bool,
    now: Timestamp,
) -> Result<SeedReport, SeedError> {
    let issues = scenario.issues();
    for issue in &issues {
        warn!(%issue, "scenario validation issue");
    }
    if strict && !issues.is_empty() {
        return Err(sismo_core::Error::Validation(issues.len()).into());
    }

    let report = store.seed_scenario(scenario, now)?;
    info!(
        summary = report.summary_id,
        bridges = report.bridges,
        hospitals = report.hospitals,
        shelters = report.shelters,
        services = report.services,
        points = report.metric_points,
        "scenario seeded"
    );
    Ok(report)
}
