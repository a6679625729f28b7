//! One escalation step of the incident
//!
//! Each call compounds the growth factors again: fatalities and injuries
//! only go up and hospital capacity only goes down, until it reaches
//! `HOSPITAL_OPERATIONAL_FLOOR`.

use crate::incident::IncidentSummary;
use crate::metric::{MetricPoint, MetricTag};
use crate::time::Timestamp;

/// Lowest operational hospital fraction a step can produce
pub const HOSPITAL_OPERATIONAL_FLOOR: f64 = 0.05;

/// Operational fraction lost per step
const HOSPITAL_DECAY_PER_STEP: f64 = 0.08;

const FATALITIES_GROWTH: f64 = 1.05;
const SEVERE_MIN_GROWTH: f64 = 1.05;
const SEVERE_MAX_GROWTH: f64 = 1.10;
const MILD_MIN_GROWTH: f64 = 1.02;
const MILD_MAX_GROWTH: f64 = 1.05;

/// Result of a step: the next summary and the samples to append
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// Same id and `created_at` as the input, figures advanced
    pub next: IncidentSummary,
    /// One sample per `MetricTag`, all stamped `now`
    pub samples: Vec<MetricPoint>,
}

fn grow(count: i64, factor: f64) -> i64 {
    (count as f64 * factor).floor() as i64
}

/// Advance `current` by one step
///
/// Counts are multiplied and floored; hospital capacity drops by a fixed
/// amount and is held at the floor. Population, affected range and shelter
/// range are carried over unchanged.
pub fn simulate(current: &IncidentSummary, now: Timestamp) -> SimulationOutcome {
    let mut next = current.clone();
    let prev = &current.values;
    let v = &mut next.values;

    v.fatalities = grow(prev.fatalities, FATALITIES_GROWTH);
    v.injured_severe_min = grow(prev.injured_severe_min, SEVERE_MIN_GROWTH);
    v.injured_severe_max = grow(prev.injured_severe_max, SEVERE_MAX_GROWTH);
    v.injured_mild_min = grow(prev.injured_mild_min, MILD_MIN_GROWTH);
    v.injured_mild_max = grow(prev.injured_mild_max, MILD_MAX_GROWTH);
    v.hospital_operational_pct = (prev.hospital_operational_pct - HOSPITAL_DECAY_PER_STEP)
        .max(HOSPITAL_OPERATIONAL_FLOOR);

    let samples = vec![
        MetricPoint::new(MetricTag::Fatalities, now, v.fatalities as f64),
        MetricPoint::new(MetricTag::InjuredSevere, now, v.avg_injured_severe() as f64),
        MetricPoint::new(MetricTag::InjuredMild, now, v.avg_injured_mild() as f64),
        MetricPoint::new(
            MetricTag::HospitalOperationalPct,
            now,
            v.hospital_operational_pct * 100.0,
        ),
    ];

    SimulationOutcome { next, samples }
}
