//! Incident summary and its derived view

use crate::time::{self, Timestamp};
use serde::{Deserialize, Serialize};

/// Raw incident figures, everything a summary stores apart from identity
///
/// Defaults are the opening figures of the scenario, used when the boundary
/// has to create a summary on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryValues {
    /// Reference population of the affected area
    pub population: i64,
    /// Lower bound of the affected fraction, in [0, 1]
    pub affected_pct_min: f64,
    /// Upper bound of the affected fraction, in [0, 1]
    pub affected_pct_max: f64,
    pub shelter_needed_min: i64,
    pub shelter_needed_max: i64,
    /// Fraction of hospital capacity still operational, in [0, 1]
    pub hospital_operational_pct: f64,
    pub fatalities: i64,
    pub injured_severe_min: i64,
    pub injured_severe_max: i64,
    pub injured_mild_min: i64,
    pub injured_mild_max: i64,
}

impl Default for SummaryValues {
    fn default() -> Self {
        Self {
            population: 3500,
            affected_pct_min: 0.25,
            affected_pct_max: 0.35,
            shelter_needed_min: 800,
            shelter_needed_max: 900,
            hospital_operational_pct: 0.40,
            fatalities: 80,
            injured_severe_min: 60,
            injured_severe_max: 80,
            injured_mild_min: 800,
            injured_mild_max: 900,
        }
    }
}

impl SummaryValues {
    /// `round(((affected_pct_min + affected_pct_max) / 2) * population)`
    ///
    /// Rounds half away from zero.
    pub fn avg_affected(&self) -> i64 {
        let mean_fraction = (self.affected_pct_min + self.affected_pct_max) / 2.0;
        (mean_fraction * self.population as f64).round() as i64
    }

    /// `floor((injured_severe_min + injured_severe_max) / 2)`
    pub fn avg_injured_severe(&self) -> i64 {
        floor_mean(self.injured_severe_min, self.injured_severe_max)
    }

    /// `floor((injured_mild_min + injured_mild_max) / 2)`
    pub fn avg_injured_mild(&self) -> i64 {
        floor_mean(self.injured_mild_min, self.injured_mild_max)
    }
}

fn floor_mean(min: i64, max: i64) -> i64 {
    (min + max).div_euclid(2)
}

/// One snapshot of the incident
///
/// Summaries are never shared between calls; the store hands out owned
/// values and the caller gives them back to be saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentSummary {
    /// Store-assigned id, `None` until first saved
    pub id: Option<u64>,
    /// Creation instant, immutable once set
    #[serde(with = "time::iso")]
    pub created_at: Timestamp,
    pub values: SummaryValues,
}

impl IncidentSummary {
    /// Create an unsaved summary with the given figures
    pub fn new(created_at: Timestamp, values: SummaryValues) -> Self {
        Self {
            id: None,
            created_at,
            values,
        }
    }

    /// Create an unsaved summary with the default figures
    pub fn baseline(created_at: Timestamp) -> Self {
        Self::new(created_at, SummaryValues::default())
    }

    /// Compute the derived view. Inputs are used as-is, see `Validate`.
    pub fn derive(&self) -> SummaryView {
        let v = &self.values;
        SummaryView {
            id: self.id,
            created_at: self.created_at,
            population: v.population,
            affected: v.avg_affected(),
            affected_pct_min: v.affected_pct_min,
            affected_pct_max: v.affected_pct_max,
            shelter_min: v.shelter_needed_min,
            shelter_max: v.shelter_needed_max,
            hospital_operational_pct: v.hospital_operational_pct,
            fatalities: v.fatalities,
            injured_severe: v.avg_injured_severe(),
            injured_severe_min: v.injured_severe_min,
            injured_severe_max: v.injured_severe_max,
            injured_mild: v.avg_injured_mild(),
            injured_mild_min: v.injured_mild_min,
            injured_mild_max: v.injured_mild_max,
        }
    }
}

/// Summary as served to clients: stored fields plus derived averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub id: Option<u64>,
    #[serde(with = "time::iso")]
    pub created_at: Timestamp,
    pub population: i64,
    /// Mean affected population
    pub affected: i64,
    pub affected_pct_min: f64,
    pub affected_pct_max: f64,
    pub shelter_min: i64,
    pub shelter_max: i64,
    pub hospital_operational_pct: f64,
    pub fatalities: i64,
    /// Mean of the severe-injury range
    pub injured_severe: i64,
    pub injured_severe_min: i64,
    pub injured_severe_max: i64,
    /// Mean of the mild-injury range
    pub injured_mild: i64,
    pub injured_mild_min: i64,
    pub injured_mild_max: i64,
}

/// Pick the summary with the latest `created_at`
///
/// On equal timestamps the later element of the sequence wins. Returns
/// `None` for an empty sequence; creating a default is the caller's call.
pub fn select_current<I>(summaries: I) -> Option<IncidentSummary>
where
    I: IntoIterator<Item = IncidentSummary>,
{
    summaries.into_iter().max_by_key(|s| s.created_at)
}
