//! Scenario fixtures in RON
//!
//! A scenario is the data set the `seed` command writes: the incident
//! figures, every resource and the timeline used to backfill the series.

use crate::backfill::{TimelineMark, DEFAULT_TIMELINE};
use crate::error::{Error, Result};
use crate::incident::SummaryValues;
use crate::resource::{Bridge, Hospital, ServiceStatus, Shelter};
use crate::validate::{Validate, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const LAS_MALVINAS: &str = include_str!("../scenarios/las_malvinas.ron");

/// Complete seed data set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub summary: SummaryValues,
    #[serde(default)]
    pub bridges: Vec<Bridge>,
    #[serde(default)]
    pub hospitals: Vec<Hospital>,
    #[serde(default)]
    pub shelters: Vec<Shelter>,
    #[serde(default)]
    pub services: Vec<ServiceStatus>,
    #[serde(default = "default_timeline")]
    pub timeline: Vec<TimelineMark>,
}

fn default_timeline() -> Vec<TimelineMark> {
    DEFAULT_TIMELINE.to_vec()
}

impl Scenario {
    /// Parse a scenario from RON text
    pub fn from_ron(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| Error::ScenarioParse(e.to_string()))
    }

    /// Load a scenario from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron(&content)
    }

    /// The bundled Las Malvinas (San Rafael) scenario
    pub fn las_malvinas() -> Result<Self> {
        Self::from_ron(LAS_MALVINAS)
    }

    /// Every issue found in the summary, the resources and the timeline
    pub fn issues(&self) -> Vec<ValidationIssue> {
        let mut issues = self.summary.validate();
        issues.extend(self.bridges.iter().flat_map(Validate::validate));
        issues.extend(self.hospitals.iter().flat_map(Validate::validate));
        issues.extend(self.shelters.iter().flat_map(Validate::validate));
        issues.extend(self.services.iter().flat_map(Validate::validate));
        issues.extend(self.timeline.iter().flat_map(Validate::validate));
        issues
    }
}
