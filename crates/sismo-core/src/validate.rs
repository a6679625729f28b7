//! Optional input checks
//!
//! Nothing in the formulas calls this. The boundary decides whether a record
//! with issues is logged, rejected or stored as-is.

use crate::backfill::{TimelineMark, WINDOW_HOURS};
use crate::incident::{IncidentSummary, SummaryValues};
use crate::resource::{Bridge, Hospital, ServiceStatus, Shelter};
use std::fmt;

/// A single problem found in a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Record the issue belongs to (a resource name or "summary")
    pub record: String,
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(record: &str, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            record: record.to_string(),
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.record, self.field, self.message)
    }
}

/// Records that can report their own inconsistencies
pub trait Validate {
    fn validate(&self) -> Vec<ValidationIssue>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

struct Checker<'a> {
    record: &'a str,
    issues: Vec<ValidationIssue>,
}

impl<'a> Checker<'a> {
    fn new(record: &'a str) -> Self {
        Self {
            record,
            issues: Vec::new(),
        }
    }

    fn non_negative(&mut self, field: &'static str, value: i64) {
        if value < 0 {
            self.issues
                .push(ValidationIssue::new(self.record, field, format!("negative value {}", value)));
        }
    }

    fn fraction(&mut self, field: &'static str, value: f64) {
        if !(0.0..=1.0).contains(&value) {
            self.issues.push(ValidationIssue::new(
                self.record,
                field,
                format!("{} is outside [0, 1]", value),
            ));
        }
    }

    fn ordered<T: PartialOrd + fmt::Display>(&mut self, field: &'static str, min: T, max: T) {
        if min > max {
            self.issues.push(ValidationIssue::new(
                self.record,
                field,
                format!("min {} exceeds max {}", min, max),
            ));
        }
    }

    fn at_most(&mut self, field: &'static str, value: i64, limit: i64) {
        if value > limit {
            self.issues.push(ValidationIssue::new(
                self.record,
                field,
                format!("{} exceeds {}", value, limit),
            ));
        }
    }

    fn named(&mut self, name: &str) {
        if name.trim().is_empty() {
            self.issues
                .push(ValidationIssue::new(self.record, "name", "empty name"));
        }
    }

    fn finish(self) -> Vec<ValidationIssue> {
        self.issues
    }
}

impl Validate for SummaryValues {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut c = Checker::new("summary");
        c.non_negative("population", self.population);
        c.fraction("affected_pct_min", self.affected_pct_min);
        c.fraction("affected_pct_max", self.affected_pct_max);
        c.ordered("affected_pct", self.affected_pct_min, self.affected_pct_max);
        c.non_negative("shelter_needed_min", self.shelter_needed_min);
        c.ordered("shelter_needed", self.shelter_needed_min, self.shelter_needed_max);
        c.fraction("hospital_operational_pct", self.hospital_operational_pct);
        c.non_negative("fatalities", self.fatalities);
        c.non_negative("injured_severe_min", self.injured_severe_min);
        c.ordered("injured_severe", self.injured_severe_min, self.injured_severe_max);
        c.non_negative("injured_mild_min", self.injured_mild_min);
        c.ordered("injured_mild", self.injured_mild_min, self.injured_mild_max);
        c.finish()
    }
}

impl Validate for IncidentSummary {
    fn validate(&self) -> Vec<ValidationIssue> {
        self.values.validate()
    }
}

impl Validate for Bridge {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut c = Checker::new(&self.name);
        c.named(&self.name);
        c.finish()
    }
}

impl Validate for Hospital {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut c = Checker::new(&self.name);
        c.named(&self.name);
        c.non_negative("total_beds", self.total_beds);
        c.non_negative("available_beds", self.available_beds);
        c.at_most("available_beds", self.available_beds, self.total_beds);
        c.finish()
    }
}

impl Validate for Shelter {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut c = Checker::new(&self.name);
        c.named(&self.name);
        c.non_negative("capacity", self.capacity);
        c.non_negative("occupants", self.occupants);
        c.at_most("occupants", self.occupants, self.capacity);
        c.finish()
    }
}

impl Validate for TimelineMark {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut c = Checker::new("timeline");
        c.at_most("hours", i64::from(self.hours), WINDOW_HOURS);
        c.fraction("fraction", self.fraction);
        c.finish()
    }
}

impl Validate for ServiceStatus {
    fn validate(&self) -> Vec<ValidationIssue> {
        let mut c = Checker::new(&self.name);
        c.named(&self.name);
        c.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_summary_is_valid() {
        assert!(SummaryValues::default().is_valid());
    }

    #[test]
    fn test_summary_range_issues() {
        let values = SummaryValues {
            injured_mild_min: 950,
            injured_mild_max: 900,
            affected_pct_max: 1.4,
            fatalities: -1,
            ..SummaryValues::default()
        };
        let issues = values.validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();

        assert_eq!(issues.len(), 3);
        assert!(fields.contains(&"injured_mild"));
        assert!(fields.contains(&"affected_pct_max"));
        assert!(fields.contains(&"fatalities"));
    }

    #[test]
    fn test_hospital_available_above_total() {
        let hospital = Hospital {
            id: None,
            name: "Hospital Local Las Malvinas".to_string(),
            lat: -35.022,
            lng: -69.3235,
            total_beds: 30,
            available_beds: 31,
            operational: false,
        };
        let issues = hospital.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].to_string(),
            "Hospital Local Las Malvinas.available_beds: 31 exceeds 30"
        );
    }

    #[test]
    fn test_shelter_negative_capacity() {
        let shelter = Shelter {
            id: None,
            name: "Escuela".to_string(),
            lat: 0.0,
            lng: 0.0,
            capacity: -5,
            occupants: 0,
        };
        let issues = shelter.validate();
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_timeline_mark_outside_window() {
        assert!(TimelineMark::new(72, 1.0).is_valid());

        let issues = TimelineMark::new(96, 1.2).validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["hours", "fraction"]);
        assert_eq!(issues[0].to_string(), "timeline.hours: 96 exceeds 72");
    }
}
