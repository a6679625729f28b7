//! Synthetic history for the four incident series
//!
//! Produces samples at fixed hour marks inside the 72 hours that end at
//! `now`. The store replaces each series wholesale with the result.

use crate::incident::SummaryValues;
use crate::metric::{MetricPoint, MetricTag};
use crate::time::Timestamp;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Length of the backfilled window
pub const WINDOW_HOURS: i64 = 72;

/// A point of the timeline: hours since the event and the share of the
/// projected fatalities reached by then
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineMark {
    pub hours: u32,
    pub fraction: f64,
}

impl TimelineMark {
    pub const fn new(hours: u32, fraction: f64) -> Self {
        Self { hours, fraction }
    }
}

/// Timeline of the shipped scenario
pub const DEFAULT_TIMELINE: [TimelineMark; 5] = [
    TimelineMark::new(0, 0.60),
    TimelineMark::new(12, 0.70),
    TimelineMark::new(24, 0.85),
    TimelineMark::new(48, 0.95),
    TimelineMark::new(72, 1.00),
];

/// Operational hospital percentage observed at an hour mark
///
/// Only the five marks of the default timeline are known.
pub fn hospital_operational_pct_at(hours: u32) -> Option<f64> {
    match hours {
        0 => Some(40.0),
        12 => Some(36.0),
        24 => Some(30.0),
        48 => Some(20.0),
        72 => Some(15.0),
        _ => None,
    }
}

/// Build backfill samples for every mark of `timeline`
///
/// Per mark, in `MetricTag::ALL` order:
/// - fatalities: `round(fatalities * fraction)`
/// - injured_severe: `round(avg_severe * (1 + 0.10 * hours / 24))`
/// - injured_mild: `round(avg_mild * (1 + 0.06 * hours / 24))`
/// - hospital_operational_pct: `hospital_operational_pct_at(hours)`, skipped
///   for marks outside the table
///
/// Rounding is half away from zero. Marks whose timestamp cannot be
/// represented produce no samples.
pub fn backfill(
    values: &SummaryValues,
    timeline: &[TimelineMark],
    now: Timestamp,
) -> Vec<MetricPoint> {
    let base_fatalities = values.fatalities as f64;
    let base_severe = values.avg_injured_severe() as f64;
    let base_mild = values.avg_injured_mild() as f64;

    let mut points = Vec::with_capacity(timeline.len() * MetricTag::ALL.len());
    for mark in timeline {
        // Marks too far from `now` to be a timestamp are dropped.
        let Some(ts) = Duration::try_hours(WINDOW_HOURS - i64::from(mark.hours))
            .and_then(|back| now.checked_sub_signed(back))
        else {
            continue;
        };
        let days = f64::from(mark.hours) / 24.0;
        let note = format!("{}h since event", mark.hours);

        points.push(
            MetricPoint::new(
                MetricTag::Fatalities,
                ts,
                (base_fatalities * mark.fraction).round(),
            )
            .with_note(note.clone()),
        );
        points.push(
            MetricPoint::new(
                MetricTag::InjuredSevere,
                ts,
                (base_severe * (1.0 + 0.10 * days)).round(),
            )
            .with_note(note.clone()),
        );
        points.push(
            MetricPoint::new(
                MetricTag::InjuredMild,
                ts,
                (base_mild * (1.0 + 0.06 * days)).round(),
            )
            .with_note(note.clone()),
        );
        if let Some(pct) = hospital_operational_pct_at(mark.hours) {
            points.push(
                MetricPoint::new(MetricTag::HospitalOperationalPct, ts, pct).with_note(note),
            );
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 4, 0, 0, 0).unwrap()
    }

    fn values_of(points: &[MetricPoint], tag: MetricTag) -> Vec<f64> {
        points.iter().filter(|p| p.is(tag)).map(|p| p.value).collect()
    }

    #[test]
    fn test_hospital_lookup() {
        assert_eq!(hospital_operational_pct_at(24), Some(30.0));
        assert_eq!(hospital_operational_pct_at(72), Some(15.0));
        assert_eq!(hospital_operational_pct_at(36), None);
    }

    #[test]
    fn test_hospital_pct_independent_of_summary() {
        let values = SummaryValues {
            hospital_operational_pct: 0.9,
            fatalities: 1,
            ..SummaryValues::default()
        };
        let points = backfill(&values, &[TimelineMark::new(24, 0.5)], now());
        assert_eq!(values_of(&points, MetricTag::HospitalOperationalPct), vec![30.0]);
    }

    #[test]
    fn test_default_timeline_series() {
        let points = backfill(&SummaryValues::default(), &DEFAULT_TIMELINE, now());
        assert_eq!(points.len(), 20);

        assert_eq!(
            values_of(&points, MetricTag::Fatalities),
            vec![48.0, 56.0, 68.0, 76.0, 80.0]
        );
        assert_eq!(
            values_of(&points, MetricTag::InjuredSevere),
            vec![70.0, 74.0, 77.0, 84.0, 91.0]
        );
        assert_eq!(
            values_of(&points, MetricTag::InjuredMild),
            vec![850.0, 876.0, 901.0, 952.0, 1003.0]
        );
        assert_eq!(
            values_of(&points, MetricTag::HospitalOperationalPct),
            vec![40.0, 36.0, 30.0, 20.0, 15.0]
        );
    }

    #[test]
    fn test_timestamps_backdated_into_window() {
        let points = backfill(&SummaryValues::default(), &DEFAULT_TIMELINE, now());
        let first = points.first().unwrap();
        let last = points.last().unwrap();

        assert_eq!(first.timestamp, now() - Duration::hours(72));
        assert_eq!(last.timestamp, now());
        assert_eq!(first.note, "0h since event");
    }

    #[test]
    fn test_unknown_mark_skips_hospital_sample() {
        let points = backfill(&SummaryValues::default(), &[TimelineMark::new(6, 0.65)], now());
        assert_eq!(points.len(), 3);
        assert!(values_of(&points, MetricTag::HospitalOperationalPct).is_empty());
    }

    #[test]
    fn test_unrepresentable_mark_is_skipped() {
        let timeline = [TimelineMark::new(u32::MAX, 1.0), TimelineMark::new(72, 1.0)];
        let points = backfill(&SummaryValues::default(), &timeline, now());

        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.timestamp == now()));
    }
}
