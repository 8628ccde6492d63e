//! Monthly dialysis event report.
//!
//! A [`DialysisReportSession`] is an owned value that lives for one data-entry -> report pass. It
//! is updated through three typed setters, each consuming the session and returning the new
//! one. Only the report period is persisted, under two plain keys.

use crate::benchmark::BenchmarkStatus;
use crate::constants::{REPORT_MONTH_KEY, REPORT_YEAR_KEY};
use crate::kv::{self, KeyValueStore};
use crate::rate::percentage;
use crate::report::current_year_month;
use crate::{Month, Year};
use serde::{Deserialize, Serialize};

/// Patient counts by vascular access type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCounts {
    /// Central venous catheter.
    pub cvc: u32,
    /// Arteriovenous fistula.
    pub avf: u32,
    /// Arteriovenous graft.
    pub avg: u32,
}

impl AccessCounts {
    pub fn total(&self) -> u64 {
        u64::from(self.cvc) + u64::from(self.avf) + u64::from(self.avg)
    }
}

/// Event counts for the month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub puss: u32,
    pub redness: u32,
    pub infection: u32,
    pub antimicrobial_start: u32,
    pub positive_blood_culture: u32,
    /// Overrides the counts above: the month is reported as event-free.
    pub no_events: bool,
}

impl EventCounts {
    pub fn total(&self) -> u64 {
        if self.no_events {
            return 0;
        }
        [
            self.puss,
            self.redness,
            self.infection,
            self.antimicrobial_start,
            self.positive_blood_culture,
        ]
        .into_iter()
        .map(u64::from)
        .sum()
    }
}

/// Thresholds the event rate is reported against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkThresholds {
    pub internal: f64,
    pub external: Option<f64>,
}

/// Partial update for [`AccessCounts`]; `None` leaves a field unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessUpdate {
    pub cvc: Option<u32>,
    pub avf: Option<u32>,
    pub avg: Option<u32>,
}

/// Partial update for [`EventCounts`]; `None` leaves a field unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventUpdate {
    pub puss: Option<u32>,
    pub redness: Option<u32>,
    pub infection: Option<u32>,
    pub antimicrobial_start: Option<u32>,
    pub positive_blood_culture: Option<u32>,
    pub no_events: Option<bool>,
}

/// Partial update for [`BenchmarkThresholds`]; `None` leaves a field unchanged.
///
/// An external threshold of zero clears it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BenchmarkUpdate {
    pub internal: Option<f64>,
    pub external: Option<f64>,
}

/// A labelled count for charting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedCount {
    pub name: &'static str,
    pub value: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DialysisReportSession {
    access: AccessCounts,
    events: EventCounts,
    benchmarks: BenchmarkThresholds,
}

impl DialysisReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access(mut self, update: AccessUpdate) -> Self {
        let access = &mut self.access;
        access.cvc = update.cvc.unwrap_or(access.cvc);
        access.avf = update.avf.unwrap_or(access.avf);
        access.avg = update.avg.unwrap_or(access.avg);
        self
    }

    pub fn with_events(mut self, update: EventUpdate) -> Self {
        let events = &mut self.events;
        events.puss = update.puss.unwrap_or(events.puss);
        events.redness = update.redness.unwrap_or(events.redness);
        events.infection = update.infection.unwrap_or(events.infection);
        events.antimicrobial_start = update
            .antimicrobial_start
            .unwrap_or(events.antimicrobial_start);
        events.positive_blood_culture = update
            .positive_blood_culture
            .unwrap_or(events.positive_blood_culture);
        events.no_events = update.no_events.unwrap_or(events.no_events);
        self
    }

    pub fn with_benchmarks(mut self, update: BenchmarkUpdate) -> Self {
        if let Some(internal) = update.internal {
            self.benchmarks.internal = internal;
        }
        if let Some(external) = update.external {
            self.benchmarks.external = (external != 0.0).then_some(external);
        }
        self
    }

    pub fn access(&self) -> &AccessCounts {
        &self.access
    }

    pub fn events(&self) -> &EventCounts {
        &self.events
    }

    pub fn benchmarks(&self) -> &BenchmarkThresholds {
        &self.benchmarks
    }

    pub fn total_access(&self) -> u64 {
        self.access.total()
    }

    pub fn total_events(&self) -> u64 {
        self.events.total()
    }

    /// Events per 100 patients on dialysis access.
    pub fn event_rate(&self) -> f64 {
        percentage(self.total_events(), self.total_access())
    }

    /// The event rate against the internal threshold.
    pub fn status(&self) -> BenchmarkStatus {
        BenchmarkStatus::compare(self.event_rate(), self.benchmarks.internal)
    }

    /// Whether the event rate exceeds the internal threshold.
    pub fn above_internal_benchmark(&self) -> bool {
        self.event_rate() > self.benchmarks.internal
    }

    pub fn access_breakdown(&self) -> [NamedCount; 3] {
        [
            NamedCount {
                name: "CVC",
                value: self.access.cvc,
            },
            NamedCount {
                name: "AVF",
                value: self.access.avf,
            },
            NamedCount {
                name: "AVG",
                value: self.access.avg,
            },
        ]
    }

    /// Individual event counts. These are shown as entered even when `no_events` is set.
    pub fn event_breakdown(&self) -> [NamedCount; 5] {
        [
            NamedCount {
                name: "Puss",
                value: self.events.puss,
            },
            NamedCount {
                name: "Redness",
                value: self.events.redness,
            },
            NamedCount {
                name: "Infection",
                value: self.events.infection,
            },
            NamedCount {
                name: "AS",
                value: self.events.antimicrobial_start,
            },
            NamedCount {
                name: "PBC",
                value: self.events.positive_blood_culture,
            },
        ]
    }

    /// Action plan lines for the report.
    pub fn recommendations(&self) -> &'static [&'static str] {
        const ABOVE: &[&str] = &[
            "Implement additional infection control measures for CVC access",
            "Review and update antimicrobial stewardship protocols",
            "Conduct staff training on proper access care procedures",
        ];
        const AT_OR_BELOW: &[&str] =
            &["Continue current infection control practices and monitoring"];

        if self.above_internal_benchmark() {
            ABOVE
        } else {
            AT_OR_BELOW
        }
    }
}

/// The month a dialysis report covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportPeriod {
    pub month: Month,
    pub year: Year,
}

impl ReportPeriod {
    pub fn current() -> Self {
        let (year, month) = current_year_month();
        Self { month, year }
    }

    /// Stores the period as a month name and a year string.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        kv::save(store, REPORT_MONTH_KEY, self.month.name());
        kv::save(store, REPORT_YEAR_KEY, &self.year.to_string());
    }

    /// Reads a previously saved period. Returns `None` if either half is missing or unreadable.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Option<Self> {
        let month: Option<String> = kv::load_or_default(store, REPORT_MONTH_KEY, None);
        let year: Option<String> = kv::load_or_default(store, REPORT_YEAR_KEY, None);

        let month = month?.parse::<Month>().map_err(|e| {
            tracing::warn!("ignoring stored report month: {}", e);
        });
        let year = year?.parse::<Year>().map_err(|e| {
            tracing::warn!("ignoring stored report year: {}", e);
        });

        Some(Self {
            month: month.ok()?,
            year: year.ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use serde_json::json;

    fn sample_session() -> DialysisReportSession {
        DialysisReportSession::new()
            .with_access(AccessUpdate {
                cvc: Some(10),
                avf: Some(5),
                avg: Some(5),
            })
            .with_events(EventUpdate {
                infection: Some(1),
                antimicrobial_start: Some(1),
                ..EventUpdate::default()
            })
    }

    #[test]
    fn test_event_rate_over_total_access() {
        let session = sample_session();

        assert_eq!(session.total_access(), 20);
        assert_eq!(session.total_events(), 2);
        assert_eq!(crate::rate::format_rate(session.event_rate()), "10.00");
    }

    #[test]
    fn test_totals_do_not_overflow() {
        let session = DialysisReportSession::new()
            .with_access(AccessUpdate {
                cvc: Some(u32::MAX),
                avf: Some(1),
                avg: Some(0),
            })
            .with_events(EventUpdate {
                puss: Some(u32::MAX),
                redness: Some(1),
                ..EventUpdate::default()
            });

        assert_eq!(session.total_access(), u64::from(u32::MAX) + 1);
        assert_eq!(session.total_events(), u64::from(u32::MAX) + 1);
        assert!(session.event_rate().is_finite());
        assert_eq!(session.event_rate(), 100.0);
        assert_eq!(session.status(), BenchmarkStatus::AboveBenchmark);
    }

    #[test]
    fn test_no_events_forces_zero_rate() {
        let session = sample_session().with_events(EventUpdate {
            no_events: Some(true),
            ..EventUpdate::default()
        });

        assert_eq!(session.total_events(), 0);
        assert_eq!(session.event_rate(), 0.0);
        assert_eq!(session.status(), BenchmarkStatus::NoEventsToCompare);
        // individual counts are kept
        assert_eq!(session.events().infection, 1);
    }

    #[test]
    fn test_zero_access_yields_zero_rate() {
        let session = DialysisReportSession::new().with_events(EventUpdate {
            puss: Some(3),
            ..EventUpdate::default()
        });

        assert_eq!(session.event_rate(), 0.0);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let session = sample_session().with_access(AccessUpdate {
            avg: Some(0),
            ..AccessUpdate::default()
        });

        assert_eq!(
            *session.access(),
            AccessCounts {
                cvc: 10,
                avf: 5,
                avg: 0
            }
        );
    }

    #[test]
    fn test_external_benchmark_zero_means_absent() {
        let session = DialysisReportSession::new().with_benchmarks(BenchmarkUpdate {
            internal: Some(5.0),
            external: Some(3.0),
        });
        assert_eq!(session.benchmarks().external, Some(3.0));

        let cleared = session.with_benchmarks(BenchmarkUpdate {
            external: Some(0.0),
            ..BenchmarkUpdate::default()
        });
        assert_eq!(cleared.benchmarks().external, None);
        assert_eq!(cleared.benchmarks().internal, 5.0);
    }

    #[test]
    fn test_status_and_recommendations_follow_internal_benchmark() {
        let above = sample_session().with_benchmarks(BenchmarkUpdate {
            internal: Some(5.0),
            ..BenchmarkUpdate::default()
        });
        assert_eq!(above.status(), BenchmarkStatus::AboveBenchmark);
        assert_eq!(above.recommendations().len(), 3);

        let at = sample_session().with_benchmarks(BenchmarkUpdate {
            internal: Some(10.0),
            ..BenchmarkUpdate::default()
        });
        assert_eq!(at.status(), BenchmarkStatus::AtOrBelowBenchmark);
        assert_eq!(
            at.recommendations(),
            &["Continue current infection control practices and monitoring"]
        );
    }

    #[test]
    fn test_breakdowns_are_labelled() {
        let session = sample_session();

        let access: Vec<(&str, u32)> = session
            .access_breakdown()
            .iter()
            .map(|c| (c.name, c.value))
            .collect();
        assert_eq!(access, vec![("CVC", 10), ("AVF", 5), ("AVG", 5)]);

        let names: Vec<&str> = session.event_breakdown().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Puss", "Redness", "Infection", "AS", "PBC"]);
    }

    #[test]
    fn test_report_period_persists_as_plain_text() {
        let mut store = MemoryStore::new();
        let period = ReportPeriod {
            month: Month::new(3).unwrap(),
            year: Year::new(2025).unwrap(),
        };

        period.save(&mut store);

        assert_eq!(store.get(REPORT_MONTH_KEY).unwrap(), Some(json!("March")));
        assert_eq!(store.get(REPORT_YEAR_KEY).unwrap(), Some(json!("2025")));
        assert_eq!(ReportPeriod::load(&store), Some(period));
    }

    #[test]
    fn test_report_period_missing_or_bad_is_none() {
        let mut store = MemoryStore::new();
        assert_eq!(ReportPeriod::load(&store), None);

        store.set(REPORT_MONTH_KEY, json!("Smarch")).unwrap();
        store.set(REPORT_YEAR_KEY, json!("2025")).unwrap();
        assert_eq!(ReportPeriod::load(&store), None);
    }
}
