//! Read-only views over the entry collection.
//!
//! Nothing here mutates stored records. Months with no entry are zero-filled rather than
//! omitted, so a series always has twelve points.

use crate::benchmark::{BenchmarkDefinition, BenchmarkStatus};
use crate::module::{Population, SurveillanceModule};
use crate::rate::average_rate;
use crate::records::SurveillanceEntry;
use crate::{Month, NonEmptyText, Year};
use chrono::Datelike;

/// Which entries a report covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportFilter {
    pub module: SurveillanceModule,
    /// Ignored for modules that do not track population.
    pub population: Option<Population>,
    pub year: Year,
}

impl ReportFilter {
    pub fn matches(&self, entry: &SurveillanceEntry) -> bool {
        entry.module() == self.module
            && entry.year() == self.year
            && (!self.module.tracks_population() || entry.population() == self.population)
    }
}

/// One month of a yearly series.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthPoint {
    pub month: Month,
    pub rate: f64,
}

/// Entries matching `filter`, in collection order.
pub fn filter_entries<'a>(
    entries: &'a [SurveillanceEntry],
    filter: &ReportFilter,
) -> Vec<&'a SurveillanceEntry> {
    entries.iter().filter(|e| filter.matches(e)).collect()
}

/// Twelve points, January to December. A month's rate is that of the first matching entry, or 0.
pub fn monthly_series(entries: &[SurveillanceEntry], filter: &ReportFilter) -> [MonthPoint; 12] {
    let matching = filter_entries(entries, filter);
    Month::ALL.map(|month| MonthPoint {
        month,
        rate: matching
            .iter()
            .find(|e| e.month() == month)
            .map_or(0.0, |e| e.rate()),
    })
}

/// Benchmark annotation on a module report.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkSummary {
    pub rate: f64,
    pub source: NonEmptyText,
    /// The report's average rate compared with `rate`.
    pub status: BenchmarkStatus,
}

/// Yearly report for one module (and population).
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleReport {
    pub filter: ReportFilter,
    pub entries: Vec<SurveillanceEntry>,
    pub series: [MonthPoint; 12],
    pub average_rate: f64,
    pub benchmark: Option<BenchmarkSummary>,
}

impl ModuleReport {
    pub fn build(
        entries: &[SurveillanceEntry],
        filter: ReportFilter,
        benchmark: Option<&BenchmarkDefinition>,
    ) -> Self {
        let matching = filter_entries(entries, &filter);
        let average = average_rate(matching.iter().copied());
        let series = monthly_series(entries, &filter);

        Self {
            filter,
            entries: matching.into_iter().cloned().collect(),
            series,
            average_rate: average,
            benchmark: benchmark.map(|b| BenchmarkSummary {
                rate: b.rate,
                source: b.source.clone(),
                status: BenchmarkStatus::compare(average, b.rate),
            }),
        }
    }
}

/// Dashboard tile for one module.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashboardTile {
    pub module: SurveillanceModule,
    pub entry_count: usize,
    pub average_rate: f64,
}

/// One tile per module, in module order, averaging entries for the given month and year.
pub fn dashboard(entries: &[SurveillanceEntry], year: Year, month: Month) -> Vec<DashboardTile> {
    SurveillanceModule::ALL
        .into_iter()
        .map(|module| {
            let matching: Vec<&SurveillanceEntry> = entries
                .iter()
                .filter(|e| e.module() == module && e.year() == year && e.month() == month)
                .collect();

            DashboardTile {
                module,
                entry_count: matching.len(),
                average_rate: average_rate(matching.iter().copied()),
            }
        })
        .collect()
}

/// The current local year and month.
pub fn current_year_month() -> (Year, Month) {
    let today = chrono::Local::now().date_naive();
    let year = Year::new(i64::from(today.year())).unwrap_or(Year::MIN);
    let month = Month::new(today.month()).unwrap_or(Month::JANUARY);
    (year, month)
}
