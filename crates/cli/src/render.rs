//! Plain-text rendering for terminal output and the exported dialysis report.

use chrono::NaiveDate;
use falcon_core::benchmark::BenchmarkDefinition;
use falcon_core::dialysis::{DialysisReportSession, NamedCount, ReportPeriod};
use falcon_core::rate::format_rate;
use falcon_core::records::SurveillanceEntry;
use falcon_core::report::{DashboardTile, ModuleReport};
use falcon_core::{Month, Population, Year};
use std::fmt::Write;

fn population_label(population: Option<Population>) -> &'static str {
    population.map_or("-", Population::label)
}

pub fn entries(entries: &[SurveillanceEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<32}  {:<6}  {:<6}  {:<9}  {:>4}  {:>9}  {:>11}  {:>8}",
        "ID", "Module", "Pop.", "Month", "Year", "Numerator", "Denominator", "Rate"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<32}  {:<6}  {:<6}  {:<9}  {:>4}  {:>9}  {:>11}  {:>8}",
            entry.id(),
            entry.module().code(),
            population_label(entry.population()),
            entry.month().name(),
            entry.year(),
            entry.numerator(),
            entry.denominator(),
            format_rate(entry.rate())
        );
    }
    out
}

pub fn benchmarks(benchmarks: &[BenchmarkDefinition]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<6}  {:<6}  {:>8}  {:>4}  Source",
        "#", "Module", "Pop.", "Rate", "Year"
    );
    for (index, benchmark) in benchmarks.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<6}  {:<6}  {:>8}  {:>4}  {}",
            index,
            benchmark.module.code(),
            population_label(benchmark.population),
            format_rate(benchmark.rate),
            benchmark.year,
            benchmark.source
        );
    }
    out
}

pub fn dashboard(tiles: &[DashboardTile], year: Year, month: Month) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard for {} {}", month, year);
    for tile in tiles {
        let _ = writeln!(
            out,
            "  {:<6}  {:>8}  ({} {})  {}",
            tile.module.code(),
            format_rate(tile.average_rate),
            tile.entry_count,
            if tile.entry_count == 1 { "entry" } else { "entries" },
            tile.module.label()
        );
    }
    out
}

pub fn module_report(report: &ModuleReport) -> String {
    let filter = &report.filter;
    let mut out = String::new();

    let _ = write!(out, "{} ({})", filter.module.label(), filter.module.code());
    if filter.module.tracks_population() {
        let _ = write!(out, " - {}", population_label(filter.population));
    }
    let _ = writeln!(out, " - {}", filter.year);

    for point in &report.series {
        let _ = writeln!(out, "  {:<9}  {:>8}", point.month.name(), format_rate(point.rate));
    }

    let _ = writeln!(
        out,
        "Average rate: {} ({} {})",
        format_rate(report.average_rate),
        report.entries.len(),
        if report.entries.len() == 1 { "entry" } else { "entries" }
    );
    match &report.benchmark {
        Some(summary) => {
            let _ = writeln!(
                out,
                "Benchmark: {} ({}) - {}",
                format_rate(summary.rate),
                summary.source,
                summary.status.description()
            );
        }
        None => {
            let _ = writeln!(out, "Benchmark: none configured");
        }
    }
    out
}

fn counts(out: &mut String, heading: &str, items: &[NamedCount]) {
    let _ = writeln!(out, "{}", heading);
    for item in items {
        let _ = writeln!(out, "  {:<10} {:>5}", item.name, item.value);
    }
}

pub fn dialysis_report(
    session: &DialysisReportSession,
    period: &ReportPeriod,
    generated_on: NaiveDate,
) -> String {
    let thresholds = session.benchmarks();
    let mut out = String::new();

    let _ = writeln!(out, "Monthly Dialysis Event Report");
    let _ = writeln!(out, "Period: {} {}", period.month, period.year);
    let _ = writeln!(out, "Generated: {}", generated_on.format("%Y-%m-%d"));
    let _ = writeln!(out);

    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  Total patients:     {}", session.total_access());
    let _ = writeln!(out, "  Total events:       {}", session.total_events());
    let _ = writeln!(out, "  Event rate:         {}%", format_rate(session.event_rate()));
    let _ = writeln!(out, "  Internal benchmark: {}%", format_rate(thresholds.internal));
    match thresholds.external {
        Some(external) => {
            let _ = writeln!(out, "  External benchmark: {}%", format_rate(external));
        }
        None => {
            let _ = writeln!(out, "  External benchmark: not set");
        }
    }
    let _ = writeln!(out, "  Status:             {}", session.status().description());
    let _ = writeln!(out);

    counts(&mut out, "Access types", &session.access_breakdown());
    let _ = writeln!(out);
    counts(&mut out, "Events", &session.event_breakdown());
    if session.events().no_events {
        let _ = writeln!(out, "  (month reported as event-free)");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Recommendations");
    for line in session.recommendations() {
        let _ = writeln!(out, "  - {}", line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use falcon_core::dialysis::{AccessUpdate, BenchmarkUpdate, EventUpdate};
    use falcon_core::records::NewEntry;
    use falcon_core::report::ReportFilter;
    use falcon_core::{NonEmptyText, SurveillanceModule};

    fn session(puss: u32, external: f64) -> DialysisReportSession {
        DialysisReportSession::new()
            .with_access(AccessUpdate {
                cvc: Some(10),
                avf: Some(5),
                avg: Some(5),
            })
            .with_events(EventUpdate {
                puss: Some(puss),
                ..Default::default()
            })
            .with_benchmarks(BenchmarkUpdate {
                internal: Some(10.0),
                external: Some(external),
            })
    }

    fn march_2024() -> ReportPeriod {
        ReportPeriod {
            month: Month::new(3).unwrap(),
            year: Year::new(2024).unwrap(),
        }
    }

    #[test]
    fn test_dialysis_report_above_benchmark() {
        let generated = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let text = dialysis_report(&session(3, 5.0), &march_2024(), generated);

        assert!(text.contains("Period: March 2024"));
        assert!(text.contains("Generated: 2024-04-02"));
        assert!(text.contains("Event rate:         15.00%"));
        assert!(text.contains("External benchmark: 5.00%"));
        assert!(text.contains("Above internal benchmark"));
        assert!(text.contains("Review and update antimicrobial stewardship protocols"));
        assert!(text.contains("  CVC           10"));
    }

    #[test]
    fn test_dialysis_report_without_events() {
        let generated = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let text = dialysis_report(&session(0, 0.0), &march_2024(), generated);

        assert!(text.contains("Event rate:         0.00%"));
        assert!(text.contains("External benchmark: not set"));
        assert!(text.contains("No events to compare"));
        assert!(text.contains("Continue current infection control practices and monitoring"));
    }

    #[test]
    fn test_module_report_lists_twelve_months() {
        let entries = vec![SurveillanceEntry::new(NewEntry {
            module: SurveillanceModule::Ssi,
            population: None,
            month: Month::new(2).unwrap(),
            year: Year::new(2024).unwrap(),
            numerator: 2,
            denominator: 50,
            benchmark: None,
        })
        .unwrap()];
        let filter = ReportFilter {
            module: SurveillanceModule::Ssi,
            population: None,
            year: Year::new(2024).unwrap(),
        };
        let benchmark = BenchmarkDefinition::new(
            SurveillanceModule::Ssi,
            None,
            5.0,
            NonEmptyText::new("CDC/NHSN").unwrap(),
            Year::new(2024).unwrap(),
        )
        .unwrap();

        let report = ModuleReport::build(&entries, filter, Some(&benchmark));
        let text = module_report(&report);

        assert!(text.starts_with("Surgical Site Infection (SSI) - 2024"));
        assert_eq!(text.lines().filter(|l| l.starts_with("  ")).count(), 12);
        assert!(text.contains("  February       4.00"));
        assert!(text.contains("Average rate: 4.00 (1 entry)"));
        assert!(text.contains("Benchmark: 5.00 (CDC/NHSN) - Below internal benchmark"));
    }

    #[test]
    fn test_entries_table_shows_dash_for_missing_population() {
        let entry = SurveillanceEntry::new(NewEntry {
            module: SurveillanceModule::De,
            population: Some(Population::Adults),
            month: Month::new(1).unwrap(),
            year: Year::new(2024).unwrap(),
            numerator: 1,
            denominator: 10,
            benchmark: None,
        })
        .unwrap();

        let text = entries(std::slice::from_ref(&entry));
        let row = text.lines().nth(1).unwrap();

        assert!(row.starts_with(&entry.id().to_string()));
        assert!(row.contains("DE      -"));
        assert!(row.ends_with("10.00"));
    }
}
