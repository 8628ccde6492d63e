//! Benchmark thresholds and comparison.
//!
//! [`BenchmarkStatus::compare`] classifies a computed rate against a threshold. An exact-zero
//! rate is its own category, separate from "at or below".
//!
//! [`BenchmarkStore`] owns the configured benchmark definitions. Definitions have no identity of
//! their own and are deleted by list position.

use crate::constants::BENCHMARKS_KEY;
use crate::kv::{self, KeyValueStore};
use crate::module::{Population, SurveillanceModule};
use crate::{FalconError, FalconResult, NonEmptyText, Year};
use serde::{Deserialize, Serialize};

/// Qualitative result of comparing a rate with a benchmark threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkStatus {
    /// The rate is exactly zero.
    NoEventsToCompare,
    /// `0 < rate <= threshold`.
    AtOrBelowBenchmark,
    /// `rate > threshold`.
    AboveBenchmark,
}

impl BenchmarkStatus {
    pub fn compare(rate: f64, threshold: f64) -> Self {
        if rate == 0.0 {
            BenchmarkStatus::NoEventsToCompare
        } else if rate <= threshold {
            BenchmarkStatus::AtOrBelowBenchmark
        } else {
            BenchmarkStatus::AboveBenchmark
        }
    }

    /// Report wording for the status.
    pub fn description(self) -> &'static str {
        match self {
            BenchmarkStatus::NoEventsToCompare => "No events to compare",
            BenchmarkStatus::AtOrBelowBenchmark => "Below internal benchmark",
            BenchmarkStatus::AboveBenchmark => "Above internal benchmark",
        }
    }
}

/// A reference rate for one module (and population) in one year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDefinition {
    pub module: SurveillanceModule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<Population>,
    pub rate: f64,
    pub source: NonEmptyText,
    pub year: Year,
}

impl BenchmarkDefinition {
    /// Builds a definition from settings input.
    ///
    /// # Errors
    ///
    /// Returns `FalconError::InvalidInput` if `rate` is zero or not a finite number.
    pub fn new(
        module: SurveillanceModule,
        population: Option<Population>,
        rate: f64,
        source: NonEmptyText,
        year: Year,
    ) -> FalconResult<Self> {
        if rate == 0.0 || !rate.is_finite() {
            return Err(FalconError::InvalidInput(
                "benchmark rate must be a non-zero number".into(),
            ));
        }

        Ok(Self {
            module,
            population: module.applicable_population(population),
            rate,
            source,
            year,
        })
    }

    /// Whether this benchmark applies to the given module, population and year.
    ///
    /// Population is only compared for modules that track it.
    pub fn applies_to(
        &self,
        module: SurveillanceModule,
        population: Option<Population>,
        year: Year,
    ) -> bool {
        self.module == module
            && self.year == year
            && (!module.tracks_population() || self.population == population)
    }
}

/// Owner of the benchmark definition list.
#[derive(Debug)]
pub struct BenchmarkStore<S> {
    store: S,
    benchmarks: Vec<BenchmarkDefinition>,
}

impl<S: KeyValueStore> BenchmarkStore<S> {
    pub fn load(mut store: S) -> Self {
        let benchmarks: Vec<BenchmarkDefinition> =
            kv::load_or_default(&store, BENCHMARKS_KEY, Vec::new());
        kv::mark_loaded(&mut store);

        Self { store, benchmarks }
    }

    pub fn benchmarks(&self) -> &[BenchmarkDefinition] {
        &self.benchmarks
    }

    pub fn add(&mut self, benchmark: BenchmarkDefinition) {
        tracing::info!(
            "adding {} benchmark {} ({}) for {}",
            benchmark.module,
            benchmark.rate,
            benchmark.source,
            benchmark.year
        );
        self.benchmarks.push(benchmark);
        self.persist();
    }

    /// Removes the definition at `index`. An out-of-range index changes nothing.
    ///
    /// Positions shift after a deletion, so an index is only meaningful against the list the
    /// caller last read.
    pub fn delete(&mut self, index: usize) -> Option<BenchmarkDefinition> {
        if index >= self.benchmarks.len() {
            tracing::warn!(
                "benchmark index {} out of range ({} defined)",
                index,
                self.benchmarks.len()
            );
            return None;
        }

        let removed = self.benchmarks.remove(index);
        self.persist();
        Some(removed)
    }

    /// The most recently added benchmark that applies to the given module, population and year.
    pub fn find(
        &self,
        module: SurveillanceModule,
        population: Option<Population>,
        year: Year,
    ) -> Option<&BenchmarkDefinition> {
        self.benchmarks
            .iter()
            .rev()
            .find(|b| b.applies_to(module, population, year))
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        kv::save(&mut self.store, BENCHMARKS_KEY, &self.benchmarks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn year(y: i64) -> Year {
        Year::new(y).unwrap()
    }

    fn nhsn() -> NonEmptyText {
        NonEmptyText::new("CDC/NHSN").unwrap()
    }

    fn vae_adults(rate: f64, y: i64) -> BenchmarkDefinition {
        BenchmarkDefinition::new(
            SurveillanceModule::Vae,
            Some(Population::Adults),
            rate,
            nhsn(),
            year(y),
        )
        .unwrap()
    }

    #[test]
    fn test_compare_zero_rate_is_its_own_category() {
        assert_eq!(
            BenchmarkStatus::compare(0.0, 5.0),
            BenchmarkStatus::NoEventsToCompare
        );
        assert_eq!(
            BenchmarkStatus::compare(0.0, 0.0),
            BenchmarkStatus::NoEventsToCompare
        );
    }

    #[test]
    fn test_compare_tie_is_at_or_below() {
        assert_eq!(
            BenchmarkStatus::compare(5.0, 5.0),
            BenchmarkStatus::AtOrBelowBenchmark
        );
    }

    #[test]
    fn test_compare_above() {
        assert_eq!(
            BenchmarkStatus::compare(5.01, 5.0),
            BenchmarkStatus::AboveBenchmark
        );
    }

    #[test]
    fn test_definition_rejects_zero_rate() {
        let err = BenchmarkDefinition::new(SurveillanceModule::Ssi, None, 0.0, nhsn(), year(2024))
            .expect_err("should reject zero");
        assert!(matches!(err, FalconError::InvalidInput(msg) if msg.contains("non-zero")));
    }

    #[test]
    fn test_delete_by_position() {
        let mut store = BenchmarkStore::load(MemoryStore::new());
        store.add(vae_adults(1.0, 2023));
        store.add(vae_adults(2.0, 2024));
        store.add(vae_adults(3.0, 2025));

        let removed = store.delete(1).expect("index 1 exists");

        assert_eq!(removed.rate, 2.0);
        let rates: Vec<f64> = store.benchmarks().iter().map(|b| b.rate).collect();
        assert_eq!(rates, vec![1.0, 3.0]);
        assert!(store.delete(5).is_none());
    }

    #[test]
    fn test_find_matches_population_only_when_tracked() {
        let mut store = BenchmarkStore::load(MemoryStore::new());
        store.add(vae_adults(1.5, 2024));
        store.add(
            BenchmarkDefinition::new(SurveillanceModule::Ssi, None, 2.0, nhsn(), year(2024))
                .unwrap(),
        );

        assert!(store
            .find(SurveillanceModule::Vae, Some(Population::Nicu), year(2024))
            .is_none());
        assert_eq!(
            store
                .find(SurveillanceModule::Vae, Some(Population::Adults), year(2024))
                .map(|b| b.rate),
            Some(1.5)
        );
        assert_eq!(
            store
                .find(SurveillanceModule::Ssi, Some(Population::Nicu), year(2024))
                .map(|b| b.rate),
            Some(2.0)
        );
    }

    #[test]
    fn test_find_prefers_latest_definition() {
        let mut store = BenchmarkStore::load(MemoryStore::new());
        store.add(vae_adults(1.5, 2024));
        store.add(vae_adults(1.2, 2024));

        let found = store
            .find(SurveillanceModule::Vae, Some(Population::Adults), year(2024))
            .unwrap();
        assert_eq!(found.rate, 1.2);
    }

    #[test]
    fn test_benchmarks_survive_reload() {
        let mut store = BenchmarkStore::load(MemoryStore::new());
        store.add(vae_adults(1.5, 2024));

        let reloaded = BenchmarkStore::load(store.into_inner());
        assert_eq!(reloaded.benchmarks(), &[vae_adults(1.5, 2024)]);
    }
}
