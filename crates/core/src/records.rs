//! Surveillance entries and the store that owns them.
//!
//! Entries are only ever added or deleted; there is no in-place edit. The rate is computed when
//! an entry is created and is never set independently.
//!
//! ## Storage
//!
//! The whole collection is stored as one JSON array under the `surveillance-data` key and is
//! rewritten after every mutation:
//!
//! ```text
//! [
//!   { "id": "550e8400e29b41d4a716446655440000", "module": "VAE", "population": "Adults",
//!     "month": 3, "year": 2024, "numerator": 3, "denominator": 1000, "rate": 3.0 }
//! ]
//! ```

use crate::constants::SURVEILLANCE_DATA_KEY;
use crate::kv::{self, KeyValueStore};
use crate::module::{Population, SurveillanceModule};
use crate::rate::calculate_rate;
use crate::{EntryId, FalconError, FalconResult, Month, Year};
use serde::{Deserialize, Serialize};

/// Form input for a new entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEntry {
    pub module: SurveillanceModule,
    pub population: Option<Population>,
    pub month: Month,
    pub year: Year,
    pub numerator: u32,
    pub denominator: u32,
    pub benchmark: Option<f64>,
}

/// One month of surveillance counts for a module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveillanceEntry {
    id: EntryId,
    module: SurveillanceModule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    population: Option<Population>,
    month: Month,
    year: Year,
    numerator: u32,
    denominator: u32,
    rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    benchmark: Option<f64>,
}

impl SurveillanceEntry {
    /// Creates an entry with a fresh id and its computed rate.
    ///
    /// A population supplied for a module that does not track one is dropped. Returns
    /// `FalconError::InvalidInput` if the reference benchmark is NaN or infinite, since JSON
    /// cannot store it.
    pub fn new(input: NewEntry) -> FalconResult<Self> {
        if let Some(benchmark) = input.benchmark {
            if !benchmark.is_finite() {
                return Err(FalconError::InvalidInput(format!(
                    "entry benchmark must be a finite number, got {}",
                    benchmark
                )));
            }
        }

        Ok(Self {
            id: EntryId::new(),
            module: input.module,
            population: input.module.applicable_population(input.population),
            month: input.month,
            year: input.year,
            numerator: input.numerator,
            denominator: input.denominator,
            rate: calculate_rate(input.numerator, input.denominator, input.module),
            benchmark: input.benchmark,
        })
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn module(&self) -> SurveillanceModule {
        self.module
    }

    pub fn population(&self) -> Option<Population> {
        self.population
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn benchmark(&self) -> Option<f64> {
        self.benchmark
    }
}

/// Owner of the surveillance entry collection.
///
/// Every mutation is written through to the backing [`KeyValueStore`]. A failed write is logged
/// and the in-memory collection keeps the change.
#[derive(Debug)]
pub struct RecordStore<S> {
    store: S,
    entries: Vec<SurveillanceEntry>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Loads the entry collection, starting empty if nothing is stored or the data is unreadable.
    pub fn load(mut store: S) -> Self {
        let entries: Vec<SurveillanceEntry> =
            kv::load_or_default(&store, SURVEILLANCE_DATA_KEY, Vec::new());
        kv::mark_loaded(&mut store);
        tracing::debug!("loaded {} surveillance entries", entries.len());

        Self { store, entries }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[SurveillanceEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&SurveillanceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Creates an entry from form input, appends it, and persists the collection.
    pub fn add(&mut self, input: NewEntry) -> FalconResult<SurveillanceEntry> {
        let entry = SurveillanceEntry::new(input)?;
        tracing::info!(
            "adding {} entry {} for {} {}",
            entry.module,
            entry.id,
            entry.month,
            entry.year
        );

        self.entries.push(entry.clone());
        self.persist();
        Ok(entry)
    }

    /// Removes the entry with `id`. Deleting an unknown id changes nothing.
    pub fn delete(&mut self, id: EntryId) -> Option<SurveillanceEntry> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(position);
        tracing::info!("deleted entry {}", id);

        self.persist();
        Some(removed)
    }

    /// Gives back the backing store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        kv::save(&mut self.store, SURVEILLANCE_DATA_KEY, &self.entries);
    }
}
