//! # Falcon Core
//!
//! Core logic for the Falcon infection-surveillance tool.
//!
//! This crate contains pure data operations and local persistence:
//! - Rate calculation per surveillance module, and averaging across months
//! - Benchmark definitions and the three-way benchmark comparison
//! - The surveillance entry store and benchmark store, backed by a key-value store
//! - Monthly report series and dashboard tiles
//! - The transient dialysis report session
//!
//! **No presentation concerns**: rendering, export, and argument parsing belong in `falcon-cli`.

pub mod benchmark;
pub mod config;
pub mod constants;
pub mod dialysis;
pub mod error;
pub mod gate;
pub mod kv;
pub mod module;
pub mod rate;
pub mod records;
pub mod report;

pub use error::{FalconError, FalconResult};
pub use falcon_types::{Month, NonEmptyText, TypesError, Year};
pub use falcon_uuid::EntryId;
pub use module::{Population, SurveillanceModule};
