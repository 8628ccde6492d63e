//! Identifiers for stored surveillance entries.
//!
//! Falcon gives every surveillance entry an opaque identifier when it is created. The identifier
//! is never reused and never changes; entries are deleted by it.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the value produced by `Uuid::new_v4().simple().to_string()`. Identifiers supplied from
//! outside the core (CLI arguments, stored JSON) must already be canonical; hyphenated or
//! uppercase forms are rejected rather than normalised.

mod entry_id;

pub use entry_id::{EntryId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
