//! Constants used throughout the Falcon core crate.
//!
//! Storage keys live here so every store reads and writes the same names.

/// Key holding the list of surveillance entries.
pub const SURVEILLANCE_DATA_KEY: &str = "surveillance-data";

/// Key holding the list of benchmark definitions.
pub const BENCHMARKS_KEY: &str = "benchmarks";

/// Key holding the loading flag, written `false` once a store has completed its first load.
pub const IS_LOADING_KEY: &str = "isLoading";

/// Key holding the dialysis report month, stored as the English month name.
pub const REPORT_MONTH_KEY: &str = "falcon_report_month";

/// Key holding the dialysis report year, stored as plain text.
pub const REPORT_YEAR_KEY: &str = "falcon_report_year";

/// Default directory for Falcon data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "falcon_data";

/// Default store namespace (a subdirectory of the data directory).
pub const DEFAULT_STORE_NAMESPACE: &str = "falcon-surveillance";

/// Source label pre-filled for new benchmark definitions.
pub const DEFAULT_BENCHMARK_SOURCE: &str = "CDC/NHSN";

/// Shared passcode for the dialysis report workflow.
pub const REPORT_PASSCODE: &str = "FALCON";
