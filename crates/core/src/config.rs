//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the stores. The core
//! never reads environment variables after that point.

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_STORE_NAMESPACE};
use crate::{FalconError, FalconResult, NonEmptyText};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    store_namespace: NonEmptyText,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `FalconError::InvalidInput` if `store_namespace` is not safe to use as a directory
    /// name.
    pub fn new(data_dir: PathBuf, store_namespace: NonEmptyText) -> FalconResult<Self> {
        validate_store_namespace(store_namespace.as_str())?;

        Ok(Self {
            data_dir,
            store_namespace,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn store_namespace(&self) -> &str {
        self.store_namespace.as_str()
    }

    /// Directory holding one JSON file per stored key.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join(self.store_namespace.as_str())
    }
}

/// Resolve the data directory from an optional override and an optional environment value.
///
/// The override (a CLI flag) wins, then the environment value, then [`DEFAULT_DATA_DIR`].
/// Empty or whitespace-only values are treated as absent.
pub fn data_dir_from_values(override_dir: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }

    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Parse the store namespace from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_STORE_NAMESPACE`].
pub fn store_namespace_from_env_value(value: Option<String>) -> FalconResult<NonEmptyText> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_STORE_NAMESPACE.to_string());

    Ok(NonEmptyText::new(value)?)
}

/// Validates that a store namespace is safe to use as a single directory name.
///
/// Rejects anything that could escape the data directory: path separators, `.`/`..`, and
/// characters outside a conservative ASCII set.
pub fn validate_store_namespace(namespace: &str) -> FalconResult<()> {
    const MAX_NAMESPACE_LEN: usize = 64;

    if namespace.trim().is_empty() {
        return Err(FalconError::InvalidInput(
            "store namespace cannot be empty".into(),
        ));
    }

    if namespace.len() > MAX_NAMESPACE_LEN {
        return Err(FalconError::InvalidInput(format!(
            "store namespace exceeds maximum length of {} characters",
            MAX_NAMESPACE_LEN
        )));
    }

    if namespace.chars().all(|c| c == '.') {
        return Err(FalconError::InvalidInput(
            "store namespace cannot be '.' or '..'".into(),
        ));
    }

    let ok = namespace
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'_'));

    if !ok {
        return Err(FalconError::InvalidInput(
            "store namespace contains invalid characters (only alphanumeric, '.', '-', '_' allowed)"
                .into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_prefers_override() {
        let dir = data_dir_from_values(Some(PathBuf::from("/tmp/x")), Some("/tmp/y".into()));
        assert_eq!(dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_data_dir_falls_back_to_env_then_default() {
        assert_eq!(
            data_dir_from_values(None, Some(" /tmp/y ".into())),
            PathBuf::from("/tmp/y")
        );
        assert_eq!(
            data_dir_from_values(None, Some("   ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(data_dir_from_values(None, None), PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn test_store_namespace_defaults() {
        let ns = store_namespace_from_env_value(None).unwrap();
        assert_eq!(ns.as_str(), DEFAULT_STORE_NAMESPACE);
    }

    #[test]
    fn test_store_dir_joins_namespace() {
        let cfg = CoreConfig::new(
            PathBuf::from("data"),
            NonEmptyText::new("falcon-surveillance").unwrap(),
        )
        .unwrap();
        assert_eq!(cfg.store_dir(), PathBuf::from("data").join("falcon-surveillance"));
    }

    #[test]
    fn test_validate_store_namespace_rejects_traversal() {
        let err = validate_store_namespace("..").expect_err("should reject ..");
        assert!(matches!(err, FalconError::InvalidInput(msg) if msg.contains("'.' or '..'")));

        let err = validate_store_namespace("a/b").expect_err("should reject separator");
        assert!(matches!(err, FalconError::InvalidInput(msg) if msg.contains("invalid characters")));
    }

    #[test]
    fn test_validate_store_namespace_rejects_too_long() {
        let long = "a".repeat(65);
        let err = validate_store_namespace(&long).expect_err("should reject too long");
        assert!(matches!(err, FalconError::InvalidInput(msg) if msg.contains("maximum length")));
    }
}
