//! Key-value persistence.
//!
//! Values are JSON documents addressed by a short string key. [`FileStore`] keeps one
//! `<key>.json` file per key under the configured store directory; [`MemoryStore`] keeps them in
//! a map.
//!
//! Stores never block the caller on persistence problems. [`load_or_default`] logs the failure
//! and hands back the caller's default, and [`save`] logs and drops a failed write. There are no
//! retries, and two processes writing the same key are last-write-wins.

use crate::config::CoreConfig;
use crate::constants::IS_LOADING_KEY;
use crate::{FalconError, FalconResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A string-keyed store of JSON values.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if the key has never been set.
    fn get(&self, key: &str) -> FalconResult<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> FalconResult<()>;
}

/// File-backed store: `<store_dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the configured store directory.
    ///
    /// The directory is created on first write, not here.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::at(cfg.store_dir())
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> FalconResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> FalconResult<Option<Value>> {
        let path = self.path_for(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FalconError::FileRead(e)),
        };

        let value = serde_json::from_str(&contents).map_err(FalconError::Deserialization)?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: Value) -> FalconResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(FalconError::StorageDirCreation)?;

        let json = serde_json::to_string_pretty(&value).map_err(FalconError::Serialization)?;
        fs::write(&path, json).map_err(FalconError::FileWrite)?;
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FalconResult<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> FalconResult<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Loads and decodes the value under `key`, falling back to `default`.
///
/// A missing key returns `default` silently. Read or decode failures are logged and also return
/// `default`.
pub fn load_or_default<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!("Error loading data for '{}': {}", key, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            tracing::error!("Error loading data for '{}': {}", key, e);
            default
        }
    }
}

/// Encodes and stores `value` under `key`. Failures are logged and otherwise ignored.
pub fn save<S, T>(store: &mut S, key: &str, value: &T)
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let result = serde_json::to_value(value)
        .map_err(FalconError::Serialization)
        .and_then(|v| store.set(key, v));

    if let Err(e) = result {
        tracing::error!("Error saving data for '{}': {}", key, e);
    }
}

/// Records that the initial load has finished. Nothing is written if the flag is already
/// cleared, so read-only commands leave the store untouched.
pub fn mark_loaded<S>(store: &mut S)
where
    S: KeyValueStore + ?Sized,
{
    if let Ok(Some(Value::Bool(false))) = store.get(IS_LOADING_KEY) {
        return;
    }
    save(store, IS_LOADING_KEY, &false);
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> FalconResult<()> {
    let ok = !key.is_empty()
        && key
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));

    if !ok {
        return Err(FalconError::InvalidInput(format!(
            "invalid store key: '{}'",
            key
        )));
    }
    Ok(())
}
