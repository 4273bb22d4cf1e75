//! Durable local key-value storage
//!
//! A single JSON document on disk mapping string keys to JSON values, the
//! local analog of browser storage. The in-memory session is always the
//! source of truth; this store is a cache consulted only at cold start.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage key for the persisted session.
pub const USER_KEY: &str = "user";
/// Storage key for the theme preference.
pub const THEME_KEY: &str = "theme";
/// Storage key for the language preference.
pub const LANGUAGE_KEY: &str = "language";

/// File-backed key-value store.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Open a store at the given path. The file is created lazily on the
    /// first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and deserialize the value under `key`, if present.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let map = self.read_map()?;
        match map.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Serialize and write `value` under `key`.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_map(&map)
    }

    /// Remove the value under `key`. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    /// Whether a value exists under `key`.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.read_map()?.contains_key(key))
    }

    fn read_map(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("corrupt storage file {}: {}", self.path.display(), e)))
    }

    fn write_map(&self, map: &BTreeMap<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
