//! Keyed blob storage for the persisted settings groups
//!
//! Each settings group lives under its own key. Reads never fail (a missing
//! or broken blob is `None`), writes are best effort: callers go through
//! [`save_json`], which logs and swallows errors.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::paths::APP_DIR;

pub trait Store {
    /// Raw blob for `key`, `None` when absent or unreadable
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, contents: &str) -> Result<()>;
}

/// One JSON file per key under a state directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<config dir>/f3pie-preview`, or `./f3pie-preview` without a config dir
    pub fn default_root() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to read settings file");
                }
                None
            }
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .context(format!("Failed to create state directory: {}", self.root.display()))?;
        let path = self.path_for(key);
        fs::write(&path, contents)
            .context(format!("Failed to write settings file to {}", path.display()))?;
        Ok(())
    }
}

/// Process-local store; nothing survives the process (`--ephemeral`, tests)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

impl<T: Store + ?Sized> Store for Arc<T> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<()> {
        (**self).write(key, contents)
    }
}

/// Parsed blob for `key`; absent and unparsable blobs are both `None`
pub fn load_json(store: &dyn Store, key: &str) -> Option<Value> {
    let raw = store.read(key)?;
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = key, error = %e, "Ignoring unparsable settings blob");
            None
        }
    }
}

/// Serialize and store `value` under `key`; failures are logged, never returned
pub fn save_json<T: Serialize + ?Sized>(store: &dyn Store, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .context(format!("Failed to serialize {key}"))
        .and_then(|contents| store.write(key, &contents));
    match result {
        Ok(()) => debug!(key = key, "Saved settings"),
        Err(e) => warn!(key = key, error = ?e, "Failed to save settings"),
    }
}
