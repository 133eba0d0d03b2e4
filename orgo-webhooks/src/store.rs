//! Workflow-scoped static data
//!
//! The lifecycle manager persists exactly one value, the remote subscription
//! id, under [`WEBHOOK_ID_KEY`]. Stores are injected so the same manager runs
//! against process memory in tests and a JSON file in the binary.

use crate::{Result, WebhookError};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Key the subscription pointer is stored under.
pub const WEBHOOK_ID_KEY: &str = "webhookId";

/// Persistent key/value bag scoped to one workflow trigger.
pub trait StaticDataStore: Send + Sync + fmt::Debug {
    /// Read a value.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove a value, returning what was there.
    fn remove(&self, key: &str) -> Result<Option<Value>>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl StaticDataStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.write().remove(key))
    }
}

/// JSON-file-backed store
///
/// The whole file is one JSON object. Every write rewrites it through a
/// temporary sibling and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RwLock<Map<String, Value>>,
}

impl FileStore {
    /// Open a store, loading the file if it exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| store_error(&path, e))?;
            if contents.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str(&contents) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => {
                        return Err(WebhookError::Store(format!(
                            "{}: expected a JSON object",
                            path.display()
                        )));
                    }
                    Err(e) => return Err(store_error(&path, e)),
                }
            }
        } else {
            Map::new()
        };

        debug!(path = %path.display(), keys = data.len(), "Opened static data file");
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_string_pretty(data).map_err(|e| store_error(&self.path, e))?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, contents).map_err(|e| store_error(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| store_error(&self.path, e))
    }
}

impl StaticDataStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut data = self.data.write();
        let previous = data.insert(key.to_string(), value);
        if let Err(e) = self.persist(&data) {
            // Keep memory in line with disk.
            match previous {
                Some(previous) => data.insert(key.to_string(), previous),
                None => data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<Value>> {
        let mut data = self.data.write();
        let Some(previous) = data.remove(key) else {
            return Ok(None);
        };
        if let Err(e) = self.persist(&data) {
            data.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(Some(previous))
    }
}

/// Prefixes every key so several triggers can share one backing store.
#[derive(Debug, Clone)]
pub struct ScopedStore {
    inner: Arc<dyn StaticDataStore>,
    scope: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn StaticDataStore>, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.scope, key)
    }
}

impl StaticDataStore for ScopedStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(&self.key(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.inner.set(&self.key(key), value)
    }

    fn remove(&self, key: &str) -> Result<Option<Value>> {
        self.inner.remove(&self.key(key))
    }
}

fn store_error(path: &Path, err: impl fmt::Display) -> WebhookError {
    WebhookError::Store(format!("{}: {}", path.display(), err))
}
