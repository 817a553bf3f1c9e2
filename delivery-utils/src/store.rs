use crate::{dejsonify, jsonify_pretty};
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

/// Minimal table/key document store used for stop sets and run results.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, table: &str, key: &str) -> Result<Option<Value>>;
    fn put(&self, table: &str, key: &str, value: &Value) -> Result<()>;
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && name != "."
        && name != "..";
    if valid {
        Ok(())
    } else {
        Err(anyhow!("Invalid {} name '{}'", kind, name))
    }
}

/// Stores each item as `<root>/<table>/<key>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn item_path(&self, table: &str, key: &str) -> Result<PathBuf> {
        check_name("table", table)?;
        check_name("key", key)?;
        Ok(self.root.join(table).join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<Value>> {
        let path = self.item_path(table, key)?;
        if !path.exists() {
            log::debug!("no item at {}", path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = dejsonify::<Value>(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(value))
    }

    fn put(&self, table: &str, key: &str, value: &Value) -> Result<()> {
        let path = self.item_path(table, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, jsonify_pretty(value)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("wrote item to {}", path.display());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, table: &str, key: &str) -> Result<Option<Value>> {
        let items = self
            .items
            .read()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        Ok(items.get(&(table.to_string(), key.to_string())).cloned())
    }

    fn put(&self, table: &str, key: &str, value: &Value) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|_| anyhow!("Memory store lock poisoned"))?;
        items.insert((table.to_string(), key.to_string()), value.clone());
        Ok(())
    }
}
