// Local key/value storage
//
// The dashboard persists two string values (settings JSON and the migration
// mode). `KeyValueStorage` is the seam; `FileStorage` keeps every key in one
// JSON document on disk and `MemoryStorage` backs tests and ephemeral runs.

use super::error::PersistenceResult;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String-keyed storage with local-storage semantics: values are opaque
/// strings, a missing key is `Ok(None)`, writes replace.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> PersistenceResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> PersistenceResult<()>;

    fn remove_item(&self, key: &str) -> PersistenceResult<()>;
}

/// Volatile storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.items.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.items.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> PersistenceResult<()> {
        self.items.lock()?.remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object file.
///
/// The file is read once on open and rewritten on every change (write to a
/// sibling temp file, then rename). An unreadable or corrupt file is logged
/// and replaced by an empty store rather than failing startup.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(items) => {
                    debug!("Loaded {} stored keys from {}", items.len(), path.display());
                    items
                },
                Err(e) => {
                    warn!("Ignoring corrupt storage file {}: {}", path.display(), e);
                    BTreeMap::new()
                },
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No storage file at {}, starting empty", path.display());
                BTreeMap::new()
            },
            Err(e) => {
                warn!("Failed to read storage file {}: {}", path.display(), e);
                BTreeMap::new()
            },
        };

        Self {
            path,
            items: Mutex::new(items),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.items.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let mut items = self.items.lock()?;
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) -> PersistenceResult<()> {
        let mut items = self.items.lock()?;
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }
}
