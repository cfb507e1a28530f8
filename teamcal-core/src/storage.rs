//! Durable key-value storage for small records (the settings record today).
//!
//! Values are opaque strings. Writes are last-writer-wins; there is no locking
//! across processes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{CalendarError, CalendarResult};

pub trait SettingsStorage {
    fn get(&self, key: &str) -> CalendarResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> CalendarResult<()>;
}

impl<S: SettingsStorage + ?Sized> SettingsStorage for &S {
    fn get(&self, key: &str) -> CalendarResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CalendarResult<()> {
        (**self).set(key, value)
    }
}

impl<S: SettingsStorage + ?Sized> SettingsStorage for Box<S> {
    fn get(&self, key: &str) -> CalendarResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CalendarResult<()> {
        (**self).set(key, value)
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CalendarResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if !valid {
            return Err(CalendarError::Storage(format!("Invalid storage key '{key}'")));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SettingsStorage for FileStorage {
    fn get(&self, key: &str) -> CalendarResult<Option<String>> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> CalendarResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail, as a full or disabled store would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn entries(&self) -> CalendarResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CalendarError::Storage("storage lock poisoned".into()))
    }
}

impl SettingsStorage for MemoryStorage {
    fn get(&self, key: &str) -> CalendarResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CalendarResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CalendarError::Storage("quota exceeded".into()));
        }
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get("calendar-settings").unwrap(), None);

        storage.set("calendar-settings", "{\"a\":1}").unwrap();
        storage.set("calendar-settings", "{\"a\":2}").unwrap();

        assert_eq!(
            storage.get("calendar-settings").unwrap().as_deref(),
            Some("{\"a\":2}")
        );
        assert!(!dir.path().join("nested/calendar-settings.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("a/b").is_err());
        assert!(storage.get("").is_err());
    }

    #[test]
    fn test_memory_storage_clones_share_state() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));

        other.set_fail_writes(true);
        assert!(storage.set("k", "w").is_err());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }
}
