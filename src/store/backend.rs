//! Key-value backends for the two persisted entries.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;

use crate::error::StorageError;

/// Local key-value storage.
///
/// `set` and `clear` must be durable before they return.
pub trait Storage
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every entry this storage owns.
    fn clear(&mut self) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S>
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>
    {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>
    {
        (**self).set(key, value)
    }

    fn clear(&mut self) -> Result<(), StorageError>
    {
        (**self).clear()
    }
}

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage
{
    dir: PathBuf,
}

impl FileStorage
{
    pub fn new(dir: impl Into<PathBuf>) -> Self
    {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, StorageError>
    {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.entry")))
    }

    fn lock_path(&self) -> PathBuf
    {
        self.dir.join(".lock")
    }

    fn lock(&self) -> Result<fs::File, StorageError>
    {
        fs::create_dir_all(&self.dir).map_err(|err| StorageError::io(&self.dir, err))?;
        let lock_path = self.lock_path();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|err| StorageError::io(&lock_path, err))?;
        lock_file
            .lock_exclusive()
            .map_err(|source| StorageError::Lock {
                path: lock_path,
                source,
            })?;
        Ok(lock_file)
    }
}

impl Storage for FileStorage
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>
    {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(path, err)),
        }
    }

    /// Temp file, `sync_all`, then rename over the entry, under an exclusive lock.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>
    {
        let path = self.entry_path(key)?;
        let _lock = self.lock()?;

        let temp_path = path.with_extension("entry.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|err| StorageError::io(&temp_path, err))?;
        temp_file
            .write_all(value.as_bytes())
            .map_err(|err| StorageError::io(&temp_path, err))?;
        temp_file
            .sync_all()
            .map_err(|err| StorageError::io(&temp_path, err))?;

        fs::rename(&temp_path, &path).map_err(|err| StorageError::io(&path, err))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError>
    {
        if !self.dir.exists() {
            return Ok(());
        }
        let _lock = self.lock()?;
        let entries = fs::read_dir(&self.dir).map_err(|err| StorageError::io(&self.dir, err))?;
        for entry in entries {
            let entry = entry.map_err(|err| StorageError::io(&self.dir, err))?;
            let path = entry.path();
            let is_entry = path
                .extension()
                .is_some_and(|ext| ext == "entry" || ext == "tmp");
            if is_entry {
                fs::remove_file(&path).map_err(|err| StorageError::io(&path, err))?;
            }
        }
        Ok(())
    }
}

/// Process-local storage for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage
{
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self
    {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Every write fails, like a browser with storage disabled.
    pub fn read_only(mut self) -> Self
    {
        self.read_only = true;
        self
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>
    {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>
    {
        if self.read_only {
            return Err(StorageError::Unavailable("storage is read-only".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError>
    {
        if self.read_only {
            return Err(StorageError::Unavailable("storage is read-only".to_string()));
        }
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_round_trip()
    {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().join("data"));
        assert_eq!(storage.get("child-name").unwrap(), None);

        storage.set("child-name", "Mia").unwrap();
        assert_eq!(storage.get("child-name").unwrap().as_deref(), Some("Mia"));

        storage.set("child-name", "Leo").unwrap();
        assert_eq!(storage.get("child-name").unwrap().as_deref(), Some("Leo"));
        assert!(!dir.path().join("data").join("child-name.entry.tmp").exists());
    }

    #[test]
    fn file_storage_clear_removes_entries_only()
    {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("progress", "{}").unwrap();
        storage.set("child-name", "Mia").unwrap();
        fs::write(dir.path().join("safelearn.log"), "log line").unwrap();

        storage.clear().unwrap();

        assert_eq!(storage.get("progress").unwrap(), None);
        assert_eq!(storage.get("child-name").unwrap(), None);
        assert!(dir.path().join("safelearn.log").exists());
    }

    #[test]
    fn file_storage_rejects_path_like_keys()
    {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        let err = storage.set("../escape", "x").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn read_only_memory_storage_refuses_writes()
    {
        let mut storage = MemoryStorage::new().with_entry("child-name", "Mia").read_only();
        assert!(storage.set("progress", "{}").is_err());
        assert!(storage.clear().is_err());
        assert_eq!(storage.get("child-name").unwrap().as_deref(), Some("Mia"));
    }
}
