//! File-backed key/value storage.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go through a temporary
//! file and a rename so a crash never leaves a half-written entry.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// A directory of named string entries.
#[derive(Debug, Clone)]
pub struct KeyValueStorage {
    dir: PathBuf,
}

impl KeyValueStorage {
    /// Open (and create if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read an entry; `None` when it was never written or was removed.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace an entry.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(key, bytes = value.len(), "Local entry written");
        Ok(())
    }

    /// Remove an entry. Removing a missing entry is not an error.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let storage = KeyValueStorage::open(dir.path().join("nested")).unwrap();

        assert_eq!(storage.get_item("tires").unwrap(), None);
        storage.set_item("tires", "[]").unwrap();
        assert_eq!(storage.get_item("tires").unwrap().as_deref(), Some("[]"));

        storage.remove_item("tires").unwrap();
        storage.remove_item("tires").unwrap();
        assert_eq!(storage.get_item("tires").unwrap(), None);
    }
}
