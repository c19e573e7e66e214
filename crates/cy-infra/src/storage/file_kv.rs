use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use cy_core::ports::{KeyValueStorePort, StorageError};

/// One file per key under a directory.
///
/// Writes go to `<key>.tmp` first and are renamed into place, so a reader
/// never sees a half-written value.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
            || key.contains('\0');
        if invalid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

fn io_err(context: &str, path: &Path, err: std::io::Error) -> StorageError {
    StorageError::Io(format!("{context} {}: {err}", path.display()))
}

impl KeyValueStorePort for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err("read", &path, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| io_err("create dir", &self.dir, e))?;

        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, value).map_err(|e| io_err("write", &tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_err("rename", &path, e))?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_err("remove", &path, err)),
        }
    }
}
