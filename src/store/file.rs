//! File storage

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::store::{CartStorage, StorageError};

/// Keeps the cart blob in a single JSON file.
///
/// A missing file is an absent cart. Parent directories are created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a storage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Read(self.path.clone(), err)),
        }
    }

    fn write(&mut self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| StorageError::Write(self.path.clone(), err))?;
        }

        fs::write(&self.path, blob).map_err(|err| StorageError::Write(self.path.clone(), err))
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Remove(self.path.clone(), err)),
        }
    }
}
