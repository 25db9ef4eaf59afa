use std::path::{Path, PathBuf};

use crate::error::{GiftError, Result};

use super::KeyValueStore;

/// One file per key (`<dir>/<key>.json`) in a data directory.
///
/// The directory is created on first write. Each write replaces the whole
/// value through a temp file and rename, so a crash never leaves a
/// half-written collection behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            GiftError::Storage(format!(
                "failed to create data dir {}: {e}",
                self.dir.display()
            ))
        })?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .map_err(|e| GiftError::Storage(format!("failed to write {key}: {e}")))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| GiftError::Storage(format!("failed to replace {key}: {e}")))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GiftError::Storage(format!("failed to remove {key}: {e}"))),
        }
    }
}
