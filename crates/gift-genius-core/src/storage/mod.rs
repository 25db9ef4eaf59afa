mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::GiftGeniusConfig;
use crate::error::Result;

/// Key holding the JSON-encoded history collection.
pub const HISTORY_KEY: &str = "gift_genius_history";
/// Key holding the JSON-encoded saved-items collection.
pub const SAVED_KEY: &str = "gift_genius_saved";
/// Scalar key for the active locale.
pub const LOCALE_KEY: &str = "gift_genius_lang";
/// Scalar key for the active theme.
pub const THEME_KEY: &str = "gift_genius_theme";

/// Durable string key-value storage, the local equivalent of a browser's
/// `localStorage`.
///
/// Reads never fail: an unreadable value is reported as missing. Writes
/// propagate errors.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Enum wrapper for the concrete stores.
#[derive(Debug)]
pub enum Storage {
    File(FileStore),
    Memory(MemoryStore),
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            Storage::File(s) => s.get(key),
            Storage::Memory(s) => s.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Storage::File(s) => s.set(key, value),
            Storage::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self {
            Storage::File(s) => s.remove(key),
            Storage::Memory(s) => s.remove(key),
        }
    }
}

/// Create the file-backed store from configuration.
pub fn create_store(config: &GiftGeniusConfig) -> Storage {
    Storage::File(FileStore::new(config.storage.resolved_path()))
}

/// Read a JSON collection, treating a missing or corrupt payload as empty.
pub(crate) fn read_json_list<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt stored collection");
            Vec::new()
        }
    }
}

/// Serialize and store a JSON collection.
pub(crate) fn write_json_list<T, S>(store: &S, key: &str, items: &[T]) -> Result<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(items)?;
    store.set(key, &json)
}
