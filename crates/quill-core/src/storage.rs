use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::error::QuillError;

/// String key-value backend with the shape of the browser's `localStorage`.
///
/// Every call is synchronous and immediate. Implementations are `Send + Sync`
/// only so a handle can be shared behind `Arc`; there is no coordination
/// between two handles writing the same key (last write wins).
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, QuillError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), QuillError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), QuillError>;

    /// Remove every key (use with caution).
    fn clear(&self) -> Result<(), QuillError>;
}

// ── In-Memory Backend ──

/// Map-backed storage. Clones share the same map, like two views over one
/// browser profile. Good for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> QuillError {
    QuillError::Internal("storage lock poisoned".to_string())
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, QuillError> {
        Ok(self.items.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), QuillError> {
        self.items
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), QuillError> {
        self.items.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), QuillError> {
        self.items.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

// ── File Backend ──

/// Directory-backed storage: each key lives in `<data_dir>/<key>.json`.
///
/// ```rust,ignore
/// let storage = FileStorage::new("./.quill");
/// storage.set_item("blog_posts", "[]")?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    pub data_dir: PathBuf,
}

const FILE_EXTENSION: &str = "json";

impl FileStorage {
    /// Create a new file storage backend. The directory is created lazily.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        FileStorage {
            data_dir: data_dir.into(),
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_dir(&self) -> Result<(), QuillError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            QuillError::Storage(format!(
                "Failed to create data dir {}: {}",
                self.data_dir.display(),
                e
            ))
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, QuillError> {
        validate_key(key)?;
        Ok(self.data_dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
pub fn validate_key(key: &str) -> Result<(), QuillError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(QuillError::InvalidInput(format!(
            "Storage key '{}' not allowed",
            key
        )));
    }
    Ok(())
}

impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, QuillError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuillError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), QuillError> {
        let path = self.path_for(key)?;
        self.ensure_dir()?;
        fs::write(&path, value).map_err(|e| {
            QuillError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), QuillError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuillError::Storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn clear(&self) -> Result<(), QuillError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(QuillError::Storage(format!("Failed to list data dir: {}", e))),
        };

        for entry in entries {
            let path = entry
                .map_err(|e| QuillError::Storage(format!("Failed to list data dir: {}", e)))?
                .path();
            if path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION) {
                fs::remove_file(&path).map_err(|e| {
                    QuillError::Storage(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
        }
        Ok(())
    }
}

// ── Browser Backend ──

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::JsValue;
    use web_sys::{Storage, window};

    use super::KeyValueStore;
    use crate::error::QuillError;

    /// `window.localStorage`, the backend the keys were designed for.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct BrowserStorage;

    fn js_error(e: JsValue) -> QuillError {
        QuillError::Storage(format!("localStorage error: {:?}", e))
    }

    impl BrowserStorage {
        fn storage() -> Result<Storage, QuillError> {
            window()
                .ok_or_else(|| QuillError::Storage("No window available".to_string()))?
                .local_storage()
                .map_err(js_error)?
                .ok_or_else(|| QuillError::Storage("Local storage not available".to_string()))
        }
    }

    impl KeyValueStore for BrowserStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, QuillError> {
            Self::storage()?.get_item(key).map_err(js_error)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), QuillError> {
            Self::storage()?.set_item(key, value).map_err(js_error)
        }

        fn remove_item(&self, key: &str) -> Result<(), QuillError> {
            Self::storage()?.remove_item(key).map_err(js_error)
        }

        fn clear(&self) -> Result<(), QuillError> {
            Self::storage()?.clear().map_err(js_error)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;
