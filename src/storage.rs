//! Client-side profile storage
//!
//! Keeps the small amount of state that must survive a restart (the username).
//! Native builds write one JSON file per key under the profile directory; wasm
//! builds keep an in-memory map for the page lifetime.

use std::path::PathBuf;

#[cfg(target_arch = "wasm32")]
use once_cell::sync::Lazy;
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
#[cfg(target_arch = "wasm32")]
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::fs;

const USERNAME_KEY: &str = "username";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid json: {0}")]
    Format(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(target_arch = "wasm32")]
static MEMORY_STORAGE: Lazy<Mutex<HashMap<PathBuf, HashMap<String, String>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Key/value store rooted at one profile directory.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform's local data directory, or `override_dir` when given.
    pub fn open(override_dir: Option<PathBuf>) -> Self {
        let root = override_dir.unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("chefchat").join("profile"))
                .unwrap_or_else(|| PathBuf::from("cache").join("profile"))
        });
        Self::new(root)
    }

    pub fn load_username(&self) -> StorageResult<Option<String>> {
        match self.get(USERNAME_KEY)? {
            Some(raw) => {
                let name: String = serde_json::from_str(&raw)?;
                let name = name.trim().to_string();
                Ok((!name.is_empty()).then_some(name))
            }
            None => Ok(None),
        }
    }

    pub fn save_username(&self, username: &str) -> StorageResult<()> {
        self.set(USERNAME_KEY, &serde_json::to_string(username)?)
    }

    pub fn forget_username(&self) -> StorageResult<()> {
        self.delete(USERNAME_KEY)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let storage = MEMORY_STORAGE.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(storage
            .get(&self.root)
            .and_then(|entries| entries.get(&sanitize_key(key)))
            .cloned())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut storage = MEMORY_STORAGE.lock().map_err(|_| StorageError::Poisoned)?;
        storage
            .entry(self.root.clone())
            .or_default()
            .insert(sanitize_key(key), value.to_string());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn delete(&self, key: &str) -> StorageResult<()> {
        let mut storage = MEMORY_STORAGE.lock().map_err(|_| StorageError::Poisoned)?;
        if let Some(entries) = storage.get_mut(&self.root) {
            entries.remove(&sanitize_key(key));
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear(&self) -> StorageResult<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn clear(&self) -> StorageResult<()> {
        let mut storage = MEMORY_STORAGE.lock().map_err(|_| StorageError::Poisoned)?;
        storage.remove(&self.root);
        Ok(())
    }
}

/// Sanitize storage key for filesystem use
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("username"), "username");
        assert_eq!(sanitize_key("user:preferences"), "user_preferences");
        assert_eq!(sanitize_key("../escape"), "___escape");
    }
}
