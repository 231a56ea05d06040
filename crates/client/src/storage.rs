//! Persisted client state.
//!
//! The only thing the client persists is the access token, under a single
//! fixed key. Backends:
//! - Web: `localStorage`
//! - Desktop: one file per key in the platform config directory:
//!   - Linux: `~/.config/lms-admin/`
//!   - macOS: `~/Library/Application Support/lms-admin/`
//!   - Windows: `%APPDATA%\lms-admin\`
//! - Tests and headless embedding: [`MemoryStorage`]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key the access token lives under.
pub const TOKEN_KEY: &str = "authToken";

/// A string key/value store.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns `true` if the value was written.
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str);
}

/// Platform persistent storage (see module docs).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        load_raw(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        save_raw(key, value)
    }

    fn remove(&self, key: &str) {
        remove_raw(key);
    }
}

/// In-process storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Sole reader/writer of the persisted access token.
#[derive(Clone)]
pub struct TokenStore {
    storage: Rc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Rc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryStorage::new()))
    }

    pub fn persistent() -> Self {
        Self::new(Rc::new(LocalStorage))
    }

    pub fn get(&self) -> Option<String> {
        self.storage
            .get(TOKEN_KEY)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn set(&self, token: &str) {
        if !self.storage.set(TOKEN_KEY, token) {
            crate::log_warn!("failed to persist access token");
        }
    }

    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_token", &self.get().is_some())
            .finish()
    }
}

// =========================================
// Web (WASM) implementation
// =========================================

#[cfg(target_arch = "wasm32")]
fn save_raw(key: &str, value: &str) -> bool {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            return storage.set_item(key, value).is_ok();
        }
    }
    false
}

#[cfg(target_arch = "wasm32")]
fn load_raw(key: &str) -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
fn remove_raw(key: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

// =========================================
// Desktop (native) implementation
// =========================================

#[cfg(not(target_arch = "wasm32"))]
fn get_config_dir() -> Option<std::path::PathBuf> {
    let config_dir = dirs::config_dir()?;
    let app_dir = config_dir.join("lms-admin");

    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir).ok()?;
    }

    Some(app_dir)
}

#[cfg(not(target_arch = "wasm32"))]
fn get_file_path(key: &str) -> Option<std::path::PathBuf> {
    let config_dir = get_config_dir()?;
    let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
    Some(config_dir.join(safe_key))
}

#[cfg(not(target_arch = "wasm32"))]
fn save_raw(key: &str, value: &str) -> bool {
    let Some(path) = get_file_path(key) else {
        return false;
    };
    std::fs::write(path, value).is_ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn load_raw(key: &str) -> Option<String> {
    let path = get_file_path(key)?;
    std::fs::read_to_string(path).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn remove_raw(key: &str) {
    if let Some(path) = get_file_path(key) {
        let _ = std::fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_store_round_trip_and_blank_values() {
        let tokens = TokenStore::in_memory();
        assert_eq!(tokens.get(), None);

        tokens.set("abc.def.ghi");
        assert_eq!(tokens.get().as_deref(), Some("abc.def.ghi"));

        tokens.set("   ");
        assert_eq!(tokens.get(), None);

        tokens.set("x");
        tokens.clear();
        assert_eq!(tokens.get(), None);
    }

    #[test]
    fn clones_share_the_backing_store() {
        let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
        let a = TokenStore::new(storage.clone());
        let b = TokenStore::new(storage.clone());
        a.set("shared");
        assert_eq!(b.get().as_deref(), Some("shared"));
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("shared"));
    }
}
