//! `localStorage` backend for the persisted session.
//!
//! TRADE-OFFS
//! ==========
//! Reads that fail (no window, storage disabled, quota) read as absent. Writes
//! report a [`StoreError`] so the session manager can log them. SSR paths
//! never touch storage.

use session::{KeyValueStore, StoreError};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage(key: &str) -> Result<web_sys::Storage, StoreError> {
    let unavailable = |reason: &str| StoreError::Write { key: key.to_owned(), reason: reason.to_owned() };
    let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(unavailable("localStorage disabled")),
        Err(e) => Err(unavailable(&format!("{e:?}"))),
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = match local_storage(key) {
                Ok(storage) => storage,
                Err(e) => {
                    log::warn!("storage read skipped: {e}");
                    return None;
                }
            };
            storage.get_item(key).unwrap_or_default()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage(key)?
                .set_item(key, value)
                .map_err(|e| StoreError::Write { key: key.to_owned(), reason: format!("{e:?}") })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = value;
            Err(StoreError::Write { key: key.to_owned(), reason: "not available on server".to_owned() })
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage(key)?
                .remove_item(key)
                .map_err(|e| StoreError::Write { key: key.to_owned(), reason: format!("{e:?}") })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(StoreError::Write { key: key.to_owned(), reason: "not available on server".to_owned() })
        }
    }
}
