//! JSON file backend for the persisted session.
//!
//! The file holds a flat string map (`{"authToken": "...", "authUser": "..."}`)
//! so it mirrors the browser's `localStorage` layout. Every write rewrites the
//! whole file; on Unix it is restricted to the owner.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use session::{KeyValueStore, StoreError};

pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Load `path`. A missing file is an empty store; an unreadable or
    /// malformed one is logged and treated as empty, and is replaced on the
    /// next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match load(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                BTreeMap::new()
            }
        };
        Self { path, entries: RefCell::new(entries) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, key: &str) -> Result<(), StoreError> {
        let write_err = |reason: String| StoreError::Write { key: key.to_owned(), reason };
        let entries = self.entries.borrow();
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(write_err(e.to_string())),
            };
        }
        let rendered = serde_json::to_string_pretty(&*entries)
            .map_err(|e| StoreError::Encode { key: key.to_owned(), reason: e.to_string() })?;
        write_private(&self.path, rendered.as_bytes()).map_err(|e| write_err(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        self.flush(key)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.entries.borrow_mut().remove(key).is_none() {
            return Ok(());
        }
        self.flush(key)
    }
}

fn load(path: &Path) -> Result<BTreeMap<String, String>, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.to_string()),
    };
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

/// Write `contents`, creating the file owner-only. A file that already
/// existed with wider permissions is narrowed before it is truncated.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(false);
    let mut file = open_private(&mut options, path)?;
    file.set_len(0)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(unix)]
fn open_private(options: &mut fs::OpenOptions, path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = options.mode(0o600).open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(options: &mut fs::OpenOptions, path: &Path) -> io::Result<fs::File> {
    options.open(path)
}
