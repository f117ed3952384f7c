//! Favorites stores: which cards the user has marked as favorite.
//!
//! Cards are tracked by [`CardRecord::favorite_key`]. A record without an id
//! or name can never be a favorite.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{CatalogError, Result};
use crate::models::CardRecord;

/// Capability to query and update favorite status.
pub trait FavoritesStore: Send + Sync {
    fn is_favorite(&self, record: &CardRecord) -> bool;

    fn set_favorite(&self, record: &CardRecord, favorite: bool) -> Result<()>;

    /// All stored keys, sorted.
    fn favorite_keys(&self) -> Vec<String>;

    /// Flip the current status and return the new one.
    fn toggle(&self, record: &CardRecord) -> Result<bool> {
        let next = !self.is_favorite(record);
        self.set_favorite(record, next)?;
        Ok(next)
    }
}

fn key_of(record: &CardRecord) -> Result<&str> {
    record.favorite_key().ok_or_else(|| {
        CatalogError::InvalidArgument("card has neither an id nor a name".into())
    })
}

fn lock(keys: &Mutex<BTreeSet<String>>) -> MutexGuard<'_, BTreeSet<String>> {
    keys.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// MemoryFavorites
// ---------------------------------------------------------------------------

/// Favorites held in memory only.
#[derive(Debug, Default)]
pub struct MemoryFavorites {
    keys: Mutex<BTreeSet<String>>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for MemoryFavorites {
    fn is_favorite(&self, record: &CardRecord) -> bool {
        record
            .favorite_key()
            .map(|k| lock(&self.keys).contains(k))
            .unwrap_or(false)
    }

    fn set_favorite(&self, record: &CardRecord, favorite: bool) -> Result<()> {
        let key = key_of(record)?;
        let mut keys = lock(&self.keys);
        if favorite {
            keys.insert(key.to_string());
        } else {
            keys.remove(key);
        }
        Ok(())
    }

    fn favorite_keys(&self) -> Vec<String> {
        lock(&self.keys).iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// FileFavorites
// ---------------------------------------------------------------------------

/// Favorites persisted as a JSON array of keys.
///
/// Every change rewrites the file through a temporary file in the same
/// directory, so readers never observe a partial write.
#[derive(Debug)]
pub struct FileFavorites {
    path: PathBuf,
    keys: Mutex<BTreeSet<String>>,
}

impl FileFavorites {
    /// Open (or start) the favorites file at `path`.
    ///
    /// A missing file starts empty. A corrupt file is logged and treated as
    /// empty; it is overwritten on the next change.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let keys = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeSet<String>>(&contents) {
                Ok(keys) => keys,
                Err(e) => {
                    log::warn!("Corrupt favorites file {}: {} -- starting empty", path.display(), e);
                    BTreeSet::new()
                }
            }
        } else {
            BTreeSet::new()
        };

        log::debug!("Loaded {} favorites from {}", keys.len(), path.display());
        Ok(Self {
            path,
            keys: Mutex::new(keys),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, keys: &BTreeSet<String>) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, keys)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| CatalogError::Io(e.error))?;
        Ok(())
    }
}

impl FavoritesStore for FileFavorites {
    fn is_favorite(&self, record: &CardRecord) -> bool {
        record
            .favorite_key()
            .map(|k| lock(&self.keys).contains(k))
            .unwrap_or(false)
    }

    fn set_favorite(&self, record: &CardRecord, favorite: bool) -> Result<()> {
        let key = key_of(record)?;
        let mut keys = lock(&self.keys);
        let changed = if favorite {
            keys.insert(key.to_string())
        } else {
            keys.remove(key)
        };
        if changed {
            if let Err(e) = self.save(&keys) {
                log::warn!("Failed to save favorites to {}: {}", self.path.display(), e);
                // keep memory in sync with disk
                if favorite {
                    keys.remove(key);
                } else {
                    keys.insert(key.to_string());
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn favorite_keys(&self) -> Vec<String> {
        lock(&self.keys).iter().cloned().collect()
    }
}
