//! In-memory stores
//!
//! Keeps albums, stickers, users and collection entries in ordered maps so
//! reads come back in the same order the MySQL queries use (sticker id, user
//! id). Can be seeded from a TOML file:
//!
//! ```toml
//! [[albums]]
//! id = 1
//! name = "World Cup"
//! year = 2026
//!
//! [[stickers]]
//! id = 10
//! album_id = 1
//! number = "5"
//! name = "Goalkeeper"
//!
//! [[users]]
//! id = 1
//! username = "ana"
//! selected_album_id = 1
//!
//! [[entries]]
//! user_id = 1
//! sticker_id = 10
//! status = "no"
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{CollectionStore, MatchRecorder, UserDirectory};
use crate::engine::entry::{
    Album, CollectionEntry, MatchRecord, Sticker, StickerStatus, User,
};
use crate::error::StoreError;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub user_id: i64,
    pub sticker_id: i64,
    pub status: StickerStatus,
}

/// Initial content of a memory store
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub albums: Vec<Album>,
    pub stickers: Vec<Sticker>,
    pub users: Vec<User>,
    pub entries: Vec<SeedEntry>,
}

#[derive(Debug, Default)]
struct Inner {
    albums: HashMap<i64, Album>,
    stickers: BTreeMap<i64, Sticker>,
    users: BTreeMap<i64, User>,
    // (user id, sticker id) -> status, at most one per pair
    entries: HashMap<(i64, i64), StickerStatus>,
    matches: Vec<MatchRecord>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn from_seed(seed: Seed) -> Self {
        let mut inner = Inner::default();
        for album in seed.albums {
            inner.albums.insert(album.id, album);
        }
        for sticker in seed.stickers {
            inner.stickers.insert(sticker.id, sticker);
        }
        for user in seed.users {
            inner.users.insert(user.id, user);
        }
        for entry in seed.entries {
            // A later entry for the same pair overwrites the earlier one
            inner
                .entries
                .insert((entry.user_id, entry.sticker_id), entry.status);
        }
        log::info!(
            "memory store seeded: {} albums, {} stickers, {} users, {} entries",
            inner.albums.len(),
            inner.stickers.len(),
            inner.users.len(),
            inner.entries.len()
        );
        Self {
            inner: RwLock::new(inner),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read seed {}: {}", path.display(), e))
        })?;
        let seed: Seed = toml::from_str(&contents)
            .map_err(|e| StoreError::Malformed(format!("seed {}: {}", path.display(), e)))?;
        Ok(Self::from_seed(seed))
    }

    /// Marks a sticker for a user, replacing any previous status
    #[cfg(test)]
    pub fn set_status(
        &self,
        user_id: i64,
        sticker_id: i64,
        status: StickerStatus,
    ) -> Result<(), StoreError> {
        self.write()?.entries.insert((user_id, sticker_id), status);
        Ok(())
    }

    #[cfg(test)]
    pub fn matches(&self) -> Vec<MatchRecord> {
        self.read().map(|inner| inner.matches.clone()).unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn get_collection_entries(
        &self,
        user_id: i64,
        album_id: i64,
    ) -> Result<Vec<CollectionEntry>, StoreError> {
        let inner = self.read()?;
        let entries = inner
            .stickers
            .values()
            .filter(|sticker| sticker.album_id == album_id)
            .filter_map(|sticker| {
                inner
                    .entries
                    .get(&(user_id, sticker.id))
                    .map(|status| CollectionEntry::new(sticker.number.clone(), *status))
            })
            .collect();
        Ok(entries)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn get_users_with_selected_album(
        &self,
        album_id: i64,
        excluding_user_id: i64,
    ) -> Result<Vec<User>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .users
            .values()
            .filter(|user| user.id != excluding_user_id)
            .filter(|user| user.selected_album_id == Some(album_id))
            .cloned()
            .collect())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl MatchRecorder for MemoryStore {
    async fn insert_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        for user_id in [record.user_id, record.other_user_id] {
            if !inner.users.contains_key(&user_id) {
                return Err(StoreError::NotFound(format!("user {}", user_id)));
            }
        }
        if !inner.albums.contains_key(&record.album_id) {
            return Err(StoreError::NotFound(format!("album {}", record.album_id)));
        }
        inner.matches.push(record.clone());
        Ok(())
    }
}
