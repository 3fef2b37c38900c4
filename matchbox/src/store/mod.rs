//! Collaborator stores
//!
//! The match service reads collections and users and writes match records
//! through the traits below. Two adapters exist:
//! - `memory`: seedable in-process store for development and tests
//! - `mysql`: the relational schema behind the production app

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{StoreConfig, StoreKind};
use crate::engine::entry::{CollectionEntry, MatchRecord, User};
use crate::error::StoreError;

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// Per-user sticker statuses
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Entries of `user_id` for the stickers of `album_id`, joined with the
    /// sticker's collector number. Stickers without an entry are omitted.
    async fn get_collection_entries(
        &self,
        user_id: i64,
        album_id: i64,
    ) -> Result<Vec<CollectionEntry>, StoreError>;
}

/// Lookup of users by their active album
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every user except `excluding_user_id` whose selected album is `album_id`
    async fn get_users_with_selected_album(
        &self,
        album_id: i64,
        excluding_user_id: i64,
    ) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError>;
}

/// Persistence of matches users acted on
#[async_trait]
pub trait MatchRecorder: Send + Sync {
    async fn insert_match(&self, record: &MatchRecord) -> Result<(), StoreError>;
}

/// The three collaborators, built once at startup and handed down
#[derive(Clone)]
pub struct Stores {
    pub collections: Arc<dyn CollectionStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub recorder: Arc<dyn MatchRecorder>,
}

impl Stores {
    /// Uses one backend for all three roles
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CollectionStore + UserDirectory + MatchRecorder + 'static,
    {
        Self {
            collections: store.clone(),
            directory: store.clone(),
            recorder: store,
        }
    }

    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.kind {
            StoreKind::Memory => {
                let store = match &config.seed_path {
                    Some(path) => MemoryStore::load(path)?,
                    None => {
                        log::warn!("no seed_path configured, memory store starts empty");
                        MemoryStore::default()
                    }
                };
                Ok(Self::shared(Arc::new(store)))
            }
            StoreKind::Mysql => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    StoreError::Unavailable("database_url is required for the mysql store".into())
                })?;
                let store = MySqlStore::connect(url, config.max_connections).await?;
                Ok(Self::shared(Arc::new(store)))
            }
        }
    }
}
