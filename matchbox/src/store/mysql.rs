//! MySQL-backed stores
//!
//! Expects the tables from `sql/schema.sql`. Queries are built at runtime so
//! the crate compiles without a live database.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use super::{CollectionStore, MatchRecorder, UserDirectory};
use crate::engine::entry::{CollectionEntry, MatchRecord, User};
use crate::error::StoreError;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_ENTRIES: &str = "SELECT s.number AS number, us.status AS status \
     FROM user_stickers us \
     JOIN stickers s ON s.id = us.sticker_id \
     WHERE us.user_id = ? AND s.album_id = ? \
     ORDER BY s.id";

const SELECT_USERS_WITH_ALBUM: &str = "SELECT id, username, selected_album_id, postal_code, search_radius_km \
     FROM users \
     WHERE selected_album_id = ? AND id <> ? \
     ORDER BY id";

const SELECT_USER: &str = "SELECT id, username, selected_album_id, postal_code, search_radius_km \
     FROM users WHERE id = ?";

const INSERT_MATCH: &str = "INSERT INTO matches \
     (id, user_id, other_user_id, album_id, status, created_at) \
     VALUES (?, ?, ?, ?, ?, ?)";

#[derive(sqlx::FromRow)]
struct EntryRow {
    number: String,
    status: String,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    selected_album_id: Option<i64>,
    postal_code: Option<String>,
    search_radius_km: Option<i32>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            selected_album_id: row.selected_album_id,
            postal_code: row.postal_code,
            search_radius_km: row.search_radius_km,
        }
    }
}

impl TryFrom<EntryRow> for CollectionEntry {
    type Error = StoreError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(CollectionEntry {
            status: row.status.parse()?,
            sticker_number: row.number,
        })
    }
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;
        log::info!("connected to mysql, pool size {}", max_connections);
        Ok(Self { pool })
    }
}

#[async_trait]
impl CollectionStore for MySqlStore {
    async fn get_collection_entries(
        &self,
        user_id: i64,
        album_id: i64,
    ) -> Result<Vec<CollectionEntry>, StoreError> {
        let rows: Vec<EntryRow> = sqlx::query_as(SELECT_ENTRIES)
            .bind(user_id)
            .bind(album_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(CollectionEntry::try_from).collect()
    }
}

#[async_trait]
impl UserDirectory for MySqlStore {
    async fn get_users_with_selected_album(
        &self,
        album_id: i64,
        excluding_user_id: i64,
    ) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(SELECT_USERS_WITH_ALBUM)
            .bind(album_id)
            .bind(excluding_user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(SELECT_USER)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl MatchRecorder for MySqlStore {
    async fn insert_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        sqlx::query(INSERT_MATCH)
            .bind(&record.id)
            .bind(record.user_id)
            .bind(record.other_user_id)
            .bind(record.album_id)
            .bind(&record.status)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    StoreError::NotFound(format!(
                        "user {} or {} or album {}",
                        record.user_id, record.other_user_id, record.album_id
                    ))
                }
                e => StoreError::Database(e),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entry::StickerStatus;

    #[test]
    fn test_entry_row_conversion() {
        let row = EntryRow {
            number: "17".to_string(),
            status: "double".to_string(),
        };
        let entry = CollectionEntry::try_from(row).unwrap();
        assert_eq!(entry, CollectionEntry::new("17", StickerStatus::Duplicate));
    }

    #[test]
    fn test_entry_row_with_bad_status() {
        let row = EntryRow {
            number: "17".to_string(),
            status: "triple".to_string(),
        };
        assert!(matches!(
            CollectionEntry::try_from(row),
            Err(StoreError::Malformed(_))
        ));
    }
}
