//! Album and Sticker Types
//!
//! Albums and stickers are owned by the catalogue administrators. The match
//! service only reads them, and only the in-memory store keeps them around;
//! the MySQL store joins against its own tables.

use serde::{Deserialize, Serialize};

/// A named, dated collection containing a fixed set of stickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub year: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// An individually numbered collectible belonging to exactly one album
///
/// Numbers are only unique enough within an album for display, so two
/// stickers of the same album may share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sticker {
    pub id: i64,
    pub album_id: i64,
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub team: Option<String>,
}
