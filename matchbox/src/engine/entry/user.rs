//! User Types
//!
//! Only the fields the matching logic needs are modelled here.

use serde::{Deserialize, Serialize};

/// A user as seen by the match service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// The album the user is currently collecting
    #[serde(default)]
    pub selected_album_id: Option<i64>,
    /// Crude locality key, compared by equality only
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Stored with the profile but never applied when matching
    #[serde(default)]
    pub search_radius_km: Option<i32>,
}

/// Fields of a candidate that are safe to show to the requesting user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i64,
    pub username: String,
    pub postal_code: Option<String>,
}

impl User {
    pub fn profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            username: self.username.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}
