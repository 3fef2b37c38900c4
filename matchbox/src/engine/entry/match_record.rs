//! Match Record Types
//!
//! A match record is written once a user acts on a proposal.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub const MATCH_STATUS_PENDING: &str = "pending";

/// A persisted trade intent between two users of the same album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Unique identifier for the match
    pub id: String,
    /// User who acted on the proposal
    pub user_id: i64,
    /// Candidate the proposal was about
    pub other_user_id: i64,
    /// Album the trade happens in
    pub album_id: i64,
    pub status: String,
    /// Unix timestamp in seconds
    pub created_at: i64,
}

impl MatchRecord {
    /// Creates a pending match with a fresh identifier
    pub fn pending(user_id: i64, other_user_id: i64, album_id: i64) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            other_user_id,
            album_id,
            status: MATCH_STATUS_PENDING.to_string(),
            created_at,
        }
    }
}
