//! Error types shared by the stores, the engine and the HTTP layer.

use thiserror::Error;

/// Failure of a collaborator read or write
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("malformed data: {0}")]
    Malformed(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{0} not found")]
    NotFound(String),
}

/// Outcome of a match-service operation that did not succeed
///
/// `Unavailable` is deliberately distinct from an empty result so callers can
/// tell "nobody to trade with" from "couldn't check".
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("match computation unavailable")]
    Unavailable(#[source] StoreError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A referenced user or album does not exist
    #[error("{0} not found")]
    NotFound(String),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}
