//! Match Engine Module
//!
//! Runs a potential-match search: reads the requester's collection, fans out
//! one collection read per candidate and keeps the candidates with at least
//! one exchange. Also records matches once a user acts on a proposal.

use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::engine::data::Partition;
use crate::engine::entry::{MatchProposal, MatchRecord, User};
use crate::engine::matchlogic::Matcher;
use crate::error::{MatchError, StoreError};
use crate::metrics;
use crate::store::{CollectionStore, MatchRecorder, Stores, UserDirectory};

/// How candidates are narrowed down geographically
///
/// There is no distance computation: `PostalCode` only keeps candidates whose
/// postal code equals the requester's. The search radius stored with users
/// is never consulted. `None` searches every postal code.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locality {
    None,
    #[default]
    PostalCode,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub max_concurrent_reads: usize,
    pub locality: Locality,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_concurrent_reads: 8,
            locality: Locality::default(),
        }
    }
}

/// Computes trade proposals for a user in an album
#[derive(Clone)]
pub struct MatchFinder {
    collections: Arc<dyn CollectionStore>,
    directory: Arc<dyn UserDirectory>,
    options: MatchOptions,
}

impl MatchFinder {
    pub fn new(
        collections: Arc<dyn CollectionStore>,
        directory: Arc<dyn UserDirectory>,
        options: MatchOptions,
    ) -> Self {
        Self {
            collections,
            directory,
            options,
        }
    }

    pub fn from_stores(stores: &Stores, options: MatchOptions) -> Self {
        Self::new(stores.collections.clone(), stores.directory.clone(), options)
    }

    /// Lists every other user of `album_id` with whom a duplicate-for-need
    /// exchange is possible, sorted by user id
    ///
    /// An empty list means nobody qualifies, including when the requester
    /// does not exist. Failing to read the requester's collection or to
    /// enumerate candidates is `MatchError::Unavailable`; a failed read for a
    /// single candidate only drops that candidate.
    pub async fn find_potential_matches(
        &self,
        user_id: i64,
        album_id: i64,
    ) -> Result<Vec<MatchProposal>, MatchError> {
        let entries = self
            .collections
            .get_collection_entries(user_id, album_id)
            .await
            .map_err(|e| unavailable("requester collection", user_id, album_id, e))?;
        let mine = Partition::from_entries(&entries);
        if mine.is_empty() {
            log::debug!("user {} has no entries for album {}", user_id, album_id);
        }

        let candidates = self.candidates(user_id, album_id).await?;

        let matcher = Matcher::new(mine);
        if matcher.is_idle() || candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut proposals = self.evaluate(Arc::new(matcher), candidates, album_id).await;
        proposals.sort_by_key(|p| p.user.id);

        log::info!(
            "user {} album {}: {} potential matches",
            user_id,
            album_id,
            proposals.len()
        );
        Ok(proposals)
    }

    async fn candidates(&self, user_id: i64, album_id: i64) -> Result<Vec<User>, MatchError> {
        let mut candidates = self
            .directory
            .get_users_with_selected_album(album_id, user_id)
            .await
            .map_err(|e| unavailable("candidate enumeration", user_id, album_id, e))?;
        candidates.retain(|c| c.id != user_id);

        if self.options.locality == Locality::PostalCode {
            let postal_code = self
                .directory
                .find_user(user_id)
                .await
                .map_err(|e| unavailable("requester lookup", user_id, album_id, e))?
                .and_then(|u| u.postal_code);
            // A requester without a postal code has no locality to share
            candidates.retain(|c| postal_code.is_some() && c.postal_code == postal_code);
        }

        Ok(candidates)
    }

    async fn evaluate(
        &self,
        matcher: Arc<Matcher>,
        candidates: Vec<User>,
        album_id: i64,
    ) -> Vec<MatchProposal> {
        let permits = Arc::new(Semaphore::new(self.options.max_concurrent_reads.max(1)));
        let mut tasks = JoinSet::new();

        for candidate in candidates {
            let collections = self.collections.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let entries = collections
                    .get_collection_entries(candidate.id, album_id)
                    .await;
                (candidate, entries)
            });
        }

        let mut proposals = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((candidate, Ok(entries))) => {
                    let theirs = Partition::from_entries(&entries);
                    let exchanges = matcher.exchanges_with(&theirs);
                    if exchanges.is_empty() {
                        continue;
                    }
                    let mine = matcher.requester();
                    proposals.push(MatchProposal {
                        user: candidate.profile(),
                        my_needs: mine.needs.clone(),
                        my_duplicates: mine.duplicates.clone(),
                        their_needs: theirs.needs,
                        their_duplicates: theirs.duplicates,
                        possible_exchanges: exchanges,
                    });
                }
                Ok((candidate, Err(e))) => {
                    metrics::CANDIDATE_READ_FAILURES.inc();
                    log::warn!(
                        "skipping candidate {} for album {}: {}",
                        candidate.id,
                        album_id,
                        e
                    );
                }
                Err(e) => {
                    metrics::CANDIDATE_READ_FAILURES.inc();
                    log::error!("candidate evaluation task failed: {}", e);
                }
            }
        }

        proposals
    }
}

fn unavailable(step: &str, user_id: i64, album_id: i64, err: StoreError) -> MatchError {
    log::error!(
        "{} failed for user {} album {}: {}",
        step,
        user_id,
        album_id,
        err
    );
    MatchError::Unavailable(err)
}

/// Persists matches users decided to act on
#[derive(Clone)]
pub struct MatchBook {
    recorder: Arc<dyn MatchRecorder>,
}

impl MatchBook {
    pub fn new(recorder: Arc<dyn MatchRecorder>) -> Self {
        Self { recorder }
    }

    pub async fn record_match(
        &self,
        user_id: i64,
        other_user_id: i64,
        album_id: i64,
    ) -> Result<MatchRecord, MatchError> {
        if user_id == other_user_id {
            return Err(MatchError::InvalidRequest(
                "a user cannot match with themselves".to_string(),
            ));
        }
        let record = MatchRecord::pending(user_id, other_user_id, album_id);
        self.recorder
            .insert_match(&record)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(what) => MatchError::NotFound(what),
                e => MatchError::Store(e),
            })?;
        log::info!(
            "recorded match {} between {} and {} in album {}",
            record.id,
            user_id,
            other_user_id,
            album_id
        );
        Ok(record)
    }
}
