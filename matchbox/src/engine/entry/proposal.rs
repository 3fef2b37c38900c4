//! Match Proposal Types
//!
//! A proposal is the transient output of a match search: one qualifying
//! candidate plus the exchanges found with them. Proposals are never
//! persisted.

use serde::{Deserialize, Serialize};

use super::PublicProfile;

/// One proposed sticker-for-sticker exchange
///
/// `their_need` is the sticker the candidate holds as a duplicate and the
/// requester needs; `my_double` is a duplicate the requester can give away.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub my_double: String,
    pub their_need: String,
}

/// A candidate with whom at least one exchange is possible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchProposal {
    pub user: PublicProfile,
    pub my_needs: Vec<String>,
    pub my_duplicates: Vec<String>,
    pub their_needs: Vec<String>,
    pub their_duplicates: Vec<String>,
    pub possible_exchanges: Vec<Exchange>,
}
