//! Committee metadata and member input types.

use crate::hints::OffsetHint;
use caucus_types::{AccountId, CommitteeId, Identity};
use serde::{Deserialize, Serialize};

/// Registered committee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMetadata {
    pub committee_id: CommitteeId,
    /// First covered period (inclusive).
    pub period_start: u32,
    /// End of the covered periods (exclusive).
    pub period_end: u32,
    pub total_members: u32,
    pub total_votes: u32,
    pub ingested_votes: u32,
    /// Dense id used by offset hints instead of the 32-byte committee id.
    pub numeric_id: u16,
    /// Reference to the external registry this committee was published for.
    pub registry_ref: u64,
}

impl CommitteeMetadata {
    /// All votes ingested. Member count is enforced separately at ingestion.
    pub fn is_complete(&self) -> bool {
        self.ingested_votes == self.total_votes
    }
}

/// A member to ingest: external identity and its vote weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInput {
    pub identity: Identity,
    pub votes: u32,
}

impl MemberInput {
    pub fn new(identity: Identity, votes: u32) -> Self {
        Self { identity, votes }
    }
}

/// An account as seen from outside the oracle.
///
/// `id` is `AccountId::UNASSIGNED` and `committee_offsets` empty for unknown identities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub committee_offsets: Vec<OffsetHint>,
}
