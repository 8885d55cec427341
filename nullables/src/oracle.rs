//! Nullable membership oracle: canned committees and voting power.

use caucus_oracle::{CommitteeMetadata, MembershipOracle, OracleError};
use caucus_store::StoreError;
use caucus_types::{CommitteeId, Identity};
use std::collections::HashMap;

/// An in-memory [`MembershipOracle`] answering from configured tables.
#[derive(Default)]
pub struct NullOracle {
    committees: HashMap<CommitteeId, CommitteeMetadata>,
    powers: HashMap<(CommitteeId, Identity), u32>,
    escrow: Option<Identity>,
}

impl NullOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete committee over `[period_start, period_end)` holding `members`.
    pub fn with_committee(
        mut self,
        committee_id: CommitteeId,
        period_start: u32,
        period_end: u32,
        members: &[(Identity, u32)],
    ) -> Self {
        let total_votes: u32 = members.iter().map(|(_, votes)| votes).sum();
        let numeric_id = self.committees.len() as u16;
        self.committees.insert(
            committee_id,
            CommitteeMetadata {
                committee_id,
                period_start,
                period_end,
                total_members: members.len() as u32,
                total_votes,
                ingested_votes: total_votes,
                numeric_id,
                registry_ref: 0,
            },
        );
        for (identity, votes) in members {
            self.powers.insert((committee_id, *identity), *votes);
        }
        self
    }

    /// Override stored metadata, e.g. to mark a committee incomplete.
    pub fn with_metadata(mut self, metadata: CommitteeMetadata) -> Self {
        self.committees.insert(metadata.committee_id, metadata);
        self
    }

    pub fn with_escrow(mut self, escrow: Identity) -> Self {
        self.escrow = Some(escrow);
        self
    }
}

impl MembershipOracle for NullOracle {
    fn committee_metadata(
        &self,
        committee_id: &CommitteeId,
        must_be_complete: bool,
    ) -> Result<CommitteeMetadata, OracleError> {
        let metadata = self
            .committees
            .get(committee_id)
            .ok_or(OracleError::CommitteeNotExists(*committee_id))?;
        if must_be_complete && !metadata.is_complete() {
            return Err(OracleError::CommitteeIncomplete {
                ingested_votes: metadata.ingested_votes,
                total_votes: metadata.total_votes,
            });
        }
        Ok(metadata.clone())
    }

    fn voting_power(
        &self,
        committee_id: &CommitteeId,
        identity: &Identity,
    ) -> Result<u32, OracleError> {
        if !self.committees.contains_key(committee_id) {
            return Err(OracleError::CommitteeNotExists(*committee_id));
        }
        self.powers
            .get(&(*committee_id, *identity))
            .copied()
            .ok_or_else(|| StoreError::AccountNotExists(*identity).into())
    }

    fn registry_escrow(&self) -> Option<Identity> {
        self.escrow
    }
}
