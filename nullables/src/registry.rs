//! Nullable proposal registry: external proposal attributes for testing.

use caucus_delegator::{ExternalProposalAttributes, ExternalStatus};
use caucus_types::{CommitteeId, Identity, ProposalId, Timestamp};
use std::collections::HashMap;

/// Attributes of one external proposal. Any of them may be left out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullProposal {
    pub creator: Option<Identity>,
    pub status: Option<ExternalStatus>,
    pub committee_id: Option<CommitteeId>,
    pub vote_open_ts: Option<Timestamp>,
    pub voting_duration: Option<u64>,
}

impl NullProposal {
    /// A proposal open for voting from `vote_open` for `duration` seconds.
    pub fn voting(
        creator: Identity,
        committee_id: CommitteeId,
        vote_open: Timestamp,
        duration: u64,
    ) -> Self {
        Self {
            creator: Some(creator),
            status: Some(ExternalStatus::Voting),
            committee_id: Some(committee_id),
            vote_open_ts: Some(vote_open),
            voting_duration: Some(duration),
        }
    }
}

/// An in-memory [`ExternalProposalAttributes`] keyed by proposal id.
#[derive(Default)]
pub struct NullProposalRegistry {
    proposals: HashMap<ProposalId, NullProposal>,
}

impl NullProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ProposalId, proposal: NullProposal) {
        self.proposals.insert(id, proposal);
    }

    pub fn set_status(&mut self, id: ProposalId, status: ExternalStatus) {
        self.proposals.entry(id).or_default().status = Some(status);
    }

    fn get(&self, id: ProposalId) -> Option<&NullProposal> {
        self.proposals.get(&id)
    }
}

impl ExternalProposalAttributes for NullProposalRegistry {
    fn creator(&self, proposal: ProposalId) -> Option<Identity> {
        self.get(proposal)?.creator
    }

    fn status(&self, proposal: ProposalId) -> Option<ExternalStatus> {
        self.get(proposal)?.status
    }

    fn committee_id(&self, proposal: ProposalId) -> Option<CommitteeId> {
        self.get(proposal)?.committee_id
    }

    fn vote_open_ts(&self, proposal: ProposalId) -> Option<Timestamp> {
        self.get(proposal)?.vote_open_ts
    }

    fn voting_duration(&self, proposal: ProposalId) -> Option<u64> {
        self.get(proposal)?.voting_duration
    }
}
