//! Interfaces to the external proposal registry.
//!
//! The delegator reads proposal attributes from the registry and writes its
//! scaled votes back through a sink. Both are injected per call.

use crate::error::DelegatorError;
use caucus_types::{CommitteeId, Identity, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an external proposal, by its numeric registry code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalStatus {
    Empty,
    Draft,
    Submitted,
    Voting,
    Approved,
    Rejected,
    Reviewed,
    Funded,
    Blocked,
    Other(u64),
}

impl ExternalStatus {
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => Self::Empty,
            10 => Self::Draft,
            20 => Self::Submitted,
            25 => Self::Voting,
            30 => Self::Approved,
            40 => Self::Rejected,
            45 => Self::Reviewed,
            50 => Self::Funded,
            60 => Self::Blocked,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> u64 {
        match self {
            Self::Empty => 0,
            Self::Draft => 10,
            Self::Submitted => 20,
            Self::Voting => 25,
            Self::Approved => 30,
            Self::Rejected => 40,
            Self::Reviewed => 45,
            Self::Funded => 50,
            Self::Blocked => 60,
            Self::Other(code) => *code,
        }
    }

    /// Whether a delegator may start tracking the proposal at `now`.
    ///
    /// A submitted proposal qualifies once its vote has opened even if the
    /// registry has not flipped it to `Voting` yet.
    pub fn accepts_votes(&self, vote_open: Timestamp, now: Timestamp) -> bool {
        match self {
            Self::Voting => true,
            Self::Submitted => vote_open <= now,
            _ => false,
        }
    }
}

impl fmt::Display for ExternalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "unknown({code})"),
            known => write!(f, "{known:?}({})", known.code()),
        }
    }
}

/// Proposal attributes the delegator reads. Each may be independently absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalAttribute {
    Status,
    CommitteeId,
    VoteOpenTimestamp,
    VotingDuration,
}

impl ProposalAttribute {
    pub(crate) fn missing_code(&self) -> &'static str {
        match self {
            Self::Status => "ERR:XGSM",
            Self::CommitteeId => "ERR:XGPM",
            Self::VoteOpenTimestamp => "ERR:XGVOM",
            Self::VotingDuration => "ERR:XGVDM",
        }
    }
}

impl fmt::Display for ProposalAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Status => "status",
            Self::CommitteeId => "committee id",
            Self::VoteOpenTimestamp => "vote open timestamp",
            Self::VotingDuration => "voting duration",
        };
        f.write_str(name)
    }
}

/// Read access to external proposals, keyed by proposal id.
pub trait ExternalProposalAttributes {
    /// Identity that created the proposal.
    fn creator(&self, proposal: ProposalId) -> Option<Identity>;

    fn status(&self, proposal: ProposalId) -> Option<ExternalStatus>;

    fn committee_id(&self, proposal: ProposalId) -> Option<CommitteeId>;

    fn vote_open_ts(&self, proposal: ProposalId) -> Option<Timestamp>;

    /// Voting duration in seconds.
    fn voting_duration(&self, proposal: ProposalId) -> Option<u64>;
}

/// One delegated identity's external vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalVote {
    pub identity: Identity,
    pub approvals: u64,
    pub rejections: u64,
}

/// Write access to the external registry's vote intake.
pub trait ExternalVoteSink {
    /// Submit every vote of one proposal. Either all are accepted or none.
    fn submit_votes(
        &mut self,
        proposal: ProposalId,
        votes: &[ExternalVote],
    ) -> Result<(), DelegatorError>;
}
