//! Committee snapshots, proposals and ballots.

use caucus_types::{AccountId, CommitteeId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal lifecycle of a tracked proposal.
///
/// `Wait → Vote` on the first internal vote, `Vote → Votd` once external votes
/// are submitted. `Canc` is terminal and refuses internal votes; no operation
/// currently moves a proposal into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Wait,
    Vote,
    Votd,
    Canc,
}

impl ProposalStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Wait => "WAIT",
            Self::Vote => "VOTE",
            Self::Votd => "VOTD",
            Self::Canc => "CANC",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An account with its external vote weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountVotes {
    pub account_id: AccountId,
    pub votes: u32,
}

/// Local, immutable copy of a committee with the delegated share of its votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeSnapshot {
    pub committee_id: CommitteeId,
    pub period_start: u32,
    pub period_end: u32,
    /// Sum of `delegated_accounts` votes.
    pub ext_delegated_votes: u64,
    /// Delegated accounts in the order given at sync.
    pub delegated_accounts: Vec<AccountVotes>,
}

/// Hours per option. Used both for a voter's ballot and a proposal's running tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub yes: u64,
    pub no: u64,
    pub abstain: u64,
    pub boycott: u64,
}

impl Ballot {
    pub fn new(yes: u64, no: u64, abstain: u64, boycott: u64) -> Self {
        Self {
            yes,
            no,
            abstain,
            boycott,
        }
    }

    /// Sum over all options, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.yes
            .checked_add(self.no)?
            .checked_add(self.abstain)?
            .checked_add(self.boycott)
    }

    pub fn checked_add(&self, other: &Ballot) -> Option<Ballot> {
        Some(Ballot {
            yes: self.yes.checked_add(other.yes)?,
            no: self.no.checked_add(other.no)?,
            abstain: self.abstain.checked_add(other.abstain)?,
            boycott: self.boycott.checked_add(other.boycott)?,
        })
    }

    pub fn checked_sub(&self, other: &Ballot) -> Option<Ballot> {
        Some(Ballot {
            yes: self.yes.checked_sub(other.yes)?,
            no: self.no.checked_sub(other.no)?,
            abstain: self.abstain.checked_sub(other.abstain)?,
            boycott: self.boycott.checked_sub(other.boycott)?,
        })
    }
}

/// A tracked external proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub status: ProposalStatus,
    pub committee_id: CommitteeId,
    pub ext_vote_start: Timestamp,
    pub ext_vote_end: Timestamp,
    /// Internal votes close this early so external submission fits before `ext_vote_end`.
    pub int_vote_end: Timestamp,
    pub ext_total_voting_power: u64,
    pub ext_accounts_pending_votes: Vec<AccountVotes>,
    pub ext_accounts_voted: Vec<AccountVotes>,
    /// Finalized hours of every covered period.
    pub int_total_hours: u64,
    pub int_voted_hours: u64,
    pub int_votes: Ballot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ballot_total() {
        assert_eq!(Ballot::new(1, 2, 3, 4).total(), Some(10));
        assert_eq!(Ballot::new(u64::MAX, 1, 0, 0).total(), None);
        assert_eq!(Ballot::default().total(), Some(0));
    }

    #[test]
    fn test_ballot_add_sub() {
        let tally = Ballot::new(10, 5, 0, 1);
        let vote = Ballot::new(3, 0, 0, 1);
        let added = tally.checked_add(&vote).unwrap();
        assert_eq!(added, Ballot::new(13, 5, 0, 2));
        assert_eq!(added.checked_sub(&vote), Some(tally));
        assert_eq!(vote.checked_sub(&tally), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ProposalStatus::Wait.to_string(), "WAIT");
        assert_eq!(ProposalStatus::Votd.code(), "VOTD");
    }
}
