//! Internal voting and external vote submission.

use crate::engine::Delegator;
use crate::error::DelegatorError;
use crate::external::{ExternalVote, ExternalVoteSink};
use crate::proposal::{Ballot, ProposalStatus};
use crate::tally;
use caucus_store::AccountIds;
use caucus_types::{CallContext, Identity, ProposalId};

impl Delegator {
    /// Cast or replace `voter`'s internal ballot.
    ///
    /// The ballot must spend exactly the voter's hours over the committee's
    /// periods. A repeated vote first withdraws the previous ballot.
    pub fn vote_internal(
        &mut self,
        ctx: &CallContext,
        proposal_id: ProposalId,
        voter: &Identity,
        ballot: Ballot,
    ) -> Result<(), DelegatorError> {
        ctx.require_sender(voter, DelegatorError::Unauthorized)?;
        let proposal = self
            .proposals
            .get(&proposal_id)
            .ok_or(DelegatorError::ProposalNotExists(proposal_id))?;
        match proposal.status {
            ProposalStatus::Canc => return Err(DelegatorError::ProposalCancelled(proposal_id)),
            ProposalStatus::Votd => {
                return Err(DelegatorError::InvalidStatus {
                    proposal: proposal_id,
                    status: ProposalStatus::Votd,
                    required: ProposalStatus::Vote,
                })
            }
            ProposalStatus::Wait | ProposalStatus::Vote => {}
        }
        let committee = self
            .committees
            .get(&proposal.committee_id)
            .ok_or(DelegatorError::CommitteeNotExists(proposal.committee_id))?;
        if ctx.now < proposal.ext_vote_start {
            return Err(DelegatorError::TooEarly {
                now: ctx.now,
                start: proposal.ext_vote_start,
            });
        }
        if ctx.now >= proposal.int_vote_end {
            return Err(DelegatorError::TooLate {
                now: ctx.now,
                end: proposal.int_vote_end,
            });
        }

        let account = self.accounts.lookup(voter);
        let voting_power = match account {
            Some(account) => self.ledger.aggregated_hours(
                u64::from(committee.period_start),
                u64::from(committee.period_end),
                account,
            )?,
            None => 0,
        };
        let account = match account {
            Some(account) if voting_power > 0 => account,
            _ => return Err(DelegatorError::NoVotingPower(*voter)),
        };
        let cast = ballot
            .total()
            .ok_or(DelegatorError::TallyOverflow(proposal_id))?;
        if cast != voting_power {
            return Err(DelegatorError::IncorrectVotes { cast, voting_power });
        }

        let overflow = || DelegatorError::TallyOverflow(proposal_id);
        let mut votes = proposal.int_votes;
        let mut voted_hours = proposal.int_voted_hours;
        let previous = self.votes.get(&(proposal_id, account)).copied();
        if let Some(previous) = previous {
            let previous_cast = previous.total().ok_or_else(overflow)?;
            votes = votes.checked_sub(&previous).ok_or_else(overflow)?;
            voted_hours = voted_hours
                .checked_sub(previous_cast)
                .ok_or_else(overflow)?;
        }
        votes = votes.checked_add(&ballot).ok_or_else(overflow)?;
        voted_hours = voted_hours.checked_add(cast).ok_or_else(overflow)?;

        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .ok_or(DelegatorError::ProposalNotExists(proposal_id))?;
        proposal.int_votes = votes;
        proposal.int_voted_hours = voted_hours;
        proposal.status = ProposalStatus::Vote;
        self.votes.insert((proposal_id, account), ballot);

        tracing::debug!(
            proposal = %proposal_id,
            voter = %voter,
            hours = cast,
            replaced = previous.is_some(),
            voted_hours,
            "internal vote cast"
        );
        Ok(())
    }

    /// Submit the scaled external votes of every delegated account and close the proposal.
    ///
    /// `identities` must list the pending delegated accounts in their synced order.
    /// Returns the submitted votes.
    pub fn vote_external(
        &mut self,
        ctx: &CallContext,
        sink: &mut dyn ExternalVoteSink,
        proposal_id: ProposalId,
        identities: &[Identity],
    ) -> Result<Vec<ExternalVote>, DelegatorError> {
        let proposal = self
            .proposals
            .get(&proposal_id)
            .ok_or(DelegatorError::ProposalNotExists(proposal_id))?;
        if proposal.status != ProposalStatus::Vote {
            return Err(DelegatorError::InvalidStatus {
                proposal: proposal_id,
                status: proposal.status,
                required: ProposalStatus::Vote,
            });
        }
        if ctx.now < proposal.ext_vote_start {
            return Err(DelegatorError::TooEarly {
                now: ctx.now,
                start: proposal.ext_vote_start,
            });
        }
        if ctx.now >= proposal.ext_vote_end {
            return Err(DelegatorError::TooLate {
                now: ctx.now,
                end: proposal.ext_vote_end,
            });
        }
        if proposal.int_voted_hours == 0 {
            return Err(DelegatorError::NoVotes(proposal_id));
        }
        let pending = &proposal.ext_accounts_pending_votes;
        if identities.len() != pending.len() {
            return Err(DelegatorError::AccountCountMismatch {
                provided: identities.len(),
                pending: pending.len(),
            });
        }

        let allocation = tally::allocate(
            &proposal.int_votes,
            proposal.int_voted_hours,
            proposal.int_total_hours,
            proposal.ext_total_voting_power,
            self.config.absentee_mode,
        )
        .ok_or(DelegatorError::NoVotes(proposal_id))?;

        let mut votes = Vec::with_capacity(identities.len());
        for (index, (identity, entry)) in identities.iter().zip(pending).enumerate() {
            let account_id = self.accounts.must_get_id(identity)?;
            if account_id != entry.account_id {
                return Err(DelegatorError::AccountIdMismatch {
                    index,
                    expected: entry.account_id,
                    actual: account_id,
                });
            }
            let (approvals, rejections) = allocation.share(entry, proposal.ext_total_voting_power);
            votes.push(ExternalVote {
                identity: *identity,
                approvals,
                rejections,
            });
        }

        sink.submit_votes(proposal_id, &votes)?;

        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .ok_or(DelegatorError::ProposalNotExists(proposal_id))?;
        let submitted = std::mem::take(&mut proposal.ext_accounts_pending_votes);
        proposal.ext_accounts_voted.extend(submitted);
        proposal.status = ProposalStatus::Votd;

        if allocation.boycott {
            tracing::warn!(
                proposal = %proposal_id,
                boycott_hours = proposal.int_votes.boycott,
                total_hours = proposal.int_total_hours,
                "boycott majority, casting neutralizing external votes"
            );
        }
        tracing::info!(
            proposal = %proposal_id,
            accounts = votes.len(),
            mode = %self.config.absentee_mode,
            total_approvals = allocation.total_approvals,
            total_rejections = allocation.total_rejections,
            "external votes submitted"
        );
        Ok(votes)
    }
}
