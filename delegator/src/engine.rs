//! The delegator: ledger administration, committee and proposal sync, reads.
//!
//! Vote casting lives in [`crate::voting`]. Collaborators (the membership
//! oracle, the external proposal registry, the vote sink) are passed into each
//! call that needs them; the delegator itself only owns serializable state.

use crate::config::{AbsenteeMode, DelegatorConfig};
use crate::error::DelegatorError;
use crate::external::{ExternalProposalAttributes, ProposalAttribute};
use crate::ledger::{AlgoHourInput, HoursEntry, PeriodLedger, PeriodTotals};
use crate::proposal::{AccountVotes, Ballot, CommitteeSnapshot, Proposal, ProposalStatus};
use caucus_oracle::MembershipOracle;
use caucus_store::{commit_staged, AccountIds, AccountRegistry, StagedAccounts};
use caucus_types::{AccountId, CallContext, CommitteeId, Identity, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Delegator {
    pub(crate) admin: Identity,
    pub(crate) config: DelegatorConfig,
    pub(crate) accounts: AccountRegistry,
    pub(crate) ledger: PeriodLedger,
    pub(crate) committees: BTreeMap<CommitteeId, CommitteeSnapshot>,
    pub(crate) proposals: BTreeMap<ProposalId, Proposal>,
    pub(crate) votes: BTreeMap<(ProposalId, AccountId), Ballot>,
}

impl Delegator {
    pub fn new(admin: Identity, config: DelegatorConfig) -> Result<Self, DelegatorError> {
        config.validate()?;
        let ledger = PeriodLedger::new(config.period_length)?;
        Ok(Self {
            admin,
            config,
            accounts: AccountRegistry::new(),
            ledger,
            committees: BTreeMap::new(),
            proposals: BTreeMap::new(),
            votes: BTreeMap::new(),
        })
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    pub fn config(&self) -> &DelegatorConfig {
        &self.config
    }

    fn require_admin(&self, ctx: &CallContext) -> Result<(), DelegatorError> {
        ctx.require_admin(&self.admin, DelegatorError::Unauthorized)
    }

    // ── Settings ─────────────────────────────────────────────────────────

    /// Applies to proposals synced after the change.
    pub fn set_vote_submit_threshold(
        &mut self,
        ctx: &CallContext,
        threshold: u64,
    ) -> Result<(), DelegatorError> {
        self.require_admin(ctx)?;
        self.config.vote_submit_threshold = threshold;
        tracing::info!(threshold, "vote submit threshold set");
        Ok(())
    }

    pub fn set_absentee_mode(
        &mut self,
        ctx: &CallContext,
        mode: AbsenteeMode,
    ) -> Result<(), DelegatorError> {
        self.require_admin(ctx)?;
        self.config.absentee_mode = mode;
        tracing::info!(mode = %mode, "absentee mode set");
        Ok(())
    }

    // ── Algohour ledger ──────────────────────────────────────────────────

    /// Record hours for `period`. Identities without an account id get one.
    pub fn add_account_algo_hours(
        &mut self,
        ctx: &CallContext,
        period: u64,
        inputs: &[AlgoHourInput],
    ) -> Result<(), DelegatorError> {
        self.require_admin(ctx)?;
        self.ledger.ensure_period_start(period)?;

        let mut staged = StagedAccounts::new(&self.accounts);
        let mut entries = Vec::with_capacity(inputs.len());
        for input in inputs {
            entries.push(HoursEntry {
                identity: input.identity,
                account_id: staged.get_or_stage(&input.identity)?,
                hours: input.hours,
            });
        }
        let created = staged.into_created();

        // the ledger validates the whole batch before writing
        let total = self.ledger.add_hours(period, &entries)?;
        commit_staged(&mut self.accounts, &created)?;
        tracing::info!(
            period,
            count = inputs.len(),
            new_accounts = created.len(),
            total_hours = total,
            "algohours added"
        );
        Ok(())
    }

    /// Remove hours previously recorded for `period`; amounts must match exactly.
    pub fn remove_account_algo_hours(
        &mut self,
        ctx: &CallContext,
        period: u64,
        inputs: &[AlgoHourInput],
    ) -> Result<(), DelegatorError> {
        self.require_admin(ctx)?;
        self.ledger.ensure_period_start(period)?;
        let entries = inputs
            .iter()
            .map(|input| -> Result<HoursEntry, DelegatorError> {
                Ok(HoursEntry {
                    identity: input.identity,
                    account_id: self.accounts.must_get_id(&input.identity)?,
                    hours: input.hours,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total = self.ledger.remove_hours(period, &entries)?;
        tracing::info!(period, count = inputs.len(), total_hours = total, "algohours removed");
        Ok(())
    }

    /// Attest that `period`'s hours are complete, or withdraw the attestation.
    pub fn update_algo_hour_period_finality(
        &mut self,
        ctx: &CallContext,
        period: u64,
        total_hours: u64,
        is_final: bool,
    ) -> Result<(), DelegatorError> {
        self.require_admin(ctx)?;
        self.ledger.set_finality(period, total_hours, is_final)?;
        tracing::info!(period, total_hours, is_final, "period finality updated");
        Ok(())
    }

    // ── Sync ─────────────────────────────────────────────────────────────

    /// Snapshot a complete committee and the weight of the identities delegated to us.
    pub fn sync_committee_metadata(
        &mut self,
        ctx: &CallContext,
        oracle: &dyn MembershipOracle,
        committee_id: &CommitteeId,
        delegated: &[Identity],
    ) -> Result<CommitteeSnapshot, DelegatorError> {
        self.require_admin(ctx)?;
        if self.committees.contains_key(committee_id) {
            return Err(DelegatorError::CommitteeExists(*committee_id));
        }
        let metadata = oracle.committee_metadata(committee_id, true)?;

        let mut staged = StagedAccounts::new(&self.accounts);
        let mut seen = HashSet::with_capacity(delegated.len());
        let mut delegated_accounts = Vec::with_capacity(delegated.len());
        let mut ext_delegated_votes = 0u64;
        for identity in delegated {
            if !seen.insert(*identity) {
                return Err(DelegatorError::DuplicateAccount(*identity));
            }
            let account_id = staged.get_or_stage(identity)?;
            let votes = oracle.voting_power(committee_id, identity)?;
            if votes == 0 {
                return Err(DelegatorError::NoVotingPower(*identity));
            }
            ext_delegated_votes += u64::from(votes);
            delegated_accounts.push(AccountVotes { account_id, votes });
        }
        let created = staged.into_created();

        let snapshot = CommitteeSnapshot {
            committee_id: *committee_id,
            period_start: metadata.period_start,
            period_end: metadata.period_end,
            ext_delegated_votes,
            delegated_accounts,
        };
        commit_staged(&mut self.accounts, &created)?;
        self.committees.insert(*committee_id, snapshot.clone());

        tracing::info!(
            committee = %committee_id,
            delegated = delegated.len(),
            ext_delegated_votes,
            "committee synced"
        );
        Ok(snapshot)
    }

    /// Start tracking an external proposal of a synced committee.
    ///
    /// The proposal must come from the registry the oracle points at, and every
    /// period its committee covers must be final.
    pub fn sync_proposal_metadata(
        &mut self,
        ctx: &CallContext,
        oracle: &dyn MembershipOracle,
        registry: &dyn ExternalProposalAttributes,
        proposal_id: ProposalId,
    ) -> Result<Proposal, DelegatorError> {
        self.require_admin(ctx)?;
        if self.proposals.contains_key(&proposal_id) {
            return Err(DelegatorError::ProposalExists(proposal_id));
        }

        let expected = oracle
            .registry_escrow()
            .ok_or(DelegatorError::RegistryMissing)?;
        let creator = registry.creator(proposal_id);
        if creator != Some(expected) {
            return Err(DelegatorError::InvalidCreator { creator, expected });
        }

        let missing = |attribute| DelegatorError::ProposalAttributeMissing {
            proposal: proposal_id,
            attribute,
        };
        let committee_id = registry
            .committee_id(proposal_id)
            .ok_or_else(|| missing(ProposalAttribute::CommitteeId))?;
        let committee = self
            .committees
            .get(&committee_id)
            .ok_or(DelegatorError::CommitteeNotExists(committee_id))?;
        let int_total_hours = self.ledger.finalized_total(
            u64::from(committee.period_start),
            u64::from(committee.period_end),
        )?;

        let status = registry
            .status(proposal_id)
            .ok_or_else(|| missing(ProposalAttribute::Status))?;
        let vote_open = registry
            .vote_open_ts(proposal_id)
            .ok_or_else(|| missing(ProposalAttribute::VoteOpenTimestamp))?;
        let duration = registry
            .voting_duration(proposal_id)
            .ok_or_else(|| missing(ProposalAttribute::VotingDuration))?;
        if !status.accepts_votes(vote_open, ctx.now) {
            return Err(DelegatorError::InvalidExternalStatus(status));
        }

        let threshold = self.config.vote_submit_threshold;
        let window_error = DelegatorError::InvalidVoteWindow {
            vote_open,
            duration,
            threshold,
        };
        let ext_vote_end = vote_open
            .checked_add_secs(duration)
            .ok_or_else(|| window_error.clone())?;
        let int_vote_end = ext_vote_end
            .checked_sub_secs(threshold)
            .ok_or(window_error)?;

        let proposal = Proposal {
            status: ProposalStatus::Wait,
            committee_id,
            ext_vote_start: vote_open,
            ext_vote_end,
            int_vote_end,
            ext_total_voting_power: committee.ext_delegated_votes,
            ext_accounts_pending_votes: committee.delegated_accounts.clone(),
            ext_accounts_voted: Vec::new(),
            int_total_hours,
            int_voted_hours: 0,
            int_votes: Ballot::default(),
        };
        self.proposals.insert(proposal_id, proposal.clone());

        tracing::info!(
            proposal = %proposal_id,
            committee = %committee_id,
            external_status = %status,
            int_total_hours,
            ext_vote_end = %ext_vote_end,
            int_vote_end = %int_vote_end,
            "proposal synced"
        );
        Ok(proposal)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn period_totals(&self, period: u64) -> Result<PeriodTotals, DelegatorError> {
        self.ledger.totals(period)
    }

    /// Hours of `identity` in `period`; zero for unknown identities.
    pub fn account_hours(&self, period: u64, identity: &Identity) -> Result<u64, DelegatorError> {
        match self.accounts.lookup(identity) {
            Some(account) => self.ledger.hours(period, account),
            None => self.ledger.totals(period).map(|_| 0),
        }
    }

    /// Hours of `identity` over `[start, end)`; zero for unknown identities.
    pub fn aggregated_account_hours(
        &self,
        start: u64,
        end: u64,
        identity: &Identity,
    ) -> Result<u64, DelegatorError> {
        match self.accounts.lookup(identity) {
            Some(account) => self.ledger.aggregated_hours(start, end, account),
            None => self.ledger.periods(start, end).map(|_| 0),
        }
    }

    pub fn account_id(&self, identity: &Identity) -> AccountId {
        self.accounts.get_id_if_exists(identity)
    }

    pub fn committee_snapshot(&self, committee_id: &CommitteeId) -> Option<&CommitteeSnapshot> {
        self.committees.get(committee_id)
    }

    pub fn committee_snapshots_batch(
        &self,
        committee_ids: &[CommitteeId],
    ) -> Vec<Option<CommitteeSnapshot>> {
        committee_ids
            .iter()
            .map(|id| self.committees.get(id).cloned())
            .collect()
    }

    pub fn proposal(&self, proposal_id: ProposalId) -> Option<&Proposal> {
        self.proposals.get(&proposal_id)
    }

    pub fn proposals_batch(&self, proposal_ids: &[ProposalId]) -> Vec<Option<Proposal>> {
        proposal_ids
            .iter()
            .map(|id| self.proposals.get(id).cloned())
            .collect()
    }

    /// The internal ballot `identity` cast on a proposal, if any.
    pub fn vote_record(&self, proposal_id: ProposalId, identity: &Identity) -> Option<Ballot> {
        let account = self.accounts.lookup(identity)?;
        self.votes.get(&(proposal_id, account)).copied()
    }

    // ── Snapshots ────────────────────────────────────────────────────────

    pub fn save_state(&self) -> Result<Vec<u8>, DelegatorError> {
        bincode::serialize(self).map_err(|e| DelegatorError::Snapshot(e.to_string()))
    }

    pub fn load_state(bytes: &[u8]) -> Result<Self, DelegatorError> {
        let delegator: Self =
            bincode::deserialize(bytes).map_err(|e| DelegatorError::Snapshot(e.to_string()))?;
        delegator.config.validate()?;
        let ledger_length = delegator.ledger.period_length();
        if ledger_length != delegator.config.period_length {
            return Err(DelegatorError::Snapshot(format!(
                "ledger period length {ledger_length} disagrees with configured {}",
                delegator.config.period_length
            )));
        }
        tracing::info!(
            committees = delegator.committees.len(),
            proposals = delegator.proposals.len(),
            "delegator state loaded"
        );
        Ok(delegator)
    }
}
