//! Committee registration and member ingestion.

use crate::committee::{CommitteeMetadata, MemberInput};
use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::hints::OffsetHintIndex;
use caucus_store::{
    commit_staged, AccountIds, AccountRegistry, PagedMemberStore, StagedAccounts, StoredMember,
};
use caucus_types::{AccountId, CallContext, CommitteeId, Identity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Member offsets are 16-bit, which bounds the size of a committee.
pub const MAX_COMMITTEE_MEMBERS: u32 = u16::MAX as u32 + 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct CommitteeEntry {
    pub(crate) metadata: CommitteeMetadata,
    pub(crate) members: PagedMemberStore,
}

/// The canonical committee oracle.
///
/// One admin registers committees and ingests their members; anyone may read.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitteeOracle {
    pub(crate) admin: Identity,
    pub(crate) config: OracleConfig,
    pub(crate) accounts: AccountRegistry,
    pub(crate) hints: OffsetHintIndex,
    pub(crate) committees: HashMap<CommitteeId, CommitteeEntry>,
    /// Next dense committee id. Never reused after unregistration.
    pub(crate) next_numeric_id: u32,
    /// Escrow identity of the external registry that creates proposals.
    pub(crate) registry_escrow: Option<Identity>,
}

impl CommitteeOracle {
    pub fn new(admin: Identity, config: OracleConfig) -> Self {
        Self {
            admin,
            config,
            accounts: AccountRegistry::new(),
            hints: OffsetHintIndex::new(),
            committees: HashMap::new(),
            next_numeric_id: 0,
            registry_escrow: None,
        }
    }

    pub fn admin(&self) -> &Identity {
        &self.admin
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Set the escrow identity of the external proposal registry.
    pub fn set_registry_escrow(
        &mut self,
        ctx: &CallContext,
        escrow: Identity,
    ) -> Result<(), OracleError> {
        ctx.require_admin(&self.admin, OracleError::Unauthorized)?;
        self.registry_escrow = Some(escrow);
        tracing::info!(escrow = %escrow, "registry escrow set");
        Ok(())
    }

    /// Register an empty committee.
    #[allow(clippy::too_many_arguments)]
    pub fn register_committee(
        &mut self,
        ctx: &CallContext,
        committee_id: CommitteeId,
        period_start: u32,
        period_end: u32,
        total_members: u32,
        total_votes: u32,
        registry_ref: u64,
    ) -> Result<CommitteeMetadata, OracleError> {
        ctx.require_admin(&self.admin, OracleError::Unauthorized)?;
        if self.committees.contains_key(&committee_id) {
            return Err(OracleError::CommitteeExists(committee_id));
        }
        if period_end <= period_start {
            return Err(OracleError::PeriodEndNotAfterStart {
                start: period_start,
                end: period_end,
            });
        }
        if total_members > MAX_COMMITTEE_MEMBERS {
            return Err(OracleError::TooManyMembers {
                total_members,
                max: MAX_COMMITTEE_MEMBERS,
            });
        }
        let numeric_id =
            u16::try_from(self.next_numeric_id).map_err(|_| OracleError::CommitteeIdsExhausted)?;
        let members = PagedMemberStore::for_members(self.config.page_capacity)?;

        let metadata = CommitteeMetadata {
            committee_id,
            period_start,
            period_end,
            total_members,
            total_votes,
            ingested_votes: 0,
            numeric_id,
            registry_ref,
        };
        self.committees.insert(
            committee_id,
            CommitteeEntry {
                metadata: metadata.clone(),
                members,
            },
        );
        self.next_numeric_id += 1;

        tracing::info!(
            committee = %committee_id,
            numeric_id,
            period_start,
            period_end,
            total_members,
            total_votes,
            "committee registered"
        );
        Ok(metadata)
    }

    /// Delete a committee that holds no votes, together with its member pages.
    pub fn unregister_committee(
        &mut self,
        ctx: &CallContext,
        committee_id: &CommitteeId,
    ) -> Result<(), OracleError> {
        ctx.require_admin(&self.admin, OracleError::Unauthorized)?;
        let entry = self
            .committees
            .get(committee_id)
            .ok_or(OracleError::CommitteeNotExists(*committee_id))?;
        if entry.metadata.ingested_votes != 0 {
            return Err(OracleError::IngestedVotesNotZero {
                ingested_votes: entry.metadata.ingested_votes,
            });
        }
        self.committees.remove(committee_id);
        tracing::info!(committee = %committee_id, "committee unregistered");
        Ok(())
    }

    /// Append a batch of members.
    ///
    /// Members must arrive in strictly ascending account id order across the whole
    /// ingestion history of the committee. Identities without an account id get one.
    /// The batch that completes the member count must also bring the vote sum to
    /// exactly `total_votes`.
    pub fn ingest_members(
        &mut self,
        ctx: &CallContext,
        committee_id: &CommitteeId,
        members: &[MemberInput],
    ) -> Result<(), OracleError> {
        ctx.require_admin(&self.admin, OracleError::Unauthorized)?;
        let entry = self
            .committees
            .get(committee_id)
            .ok_or(OracleError::CommitteeNotExists(*committee_id))?;
        let numeric_id = entry.metadata.numeric_id;
        let total_members = entry.metadata.total_members;
        let total_votes = entry.metadata.total_votes;
        let ingested = entry.members.len();

        if ingested + members.len() as u64 > u64::from(total_members) {
            return Err(OracleError::TotalMembersExceeded {
                ingested,
                adding: members.len(),
                total: total_members,
            });
        }

        let mut last_account_id = entry
            .members
            .last_member()?
            .map_or(AccountId::UNASSIGNED, |member| member.account_id);
        let mut ingested_votes = u64::from(entry.metadata.ingested_votes);
        let mut staged = StagedAccounts::new(&self.accounts);
        let mut records = Vec::with_capacity(members.len());
        let mut offsets = Vec::with_capacity(members.len());

        for (i, member) in members.iter().enumerate() {
            let account_id = staged.get_or_stage(&member.identity)?;
            if account_id <= last_account_id {
                return Err(OracleError::IngestOutOfOrder {
                    account: member.identity,
                    account_id,
                    last_account_id,
                });
            }
            if self.hints.contains(account_id, numeric_id) {
                return Err(OracleError::OffsetAlreadyExists {
                    account: account_id,
                    committee: numeric_id,
                });
            }
            let offset = u16::try_from(ingested + i as u64).map_err(|_| {
                OracleError::TooManyMembers {
                    total_members,
                    max: MAX_COMMITTEE_MEMBERS,
                }
            })?;
            records.push(StoredMember::new(account_id, member.votes));
            offsets.push(offset);
            last_account_id = account_id;
            ingested_votes += u64::from(member.votes);
        }

        if ingested_votes > u64::from(total_votes) {
            return Err(OracleError::TotalVotesExceeded {
                ingested_votes,
                total_votes,
            });
        }
        if ingested + members.len() as u64 == u64::from(total_members)
            && ingested_votes != u64::from(total_votes)
        {
            return Err(OracleError::TotalVotesMismatch {
                ingested_votes,
                total_votes,
            });
        }

        // Validation done; nothing below can observe a half-applied batch.
        let created = staged.into_created();
        commit_staged(&mut self.accounts, &created)?;
        for (record, offset) in records.iter().zip(&offsets) {
            self.hints.add(record.account_id, numeric_id, *offset)?;
        }
        let entry = self
            .committees
            .get_mut(committee_id)
            .ok_or(OracleError::CommitteeNotExists(*committee_id))?;
        entry.members.append_members(&records)?;
        // bounded by total_votes above
        entry.metadata.ingested_votes = ingested_votes as u32;

        tracing::info!(
            committee = %committee_id,
            count = members.len(),
            new_accounts = created.len(),
            ingested_members = entry.members.len(),
            ingested_votes,
            "members ingested"
        );
        Ok(())
    }

    /// Remove members from the tail, in exact reverse ingestion order.
    pub fn uningest_members(
        &mut self,
        ctx: &CallContext,
        committee_id: &CommitteeId,
        identities: &[Identity],
    ) -> Result<(), OracleError> {
        ctx.require_admin(&self.admin, OracleError::Unauthorized)?;
        let entry = self
            .committees
            .get(committee_id)
            .ok_or(OracleError::CommitteeNotExists(*committee_id))?;
        let numeric_id = entry.metadata.numeric_id;
        let total = entry.members.len();
        if identities.len() as u64 > total {
            return Err(OracleError::UningestExceedsIngested {
                requested: identities.len(),
                ingested: total,
            });
        }

        let mut expected = total;
        let mut ingested_votes = entry.metadata.ingested_votes;
        let mut removals = Vec::with_capacity(identities.len());
        for identity in identities {
            expected -= 1;
            let account_id = self.accounts.must_get_id(identity)?;
            let offset = self
                .hints
                .get(account_id, numeric_id)
                .ok_or(OracleError::OffsetNotExists {
                    account: account_id,
                    committee: numeric_id,
                })?;
            if u64::from(offset) != expected {
                return Err(OracleError::UningestOutOfOrder {
                    account: *identity,
                    offset,
                    expected,
                });
            }
            let stored = entry.members.member_at(expected)?;
            if stored.account_id != account_id {
                return Err(OracleError::HintMismatch {
                    account: account_id,
                    offset,
                    stored: stored.account_id,
                });
            }
            ingested_votes = ingested_votes.checked_sub(stored.votes).ok_or(
                OracleError::TotalVotesMismatch {
                    ingested_votes: u64::from(ingested_votes),
                    total_votes: entry.metadata.total_votes,
                },
            )?;
            removals.push(account_id);
        }

        let entry = self
            .committees
            .get_mut(committee_id)
            .ok_or(OracleError::CommitteeNotExists(*committee_id))?;
        for account_id in &removals {
            entry.members.truncate_last()?;
            self.hints.remove(*account_id, numeric_id)?;
        }
        entry.metadata.ingested_votes = ingested_votes;

        tracing::info!(
            committee = %committee_id,
            count = removals.len(),
            ingested_members = entry.members.len(),
            ingested_votes,
            "members uningested"
        );
        Ok(())
    }

    /// Votes held by `identity` in the committee.
    ///
    /// Resolved through the account's offset hint and verified against the stored
    /// record, so a stale hint surfaces as [`OracleError::HintMismatch`].
    pub fn get_voting_power(
        &self,
        committee_id: &CommitteeId,
        identity: &Identity,
    ) -> Result<u32, OracleError> {
        let entry = self.committee_entry(committee_id)?;
        let account_id = self.accounts.must_get_id(identity)?;
        let numeric_id = entry.metadata.numeric_id;
        let offset = self
            .hints
            .get(account_id, numeric_id)
            .ok_or(OracleError::OffsetNotExists {
                account: account_id,
                committee: numeric_id,
            })?;
        let stored = entry.members.member_at(u64::from(offset))?;
        if stored.account_id != account_id {
            return Err(OracleError::HintMismatch {
                account: account_id,
                offset,
                stored: stored.account_id,
            });
        }
        Ok(stored.votes)
    }

    /// Committee metadata; with `must_be_complete`, fails unless every vote is ingested.
    ///
    /// An unknown committee fails with [`OracleError::CommitteeNotExists`] rather
    /// than returning empty metadata.
    pub fn get_committee_metadata(
        &self,
        committee_id: &CommitteeId,
        must_be_complete: bool,
    ) -> Result<CommitteeMetadata, OracleError> {
        let metadata = &self.committee_entry(committee_id)?.metadata;
        if must_be_complete && !metadata.is_complete() {
            return Err(OracleError::CommitteeIncomplete {
                ingested_votes: metadata.ingested_votes,
                total_votes: metadata.total_votes,
            });
        }
        Ok(metadata.clone())
    }

    pub(crate) fn committee_entry(
        &self,
        committee_id: &CommitteeId,
    ) -> Result<&CommitteeEntry, OracleError> {
        self.committees
            .get(committee_id)
            .ok_or(OracleError::CommitteeNotExists(*committee_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caucus_types::{ErrorCategory, Timestamp};

    fn identity(seed: u8) -> Identity {
        Identity::new([seed; 32])
    }

    fn committee(seed: u8) -> CommitteeId {
        CommitteeId::new([seed; 32])
    }

    fn admin_ctx() -> CallContext {
        CallContext::new(identity(0xAD), Timestamp::new(1_000))
    }

    fn oracle() -> CommitteeOracle {
        CommitteeOracle::new(identity(0xAD), OracleConfig::default())
    }

    fn members(entries: &[(u8, u32)]) -> Vec<MemberInput> {
        entries
            .iter()
            .map(|(seed, votes)| MemberInput::new(identity(*seed), *votes))
            .collect()
    }

    fn register(oracle: &mut CommitteeOracle, id: CommitteeId, total_members: u32, total_votes: u32) {
        oracle
            .register_committee(&admin_ctx(), id, 3_000_000, 4_000_000, total_members, total_votes, 77)
            .unwrap();
    }

    // ── Registration ─────────────────────────────────────────────────────

    #[test]
    fn test_register_assigns_dense_numeric_ids() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        register(&mut oracle, committee(2), 2, 20);
        let a = oracle.get_committee_metadata(&committee(1), false).unwrap();
        let b = oracle.get_committee_metadata(&committee(2), false).unwrap();
        assert_eq!(a.numeric_id, 0);
        assert_eq!(b.numeric_id, 1);
        assert_eq!(a.registry_ref, 77);
        assert_eq!(a.ingested_votes, 0);
    }

    #[test]
    fn test_register_twice_fails() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        let err = oracle
            .register_committee(&admin_ctx(), committee(1), 0, 1, 1, 1, 0)
            .unwrap_err();
        assert_eq!(err, OracleError::CommitteeExists(committee(1)));
        assert_eq!(err.category(), ErrorCategory::AlreadyExists);
    }

    #[test]
    fn test_register_rejects_empty_period_range() {
        let mut oracle = oracle();
        let err = oracle
            .register_committee(&admin_ctx(), committee(1), 5, 5, 1, 1, 0)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidRange);
        assert_eq!(err.code(), "ERR:PE_LT");
    }

    #[test]
    fn test_non_admin_cannot_register() {
        let mut oracle = oracle();
        let ctx = CallContext::new(identity(1), Timestamp::new(0));
        let err = oracle
            .register_committee(&ctx, committee(1), 0, 1, 1, 1, 0)
            .unwrap_err();
        assert_eq!(err, OracleError::Unauthorized(identity(1)));
    }

    #[test]
    fn test_unregister_requires_zero_votes() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10)]))
            .unwrap();
        let err = oracle
            .unregister_committee(&admin_ctx(), &committee(1))
            .unwrap_err();
        assert_eq!(err, OracleError::IngestedVotesNotZero { ingested_votes: 10 });

        oracle
            .uningest_members(&admin_ctx(), &committee(1), &[identity(1)])
            .unwrap();
        oracle.unregister_committee(&admin_ctx(), &committee(1)).unwrap();
        assert!(matches!(
            oracle.get_committee_metadata(&committee(1), false),
            Err(OracleError::CommitteeNotExists(_))
        ));
    }

    #[test]
    fn test_unregister_unknown_committee() {
        let mut oracle = oracle();
        assert_eq!(
            oracle.unregister_committee(&admin_ctx(), &committee(9)),
            Err(OracleError::CommitteeNotExists(committee(9)))
        );
    }

    #[test]
    fn test_metadata_of_unknown_committee() {
        let oracle = oracle();
        for must_be_complete in [false, true] {
            assert_eq!(
                oracle.get_committee_metadata(&committee(9), must_be_complete),
                Err(OracleError::CommitteeNotExists(committee(9)))
            );
        }
    }

    // ── Ingestion ────────────────────────────────────────────────────────

    #[test]
    fn test_ingest_completes_committee() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10), (2, 10)]))
            .unwrap();

        let metadata = oracle.get_committee_metadata(&committee(1), true).unwrap();
        assert_eq!(metadata.ingested_votes, 20);
        assert_eq!(oracle.get_voting_power(&committee(1), &identity(1)).unwrap(), 10);
        assert_eq!(oracle.get_voting_power(&committee(1), &identity(2)).unwrap(), 10);

        let err = oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(3, 1)]))
            .unwrap_err();
        assert!(matches!(err, OracleError::TotalMembersExceeded { .. }));
        assert_eq!(err.category(), ErrorCategory::CapacityExceeded);
    }

    #[test]
    fn test_ingest_in_batches() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 6);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 1)]))
            .unwrap();
        assert!(matches!(
            oracle.get_committee_metadata(&committee(1), true),
            Err(OracleError::CommitteeIncomplete { ingested_votes: 1, total_votes: 6 })
        ));
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(2, 2), (3, 3)]))
            .unwrap();
        assert!(oracle.get_committee_metadata(&committee(1), true).is_ok());
    }

    #[test]
    fn test_ingest_out_of_order_across_batches() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 30);
        // identity 2 gets account id 1, identity 1 gets account id 2
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(2, 10), (1, 10)]))
            .unwrap();

        // a second committee must see the same account id order: id 2 before id 1 fails
        register(&mut oracle, committee(2), 2, 20);
        let err = oracle
            .ingest_members(&admin_ctx(), &committee(2), &members(&[(1, 10), (2, 10)]))
            .unwrap_err();
        assert!(matches!(err, OracleError::IngestOutOfOrder { .. }));
        assert_eq!(err.code(), "ERR:OOO");

        // across batches of the same committee
        oracle
            .ingest_members(&admin_ctx(), &committee(2), &members(&[(1, 10)]))
            .unwrap();
        let err = oracle
            .ingest_members(&admin_ctx(), &committee(2), &members(&[(2, 10)]))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::OrderViolation);
    }

    #[test]
    fn test_ingest_duplicate_in_batch_is_out_of_order() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 30);
        let err = oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(5, 10), (5, 10)]))
            .unwrap_err();
        assert!(matches!(err, OracleError::IngestOutOfOrder { .. }));
        // nothing applied, not even the account id
        assert_eq!(oracle.get_account(&identity(5)).id, AccountId::UNASSIGNED);
    }

    #[test]
    fn test_ingest_votes_exceeded() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 20);
        let err = oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 15), (2, 15)]))
            .unwrap_err();
        assert_eq!(
            err,
            OracleError::TotalVotesExceeded { ingested_votes: 30, total_votes: 20 }
        );
        let metadata = oracle.get_committee_metadata(&committee(1), false).unwrap();
        assert_eq!(metadata.ingested_votes, 0);
        assert_eq!(oracle.ingested_members(&committee(1)).unwrap(), 0);
    }

    #[test]
    fn test_ingest_votes_mismatch_on_completion() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        let err = oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 5), (2, 5)]))
            .unwrap_err();
        assert_eq!(
            err,
            OracleError::TotalVotesMismatch { ingested_votes: 10, total_votes: 20 }
        );
        assert_eq!(err.category(), ErrorCategory::Mismatch);
    }

    #[test]
    fn test_failed_ingest_leaves_no_trace() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 30);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10)]))
            .unwrap();
        let before = oracle.save_state().unwrap();
        // identity 9 is new (id 2), identity 1 is already id 1 → out of order after 9
        let err = oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(9, 10), (1, 10)]))
            .unwrap_err();
        assert!(matches!(err, OracleError::IngestOutOfOrder { .. }));
        assert_eq!(oracle.save_state().unwrap(), before);
    }

    #[test]
    fn test_ingest_spills_into_new_pages() {
        let mut oracle = CommitteeOracle::new(identity(0xAD), OracleConfig { page_capacity: 16 });
        register(&mut oracle, committee(1), 5, 15);
        let batch = members(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &batch)
            .unwrap();
        assert_eq!(oracle.page_set_meta(&committee(1)).unwrap().page_count(), 3);
        for member in &batch {
            assert_eq!(
                oracle.get_voting_power(&committee(1), &member.identity).unwrap(),
                member.votes
            );
        }
    }

    // ── Uningestion ──────────────────────────────────────────────────────

    #[test]
    fn test_uningest_in_reverse_order() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 60);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10), (2, 20), (3, 30)]))
            .unwrap();
        oracle
            .uningest_members(&admin_ctx(), &committee(1), &[identity(3), identity(2)])
            .unwrap();

        let metadata = oracle.get_committee_metadata(&committee(1), false).unwrap();
        assert_eq!(metadata.ingested_votes, 10);
        assert_eq!(oracle.ingested_members(&committee(1)).unwrap(), 1);
        assert!(matches!(
            oracle.get_voting_power(&committee(1), &identity(3)),
            Err(OracleError::OffsetNotExists { .. })
        ));
        // account ids survive uningestion
        assert_eq!(oracle.get_account(&identity(3)).id, AccountId::new(3));
    }

    #[test]
    fn test_uningest_out_of_order_changes_nothing() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 60);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10), (2, 20), (3, 30)]))
            .unwrap();
        let before = oracle.save_state().unwrap();

        let err = oracle
            .uningest_members(&admin_ctx(), &committee(1), &[identity(2)])
            .unwrap_err();
        assert_eq!(
            err,
            OracleError::UningestOutOfOrder { account: identity(2), offset: 1, expected: 2 }
        );
        let err = oracle
            .uningest_members(&admin_ctx(), &committee(1), &[identity(3), identity(3)])
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::OrderViolation);
        assert_eq!(oracle.save_state().unwrap(), before);
    }

    #[test]
    fn test_uningest_more_than_ingested() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 3, 60);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10)]))
            .unwrap();
        let err = oracle
            .uningest_members(&admin_ctx(), &committee(1), &[identity(1), identity(2)])
            .unwrap_err();
        assert_eq!(
            err,
            OracleError::UningestExceedsIngested { requested: 2, ingested: 1 }
        );
    }

    #[test]
    fn test_uningest_keeps_hints_of_other_committees() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        register(&mut oracle, committee(2), 1, 7);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10), (2, 10)]))
            .unwrap();
        oracle
            .ingest_members(&admin_ctx(), &committee(2), &members(&[(2, 7)]))
            .unwrap();

        oracle
            .uningest_members(&admin_ctx(), &committee(1), &[identity(2), identity(1)])
            .unwrap();
        assert_eq!(oracle.get_voting_power(&committee(2), &identity(2)).unwrap(), 7);
        assert_eq!(oracle.get_account(&identity(2)).committee_offsets.len(), 1);
    }

    #[test]
    fn test_reingest_after_uningest() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10), (2, 5)]))
            .unwrap_err();
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10)]))
            .unwrap();
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(2, 10)]))
            .unwrap();
        oracle
            .uningest_members(&admin_ctx(), &committee(1), &[identity(2)])
            .unwrap();
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(2, 10)]))
            .unwrap();
        assert!(oracle.get_committee_metadata(&committee(1), true).is_ok());
    }

    // ── Voting power ─────────────────────────────────────────────────────

    #[test]
    fn test_voting_power_unknown_identity() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        let err = oracle
            .get_voting_power(&committee(1), &identity(42))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotExists);
    }

    #[test]
    fn test_voting_power_detects_stale_hint() {
        let mut oracle = oracle();
        register(&mut oracle, committee(1), 2, 20);
        oracle
            .ingest_members(&admin_ctx(), &committee(1), &members(&[(1, 10), (2, 10)]))
            .unwrap();
        // corrupt the hint of identity 1 so it points at identity 2's record
        let account = oracle.get_account(&identity(1)).id;
        oracle.hints.remove(account, 0).unwrap();
        oracle.hints.add(account, 0, 1).unwrap();

        let err = oracle
            .get_voting_power(&committee(1), &identity(1))
            .unwrap_err();
        assert_eq!(
            err,
            OracleError::HintMismatch { account, offset: 1, stored: AccountId::new(2) }
        );
        assert_eq!(err.code(), "ERR:AH");
    }

    #[test]
    fn test_registry_escrow_admin_only() {
        let mut oracle = oracle();
        let outsider = CallContext::new(identity(1), Timestamp::new(0));
        assert!(oracle.set_registry_escrow(&outsider, identity(5)).is_err());
        oracle.set_registry_escrow(&admin_ctx(), identity(5)).unwrap();
        assert_eq!(oracle.registry_escrow, Some(identity(5)));
    }
}
