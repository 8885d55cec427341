//! Shared fixture: a real committee oracle, a delegator with two finalized
//! periods, and nullable registry, sink and clock.

#![allow(dead_code)]

use caucus_delegator::{
    AbsenteeMode, AlgoHourInput, Ballot, Delegator, DelegatorConfig, DelegatorError, ExternalVote,
    Proposal,
};
use caucus_nullables::{NullClock, NullProposal, NullProposalRegistry, NullVoteSink};
use caucus_oracle::{CommitteeOracle, MemberInput, OracleConfig};
use caucus_utils::init_logging;
use caucus_types::{CallContext, CommitteeId, Identity, ProposalId, Timestamp};

pub const L: u64 = 1_000_000;
pub const PERIOD_START: u32 = 3_000_000;
pub const PERIOD_END: u32 = 5_000_000;
pub const VOTE_OPEN: u64 = 10_000;
pub const VOTING_DURATION: u64 = 100_000;
pub const NOW: u64 = 20_000;

pub const ADMIN: u8 = 0xAD;
pub const ESCROW: u8 = 0xEE;
/// Delegated to us, 10 and 20 external votes.
pub const D1: u8 = 0x11;
pub const D2: u8 = 0x12;
/// Committee member that did not delegate, 70 votes.
pub const OTHER: u8 = 0x13;
/// Participants with 40, 20 and 40 hours over the committee's two periods.
pub const V1: u8 = 0x21;
pub const V2: u8 = 0x22;
pub const V3: u8 = 0x23;

pub fn identity(seed: u8) -> Identity {
    Identity::new([seed; 32])
}

pub fn committee_id() -> CommitteeId {
    CommitteeId::from_contents(b"committee 3000000-5000000")
}

pub struct World {
    pub clock: NullClock,
    pub oracle: CommitteeOracle,
    pub registry: NullProposalRegistry,
    pub sink: NullVoteSink,
    pub delegator: Delegator,
}

impl World {
    /// Oracle with one complete committee, delegator with finalized hours but
    /// nothing synced yet.
    pub fn unsynced(mode: AbsenteeMode) -> Self {
        let clock = NullClock::new(NOW);
        let admin = clock.ctx(identity(ADMIN));

        let mut oracle = CommitteeOracle::new(identity(ADMIN), OracleConfig::default());
        oracle.set_registry_escrow(&admin, identity(ESCROW)).unwrap();
        oracle
            .register_committee(&admin, committee_id(), PERIOD_START, PERIOD_END, 3, 100, 1)
            .unwrap();
        oracle
            .ingest_members(
                &admin,
                &committee_id(),
                &[
                    MemberInput::new(identity(D1), 10),
                    MemberInput::new(identity(D2), 20),
                    MemberInput::new(identity(OTHER), 70),
                ],
            )
            .unwrap();

        let config = DelegatorConfig {
            absentee_mode: mode,
            log_level: "warn".to_string(),
            ..DelegatorConfig::default()
        };
        init_logging(config.log_format().unwrap(), &config.log_level);
        let mut delegator = Delegator::new(identity(ADMIN), config).unwrap();
        let first = u64::from(PERIOD_START);
        delegator
            .add_account_algo_hours(
                &admin,
                first,
                &[
                    AlgoHourInput::new(identity(V1), 30),
                    AlgoHourInput::new(identity(V2), 20),
                    AlgoHourInput::new(identity(V3), 30),
                ],
            )
            .unwrap();
        delegator
            .add_account_algo_hours(
                &admin,
                first + L,
                &[
                    AlgoHourInput::new(identity(V1), 10),
                    AlgoHourInput::new(identity(V3), 10),
                ],
            )
            .unwrap();
        delegator
            .update_algo_hour_period_finality(&admin, first, 80, true)
            .unwrap();
        delegator
            .update_algo_hour_period_finality(&admin, first + L, 20, true)
            .unwrap();

        Self {
            clock,
            oracle,
            registry: NullProposalRegistry::new(),
            sink: NullVoteSink::new(),
            delegator,
        }
    }

    /// [`World::unsynced`] with the committee synced for D1 and D2.
    pub fn new(mode: AbsenteeMode) -> Self {
        let mut world = Self::unsynced(mode);
        let admin = world.admin();
        world
            .delegator
            .sync_committee_metadata(
                &admin,
                &world.oracle,
                &committee_id(),
                &[identity(D1), identity(D2)],
            )
            .unwrap();
        world
    }

    pub fn admin(&self) -> CallContext {
        self.clock.ctx(identity(ADMIN))
    }

    /// Publish a voting proposal in the registry and sync it.
    pub fn open_proposal(&mut self, id: u64) -> Proposal {
        self.publish(id);
        self.sync_proposal(id).unwrap()
    }

    pub fn publish(&mut self, id: u64) {
        self.registry.insert(
            ProposalId::new(id),
            NullProposal::voting(
                identity(ESCROW),
                committee_id(),
                Timestamp::new(VOTE_OPEN),
                VOTING_DURATION,
            ),
        );
    }

    pub fn sync_proposal(&mut self, id: u64) -> Result<Proposal, DelegatorError> {
        let admin = self.admin();
        self.delegator.sync_proposal_metadata(
            &admin,
            &self.oracle,
            &self.registry,
            ProposalId::new(id),
        )
    }

    pub fn vote(&mut self, id: u64, voter: u8, ballot: Ballot) -> Result<(), DelegatorError> {
        let ctx = self.clock.ctx(identity(voter));
        self.delegator
            .vote_internal(&ctx, ProposalId::new(id), &identity(voter), ballot)
    }

    /// Submit external votes for D1 and D2 in synced order; anyone may submit.
    pub fn submit(&mut self, id: u64) -> Result<Vec<ExternalVote>, DelegatorError> {
        self.submit_as(id, &[identity(D1), identity(D2)])
    }

    pub fn submit_as(
        &mut self,
        id: u64,
        identities: &[Identity],
    ) -> Result<Vec<ExternalVote>, DelegatorError> {
        let ctx = self.clock.ctx(identity(V3));
        self.delegator
            .vote_external(&ctx, &mut self.sink, ProposalId::new(id), identities)
    }
}

/// `(approvals, rejections)` per submitted vote.
pub fn split(votes: &[ExternalVote]) -> Vec<(u64, u64)> {
    votes.iter().map(|v| (v.approvals, v.rejections)).collect()
}
