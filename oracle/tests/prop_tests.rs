use proptest::prelude::*;

use caucus_oracle::{CommitteeOracle, MemberInput, OracleConfig, OracleError};
use caucus_types::{CallContext, CommitteeId, ErrorCategory, Identity, Timestamp};

fn admin() -> Identity {
    Identity::new([0xAD; 32])
}

fn ctx() -> CallContext {
    CallContext::new(admin(), Timestamp::new(0))
}

fn member_identity(i: usize) -> Identity {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&(i as u64 + 1).to_be_bytes());
    Identity::new(bytes)
}

fn members(votes: &[u32]) -> Vec<MemberInput> {
    votes
        .iter()
        .enumerate()
        .map(|(i, v)| MemberInput::new(member_identity(i), *v))
        .collect()
}

/// An oracle with small pages and one committee sized exactly for `votes`.
fn oracle_for(votes: &[u32]) -> (CommitteeOracle, CommitteeId) {
    let mut oracle = CommitteeOracle::new(admin(), OracleConfig { page_capacity: 24 });
    let id = CommitteeId::new([1; 32]);
    let total: u32 = votes.iter().sum();
    oracle
        .register_committee(&ctx(), id, 0, 1, votes.len() as u32, total, 0)
        .unwrap();
    (oracle, id)
}

proptest! {
    /// After every batch, ingested votes equal the prefix sum and stay within the total.
    #[test]
    fn ingested_votes_track_prefix_sums(
        votes in prop::collection::vec(0u32..1_000, 1..40),
        batch in 1usize..8,
    ) {
        let (mut oracle, id) = oracle_for(&votes);
        let input = members(&votes);
        let total: u32 = votes.iter().sum();
        let mut prefix = 0u32;
        for chunk in input.chunks(batch) {
            oracle.ingest_members(&ctx(), &id, chunk).unwrap();
            prefix += chunk.iter().map(|m| m.votes).sum::<u32>();
            let metadata = oracle.get_committee_metadata(&id, false).unwrap();
            prop_assert_eq!(metadata.ingested_votes, prefix);
            prop_assert!(metadata.ingested_votes <= total);
        }
        prop_assert!(oracle.get_committee_metadata(&id, true).is_ok());
    }

    /// Every ingested identity reads back its own votes; others are unknown.
    #[test]
    fn voting_power_reads_back_ingested_votes(votes in prop::collection::vec(0u32..1_000, 1..40)) {
        let (mut oracle, id) = oracle_for(&votes);
        let input = members(&votes);
        oracle.ingest_members(&ctx(), &id, &input).unwrap();
        for member in &input {
            prop_assert_eq!(oracle.get_voting_power(&id, &member.identity).unwrap(), member.votes);
        }
        let stranger = oracle.get_voting_power(&id, &member_identity(votes.len())).unwrap_err();
        prop_assert_eq!(stranger.category(), ErrorCategory::NotExists);
    }

    /// Uningesting everything in reverse undoes ingestion without touching other committees.
    #[test]
    fn uningest_is_inverse_of_ingest(
        votes in prop::collection::vec(1u32..1_000, 1..30),
        shared in any::<prop::sample::Index>(),
    ) {
        let (mut oracle, id) = oracle_for(&votes);
        let input = members(&votes);
        oracle.ingest_members(&ctx(), &id, &input).unwrap();

        let other = CommitteeId::new([2; 32]);
        let shared = input[shared.index(input.len())];
        oracle.register_committee(&ctx(), other, 0, 1, 1, 7, 0).unwrap();
        oracle.ingest_members(&ctx(), &other, &[MemberInput::new(shared.identity, 7)]).unwrap();

        let reversed: Vec<Identity> = input.iter().rev().map(|m| m.identity).collect();
        oracle.uningest_members(&ctx(), &id, &reversed).unwrap();

        prop_assert_eq!(oracle.get_committee_metadata(&id, false).unwrap().ingested_votes, 0);
        prop_assert_eq!(oracle.ingested_members(&id).unwrap(), 0);
        for member in &input {
            let record = oracle.get_account(&member.identity);
            prop_assert!(record.committee_offsets.iter().all(|h| h.committee != 0));
        }
        prop_assert_eq!(oracle.get_voting_power(&other, &shared.identity).unwrap(), 7);
        prop_assert!(oracle.unregister_committee(&ctx(), &id).is_ok());
    }

    /// Uningesting anything but the tail fails and changes nothing.
    #[test]
    fn uningest_out_of_order_is_rejected(
        votes in prop::collection::vec(0u32..1_000, 2..30),
        pick in any::<prop::sample::Index>(),
    ) {
        let (mut oracle, id) = oracle_for(&votes);
        let input = members(&votes);
        oracle.ingest_members(&ctx(), &id, &input).unwrap();
        let before = oracle.save_state().unwrap();

        let victim = pick.index(input.len() - 1);
        let err = oracle
            .uningest_members(&ctx(), &id, &[input[victim].identity])
            .unwrap_err();
        let is_out_of_order = matches!(err, OracleError::UningestOutOfOrder { .. });
        prop_assert!(is_out_of_order);
        prop_assert_eq!(oracle.save_state().unwrap(), before);
    }
}

#[test]
fn third_member_exceeds_complete_committee() {
    let mut oracle = CommitteeOracle::new(admin(), OracleConfig::default());
    let id = CommitteeId::from_contents(b"committee file");
    oracle.register_committee(&ctx(), id, 0, 1, 2, 20, 0).unwrap();
    oracle.ingest_members(&ctx(), &id, &members(&[10, 10])).unwrap();

    let metadata = oracle.get_committee_metadata(&id, true).unwrap();
    assert_eq!(metadata.ingested_votes, 20);

    let third = MemberInput::new(member_identity(2), 1);
    let err = oracle.ingest_members(&ctx(), &id, &[third]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::CapacityExceeded);
}
