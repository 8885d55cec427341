#![no_main]

use arbitrary::Arbitrary;
use caucus_oracle::{CommitteeOracle, MemberInput, OracleConfig};
use caucus_types::{CallContext, CommitteeId, Identity, Timestamp};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Register { committee: u8, total_members: u8, total_votes: u16 },
    Unregister { committee: u8 },
    Ingest { committee: u8, members: Vec<(u8, u16)> },
    Uningest { committee: u8, members: Vec<u8> },
    Query { committee: u8, member: u8 },
}

fn committee(seed: u8) -> CommitteeId {
    CommitteeId::new([seed % 4; 32])
}

fn identity(seed: u8) -> Identity {
    Identity::new([seed; 32])
}

// Arbitrary admin call sequences never panic, and a failed call never changes state.
fuzz_target!(|ops: Vec<Op>| {
    let admin = identity(0xAD);
    let ctx = CallContext::new(admin, Timestamp::new(0));
    let mut oracle = CommitteeOracle::new(admin, OracleConfig { page_capacity: 32 });

    for op in ops {
        let before = oracle.save_state().ok();
        let result = match op {
            Op::Register { committee: c, total_members, total_votes } => oracle
                .register_committee(
                    &ctx,
                    committee(c),
                    0,
                    1,
                    u32::from(total_members),
                    u32::from(total_votes),
                    0,
                )
                .map(|_| ()),
            Op::Unregister { committee: c } => oracle.unregister_committee(&ctx, &committee(c)),
            Op::Ingest { committee: c, members } => {
                let members: Vec<_> = members
                    .iter()
                    .map(|(seed, votes)| MemberInput::new(identity(*seed), u32::from(*votes)))
                    .collect();
                oracle.ingest_members(&ctx, &committee(c), &members)
            }
            Op::Uningest { committee: c, members } => {
                let members: Vec<_> = members.iter().map(|seed| identity(*seed)).collect();
                oracle.uningest_members(&ctx, &committee(c), &members)
            }
            Op::Query { committee: c, member } => {
                let _ = oracle.get_voting_power(&committee(c), &identity(member));
                Ok(())
            }
        };
        if result.is_err() {
            assert_eq!(oracle.save_state().ok(), before);
        }
        if let Ok(metadata) = oracle.get_committee_metadata(&committee(0), false) {
            assert!(metadata.ingested_votes <= metadata.total_votes);
        }
    }
});
