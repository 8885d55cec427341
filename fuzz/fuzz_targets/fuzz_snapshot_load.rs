#![no_main]

use caucus_delegator::{AlgoHourInput, Delegator};
use caucus_oracle::{CommitteeOracle, MemberInput};
use caucus_types::{CallContext, Identity, Timestamp};
use libfuzzer_sys::fuzz_target;

/// Identities worth querying: a few fixed seeds plus 32-byte windows of the input.
fn identities(data: &[u8]) -> Vec<Identity> {
    let mut out: Vec<Identity> = (0u8..4).map(|seed| Identity::new([seed; 32])).collect();
    for chunk in data.chunks_exact(32).take(8) {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(chunk);
        out.push(Identity::new(bytes));
    }
    out
}

// Loading persisted state from arbitrary bytes must fail cleanly, and state that
// does load must serve every call without panicking.
fuzz_target!(|data: &[u8]| {
    let _ = bincode::deserialize::<caucus_oracle::CommitteeMetadata>(data);
    let _ = bincode::deserialize::<caucus_delegator::Proposal>(data);
    let probes = identities(data);

    if let Ok(mut oracle) = CommitteeOracle::load_state(data) {
        let ctx = CallContext::new(*oracle.admin(), Timestamp::new(0));
        for committee_id in oracle.committee_ids() {
            let _ = oracle.get_committee_metadata(&committee_id, true);
            let _ = oracle.committee_members(&committee_id);
            let _ = oracle.committee_pages(&committee_id, true, 0, 4);
            for identity in &probes {
                let _ = oracle.get_voting_power(&committee_id, identity);
            }
            let _ = oracle.uningest_members(&ctx, &committee_id, &probes[..1]);
            let _ = oracle.ingest_members(&ctx, &committee_id, &[MemberInput::new(probes[0], 1)]);
        }
        let _ = oracle.accounts_batch(&probes);
        let _ = oracle.save_state();
    }

    if let Ok(mut delegator) = Delegator::load_state(data) {
        let ctx = CallContext::new(*delegator.admin(), Timestamp::new(0));
        let length = delegator.config().period_length;
        for period in [0, length, length.saturating_mul(3)] {
            let _ = delegator.period_totals(period);
            for identity in &probes {
                let _ = delegator.account_hours(period, identity);
                let _ = delegator.aggregated_account_hours(0, period, identity);
            }
        }
        let hours = [AlgoHourInput::new(probes[0], 1)];
        let _ = delegator.add_account_algo_hours(&ctx, length, &hours);
        let _ = delegator.remove_account_algo_hours(&ctx, length, &hours);
        let _ = delegator.update_algo_hour_period_finality(&ctx, length, 0, true);
        let _ = delegator.save_state();
    }
});
