//! Translation of an internal tally into external votes.
//!
//! Outside a boycott, yes and no hours are scaled to the delegated external
//! voting power, then split across delegated accounts by weight. Every division
//! truncates; the allocated total may fall a few votes short of the exact share.

use crate::config::AbsenteeMode;
use crate::proposal::{AccountVotes, Ballot};

/// Proposal-wide external totals derived from the internal tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub boycott: bool,
    pub total_approvals: u64,
    pub total_rejections: u64,
}

/// A boycott holds at least half of all covered hours.
pub fn is_boycott(boycott_hours: u64, total_hours: u64) -> bool {
    u128::from(boycott_hours) * 2 >= u128::from(total_hours)
}

/// `value * numerator / denominator`, truncated. `None` for a zero denominator
/// or a result that does not fit in `u64`.
pub fn scale(value: u64, numerator: u64, denominator: u64) -> Option<u64> {
    if denominator == 0 {
        return None;
    }
    let scaled = u128::from(value) * u128::from(numerator) / u128::from(denominator);
    u64::try_from(scaled).ok()
}

/// External totals for a proposal. `None` when the absentee denominator is zero.
pub fn allocate(
    votes: &Ballot,
    voted_hours: u64,
    total_hours: u64,
    ext_total_voting_power: u64,
    mode: AbsenteeMode,
) -> Option<Allocation> {
    if is_boycott(votes.boycott, total_hours) {
        return Some(Allocation {
            boycott: true,
            total_approvals: 0,
            total_rejections: 0,
        });
    }
    let denominator = match mode {
        AbsenteeMode::Scaled => voted_hours,
        AbsenteeMode::Strict => total_hours,
    };
    Some(Allocation {
        boycott: false,
        total_approvals: scale(votes.yes, ext_total_voting_power, denominator)?,
        total_rejections: scale(votes.no, ext_total_voting_power, denominator)?,
    })
}

impl Allocation {
    /// `(approvals, rejections)` for one delegated account.
    ///
    /// In a boycott the account's full weight goes to both sides.
    pub fn share(&self, account: &AccountVotes, ext_total_voting_power: u64) -> (u64, u64) {
        let weight = u64::from(account.votes);
        if self.boycott {
            return (weight, weight);
        }
        (
            scale(self.total_approvals, weight, ext_total_voting_power).unwrap_or(0),
            scale(self.total_rejections, weight, ext_total_voting_power).unwrap_or(0),
        )
    }
}
