//! Delegated voting on external proposals.
//!
//! A delegator holds the external voting weight that committee members
//! delegated to it and lets its own participants decide how to use it.
//! Participants earn algohours per period; their hours over a committee's
//! periods are their internal voting power on that committee's proposals.
//!
//! Flow:
//! record hours → finalize periods → sync committee → sync proposal →
//! internal votes → external submission, scaled by the absentee mode.

pub mod config;
pub mod engine;
pub mod error;
pub mod external;
pub mod ledger;
pub mod proposal;
pub mod tally;
pub mod voting;

pub use config::{AbsenteeMode, DelegatorConfig};
pub use engine::Delegator;
pub use error::DelegatorError;
pub use external::{
    ExternalProposalAttributes, ExternalStatus, ExternalVote, ExternalVoteSink, ProposalAttribute,
};
pub use ledger::{AlgoHourInput, PeriodLedger, PeriodTotals};
pub use proposal::{AccountVotes, Ballot, CommitteeSnapshot, Proposal, ProposalStatus};
pub use tally::Allocation;
