use caucus_store::StoreError;
use caucus_types::{AccountId, CommitteeId, ErrorCategory, Identity};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("caller {0} is not the oracle admin")]
    Unauthorized(Identity),

    #[error("committee {0} already exists")]
    CommitteeExists(CommitteeId),

    #[error("committee {0} does not exist")]
    CommitteeNotExists(CommitteeId),

    #[error("period end {end} must be greater than period start {start}")]
    PeriodEndNotAfterStart { start: u32, end: u32 },

    #[error("committee of {total_members} members exceeds the addressable maximum of {max}")]
    TooManyMembers { total_members: u32, max: u32 },

    #[error("committee numeric id space exhausted")]
    CommitteeIdsExhausted,

    #[error("cannot unregister committee with {ingested_votes} ingested votes")]
    IngestedVotesNotZero { ingested_votes: u32 },

    #[error("ingesting {adding} members on top of {ingested} exceeds total of {total}")]
    TotalMembersExceeded { ingested: u64, adding: usize, total: u32 },

    #[error("ingested votes {ingested_votes} exceed total votes {total_votes}")]
    TotalVotesExceeded { ingested_votes: u64, total_votes: u32 },

    #[error("committee complete with {ingested_votes} votes, expected {total_votes}")]
    TotalVotesMismatch { ingested_votes: u64, total_votes: u32 },

    #[error("cannot uningest {requested} members, only {ingested} ingested")]
    UningestExceedsIngested { requested: usize, ingested: u64 },

    #[error("member {account} ({account_id}) not above last ingested {last_account_id}")]
    IngestOutOfOrder {
        account: Identity,
        account_id: AccountId,
        last_account_id: AccountId,
    },

    #[error("member {account} is at offset {offset}, expected the tail offset {expected}")]
    UningestOutOfOrder {
        account: Identity,
        offset: u16,
        expected: u64,
    },

    #[error("account {account} already has an offset in committee {committee}")]
    OffsetAlreadyExists { account: AccountId, committee: u16 },

    #[error("account {account} has no offset in committee {committee}")]
    OffsetNotExists { account: AccountId, committee: u16 },

    #[error("offset hint {offset} of account {account} points at account {stored}")]
    HintMismatch {
        account: AccountId,
        offset: u16,
        stored: AccountId,
    },

    #[error("committee incomplete: {ingested_votes} of {total_votes} votes ingested")]
    CommitteeIncomplete { ingested_votes: u32, total_votes: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl OracleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized(_) => ErrorCategory::Unauthorized,
            Self::CommitteeExists(_) | Self::OffsetAlreadyExists { .. } => {
                ErrorCategory::AlreadyExists
            }
            Self::CommitteeNotExists(_) | Self::OffsetNotExists { .. } => ErrorCategory::NotExists,
            Self::PeriodEndNotAfterStart { .. } => ErrorCategory::InvalidRange,
            Self::TooManyMembers { .. }
            | Self::CommitteeIdsExhausted
            | Self::TotalMembersExceeded { .. }
            | Self::TotalVotesExceeded { .. }
            | Self::UningestExceedsIngested { .. } => ErrorCategory::CapacityExceeded,
            Self::IngestOutOfOrder { .. } | Self::UningestOutOfOrder { .. } => {
                ErrorCategory::OrderViolation
            }
            Self::TotalVotesMismatch { .. } | Self::HintMismatch { .. } => ErrorCategory::Mismatch,
            Self::IngestedVotesNotZero { .. } | Self::CommitteeIncomplete { .. } => {
                ErrorCategory::IncompleteState
            }
            Self::Store(e) => e.category(),
            Self::Config(_) | Self::Snapshot(_) => ErrorCategory::Environment,
        }
    }

    /// Stable short code for remote callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "ERR:AUTH",
            Self::CommitteeExists(_) => "ERR:C_EX",
            Self::CommitteeNotExists(_) => "ERR:C_NX",
            Self::PeriodEndNotAfterStart { .. } => "ERR:PE_LT",
            Self::TooManyMembers { .. } => "ERR:TM_MAX",
            Self::CommitteeIdsExhausted => "ERR:C_XC",
            Self::IngestedVotesNotZero { .. } => "ERR:IV_NZ",
            Self::TotalMembersExceeded { .. } => "ERR:TM_XC",
            Self::TotalVotesExceeded { .. } => "ERR:TV_XC",
            Self::TotalVotesMismatch { .. } => "ERR:TV_MM",
            Self::UningestExceedsIngested { .. } => "ERR:NM_XC",
            Self::IngestOutOfOrder { .. } | Self::UningestOutOfOrder { .. } => "ERR:OOO",
            Self::OffsetAlreadyExists { .. } => "ERR:AO_EX",
            Self::OffsetNotExists { .. } => "ERR:AO_NX",
            Self::HintMismatch { .. } => "ERR:AH",
            Self::CommitteeIncomplete { .. } => "ERR:C_NC",
            Self::Store(e) => e.code(),
            Self::Config(_) => "ERR:CFG",
            Self::Snapshot(_) => "ERR:SNAP",
        }
    }
}
