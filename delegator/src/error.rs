use crate::external::{ExternalStatus, ProposalAttribute};
use crate::proposal::ProposalStatus;
use caucus_oracle::OracleError;
use caucus_store::StoreError;
use caucus_types::{AccountId, CommitteeId, ErrorCategory, Identity, ProposalId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelegatorError {
    #[error("caller {0} is not authorized for this action")]
    Unauthorized(Identity),

    #[error("committee {0} already synced")]
    CommitteeExists(CommitteeId),

    #[error("committee {0} not synced")]
    CommitteeNotExists(CommitteeId),

    #[error("{0} already synced")]
    ProposalExists(ProposalId),

    #[error("{0} not synced")]
    ProposalNotExists(ProposalId),

    #[error("{0} has been cancelled")]
    ProposalCancelled(ProposalId),

    #[error("period start {period} is not aligned to {period_length}")]
    PeriodStartInvalid { period: u64, period_length: u64 },

    #[error("period end {period} is not aligned to {period_length}")]
    PeriodEndInvalid { period: u64, period_length: u64 },

    #[error("period end {end} must be greater than period start {start}")]
    PeriodEndNotAfterStart { start: u64, end: u64 },

    #[error("algohours already recorded for {account} in period {period}")]
    AlgoHoursExist { period: u64, account: Identity },

    #[error("no algohours recorded for {account} in period {period}")]
    AccountHoursNotExist { period: u64, account: Identity },

    #[error("no algohour totals for period {period}")]
    PeriodNotExists { period: u64 },

    #[error("algohour totals of period {period} are not final")]
    PeriodNotFinal { period: u64 },

    #[error("period {period} is final; unfinalize it before changing hours")]
    PeriodFinal { period: u64 },

    #[error("algohour mismatch in period {period}: expected {expected}, found {actual}")]
    AlgoHoursMismatch { period: u64, expected: u64, actual: u64 },

    #[error("algohour total overflow in period {period}")]
    AlgoHoursOverflow { period: u64 },

    #[error("{0} has no voting power")]
    NoVotingPower(Identity),

    #[error("{0} listed more than once")]
    DuplicateAccount(Identity),

    #[error("registry escrow not configured in the oracle")]
    RegistryMissing,

    #[error("proposal creator {creator:?} does not match registry escrow {expected}")]
    InvalidCreator {
        creator: Option<Identity>,
        expected: Identity,
    },

    #[error("{proposal} is missing its {attribute} attribute")]
    ProposalAttributeMissing {
        proposal: ProposalId,
        attribute: ProposalAttribute,
    },

    #[error("external status {0} does not accept votes")]
    InvalidExternalStatus(ExternalStatus),

    #[error("{proposal} is {status}, action needs {required}")]
    InvalidStatus {
        proposal: ProposalId,
        status: ProposalStatus,
        required: ProposalStatus,
    },

    #[error("vote window invalid: opens {vote_open}, lasts {duration}s, submit threshold {threshold}s")]
    InvalidVoteWindow {
        vote_open: Timestamp,
        duration: u64,
        threshold: u64,
    },

    #[error("too early: now {now}, window opens {start}")]
    TooEarly { now: Timestamp, start: Timestamp },

    #[error("too late: now {now}, window closed {end}")]
    TooLate { now: Timestamp, end: Timestamp },

    #[error("vote totals {cast} must equal voting power {voting_power}")]
    IncorrectVotes { cast: u64, voting_power: u64 },

    #[error("tally overflow on {0}")]
    TallyOverflow(ProposalId),

    #[error("no internal votes cast on {0}")]
    NoVotes(ProposalId),

    #[error("{provided} accounts provided, {pending} pending")]
    AccountCountMismatch { provided: usize, pending: usize },

    #[error("account at index {index} is {actual}, pending entry is {expected}")]
    AccountIdMismatch {
        index: usize,
        expected: AccountId,
        actual: AccountId,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("external vote submission failed: {0}")]
    Sink(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl DelegatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized(_) | Self::InvalidCreator { .. } => ErrorCategory::Unauthorized,
            Self::CommitteeExists(_)
            | Self::ProposalExists(_)
            | Self::AlgoHoursExist { .. }
            | Self::DuplicateAccount(_) => ErrorCategory::AlreadyExists,
            Self::CommitteeNotExists(_)
            | Self::ProposalNotExists(_)
            | Self::AccountHoursNotExist { .. }
            | Self::PeriodNotExists { .. }
            | Self::RegistryMissing
            | Self::ProposalAttributeMissing { .. } => ErrorCategory::NotExists,
            Self::PeriodStartInvalid { .. }
            | Self::PeriodEndInvalid { .. }
            | Self::PeriodEndNotAfterStart { .. }
            | Self::InvalidVoteWindow { .. } => ErrorCategory::InvalidRange,
            Self::AlgoHoursOverflow { .. } | Self::TallyOverflow(_) => {
                ErrorCategory::CapacityExceeded
            }
            Self::AlgoHoursMismatch { .. }
            | Self::IncorrectVotes { .. }
            | Self::AccountCountMismatch { .. }
            | Self::AccountIdMismatch { .. } => ErrorCategory::Mismatch,
            Self::TooEarly { .. } | Self::TooLate { .. } => ErrorCategory::TimingViolation,
            Self::ProposalCancelled(_)
            | Self::PeriodNotFinal { .. }
            | Self::PeriodFinal { .. }
            | Self::NoVotingPower(_)
            | Self::InvalidExternalStatus(_)
            | Self::InvalidStatus { .. }
            | Self::NoVotes(_) => ErrorCategory::IncompleteState,
            Self::Oracle(e) => e.category(),
            Self::Store(e) => e.category(),
            Self::Sink(_) | Self::Config(_) | Self::Snapshot(_) => ErrorCategory::Environment,
        }
    }

    /// Stable short code for remote callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "ERR:AUTH",
            Self::CommitteeExists(_) => "ERR:C_EX",
            Self::CommitteeNotExists(_) => "ERR:C_NX",
            Self::ProposalExists(_) => "ERR:P_EX",
            Self::ProposalNotExists(_) => "ERR:P_NX",
            Self::ProposalCancelled(_) => "ERR:P_C",
            Self::PeriodStartInvalid { .. } => "ERR:PS",
            Self::PeriodEndInvalid { .. } => "ERR:PE",
            Self::PeriodEndNotAfterStart { .. } => "ERR:PE_LT",
            Self::AlgoHoursExist { .. } => "ERR:AH_EX",
            Self::AccountHoursNotExist { .. } | Self::PeriodNotExists { .. } => "ERR:AH_NX",
            Self::PeriodNotFinal { .. } => "ERR:AH_NF",
            Self::PeriodFinal { .. } => "ERR:AH_F",
            Self::AlgoHoursMismatch { .. } => "ERR:AH",
            Self::AlgoHoursOverflow { .. } => "ERR:AH_XC",
            Self::NoVotingPower(_) => "ERR:A_NV",
            Self::DuplicateAccount(_) => "ERR:A_DUP",
            Self::RegistryMissing => "ERR:XGRM",
            Self::InvalidCreator { .. } => "ERR:XGPC",
            Self::ProposalAttributeMissing { attribute, .. } => attribute.missing_code(),
            Self::InvalidExternalStatus(_) | Self::InvalidStatus { .. } => "ERR:ST",
            Self::InvalidVoteWindow { .. } => "ERR:VW",
            Self::TooEarly { .. } => "ERR:EAR",
            Self::TooLate { .. } => "ERR:LAT",
            Self::IncorrectVotes { .. } => "ERR:IV",
            Self::TallyOverflow(_) => "ERR:T_XC",
            Self::NoVotes(_) => "ERR:NV",
            Self::AccountCountMismatch { .. } => "ERR:ANM",
            Self::AccountIdMismatch { .. } => "ERR:ID",
            Self::Oracle(e) => e.code(),
            Self::Store(e) => e.code(),
            Self::Sink(_) => "ERR:SINK",
            Self::Config(_) => "ERR:CFG",
            Self::Snapshot(_) => "ERR:SNAP",
        }
    }
}
