use caucus_types::{ErrorCategory, Identity};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account {0} already has an id")]
    AccountExists(Identity),

    #[error("account {0} has no id")]
    AccountNotExists(Identity),

    #[error("account id space exhausted")]
    AccountIdsExhausted,

    #[error("invalid page layout: capacity {page_capacity} cannot hold records of {record_size} bytes")]
    InvalidLayout { page_capacity: u32, record_size: u32 },

    #[error("corrupt page set: {0}")]
    CorruptLayout(String),

    #[error("byte length {len} is not a multiple of record size {record_size}")]
    RecordSizeMismatch { len: usize, record_size: u32 },

    #[error("record index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: u64, len: u64 },

    #[error("store is empty")]
    Empty,
}

impl StoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AccountExists(_) => ErrorCategory::AlreadyExists,
            Self::AccountNotExists(_) | Self::IndexOutOfBounds { .. } => ErrorCategory::NotExists,
            Self::AccountIdsExhausted | Self::Empty => ErrorCategory::CapacityExceeded,
            Self::InvalidLayout { .. } => ErrorCategory::InvalidRange,
            Self::RecordSizeMismatch { .. } | Self::CorruptLayout(_) => ErrorCategory::Mismatch,
        }
    }

    /// Stable short code for remote callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccountExists(_) => "ERR:A_EX",
            Self::AccountNotExists(_) => "ERR:A_NX",
            Self::AccountIdsExhausted => "ERR:A_XC",
            Self::InvalidLayout { .. } => "ERR:PG_L",
            Self::RecordSizeMismatch { .. } => "ERR:PG_RS",
            Self::CorruptLayout(_) => "ERR:PG_C",
            Self::IndexOutOfBounds { .. } => "ERR:PG_IX",
            Self::Empty => "ERR:PG_E",
        }
    }
}
