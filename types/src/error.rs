//! Error classification shared across crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The class of invariant a failed call violated.
///
/// Every crate error maps onto exactly one category so callers can branch on the
/// kind of failure (e.g. resume ingestion from the right offset after an
/// [`ErrorCategory::OrderViolation`]) without matching crate-specific variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    AlreadyExists,
    NotExists,
    InvalidRange,
    CapacityExceeded,
    OrderViolation,
    Mismatch,
    Unauthorized,
    TimingViolation,
    IncompleteState,
    /// Configuration or host-environment failures that are not state invariants.
    Environment,
}

impl ErrorCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "already_exists",
            Self::NotExists => "not_exists",
            Self::InvalidRange => "invalid_range",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::OrderViolation => "order_violation",
            Self::Mismatch => "mismatch",
            Self::Unauthorized => "unauthorized",
            Self::TimingViolation => "timing_violation",
            Self::IncompleteState => "incomplete_state",
            Self::Environment => "environment",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
