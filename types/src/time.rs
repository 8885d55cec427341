//! Timestamp type used for vote windows.
//!
//! Timestamps are Unix epoch seconds as reported by the host platform for the
//! current call. Nothing in the workspace reads the wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// `self + secs`, or `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    /// `self - secs`, or `None` if that would precede the epoch.
    pub fn checked_sub_secs(&self, secs: u64) -> Option<Self> {
        self.0.checked_sub(secs).map(Self)
    }

    /// Whether `self` lies in the half-open window `[start, end)`.
    pub fn is_within(&self, start: Timestamp, end: Timestamp) -> bool {
        start <= *self && *self < end
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
