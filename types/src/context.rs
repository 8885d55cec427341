//! Per-call authorization context.

use crate::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Who is calling, and when.
///
/// Supplied by the surrounding execution environment on every call; registries
/// never keep a reference to it between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub sender: Identity,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(sender: Identity, now: Timestamp) -> Self {
        Self { sender, now }
    }

    /// Whether the caller is the given admin.
    pub fn is_admin(&self, admin: &Identity) -> bool {
        self.sender == *admin
    }

    /// Run `deny` to build the caller's error unless the sender is `admin`.
    pub fn require_admin<E>(&self, admin: &Identity, deny: impl FnOnce(Identity) -> E) -> Result<(), E> {
        if self.is_admin(admin) {
            Ok(())
        } else {
            Err(deny(self.sender))
        }
    }

    /// Run `deny` to build the caller's error unless the sender is `expected`.
    pub fn require_sender<E>(&self, expected: &Identity, deny: impl FnOnce(Identity) -> E) -> Result<(), E> {
        if self.sender == *expected {
            Ok(())
        } else {
            Err(deny(self.sender))
        }
    }

    /// The same caller at a different time.
    pub fn at(&self, now: Timestamp) -> Self {
        Self { sender: self.sender, now }
    }
}
