//! Committee content hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};
use std::fmt;

/// Domain separator mixed into every committee id.
const COMMITTEE_ID_DOMAIN: &[u8] = b"arc0086";

/// A 32-byte committee id: the content hash of the committee's published member file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommitteeId([u8; 32]);

impl CommitteeId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the committee id from the raw committee file contents.
    ///
    /// `SHA-512/256("arc0086" || SHA-512/256(contents))`.
    pub fn from_contents(contents: &[u8]) -> Self {
        let file_hash = Sha512_256::digest(contents);
        let mut hasher = Sha512_256::new();
        hasher.update(COMMITTEE_ID_DOMAIN);
        hasher.update(file_hash);
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for CommitteeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitteeId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for CommitteeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
