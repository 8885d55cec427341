//! Fixed-size committee member record.

use crate::StoreError;
use caucus_types::AccountId;
use serde::{Deserialize, Serialize};

/// A committee member as stored in committee pages: `(account id, votes)`.
///
/// Encoded as two big-endian `u32`s. Records within one committee are kept in
/// strictly ascending account id order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMember {
    pub account_id: AccountId,
    pub votes: u32,
}

impl StoredMember {
    /// Encoded size in bytes.
    pub const SIZE: usize = 8;

    pub fn new(account_id: AccountId, votes: u32) -> Self {
        Self { account_id, votes }
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&self.account_id.raw().to_be_bytes());
        out[4..].copy_from_slice(&self.votes.to_be_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.len() != Self::SIZE {
            return Err(StoreError::RecordSizeMismatch {
                len: bytes.len(),
                record_size: Self::SIZE as u32,
            });
        }
        let mut id = [0u8; 4];
        let mut votes = [0u8; 4];
        id.copy_from_slice(&bytes[..4]);
        votes.copy_from_slice(&bytes[4..]);
        Ok(Self {
            account_id: AccountId::new(u32::from_be_bytes(id)),
            votes: u32::from_be_bytes(votes),
        })
    }
}

/// Decode raw committee pages, as fetched page by page by an off-platform indexer,
/// back into the ordered member list.
pub fn decode_members<P: AsRef<[u8]>>(pages: &[P]) -> Result<Vec<StoredMember>, StoreError> {
    let mut members = Vec::new();
    for page in pages {
        let page = page.as_ref();
        if page.len() % StoredMember::SIZE != 0 {
            return Err(StoreError::RecordSizeMismatch {
                len: page.len(),
                record_size: StoredMember::SIZE as u32,
            });
        }
        for chunk in page.chunks_exact(StoredMember::SIZE) {
            members.push(StoredMember::decode(chunk)?);
        }
    }
    Ok(members)
}
