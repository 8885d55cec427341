//! Per-account committee offset hints.
//!
//! For every account the index keeps a short list of `(committee numeric id, offset)`
//! pairs: where that account's record sits inside each committee's paged store.
//! Lookups never scan committee storage.

use crate::OracleError;
use caucus_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position of an account's record inside one committee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetHint {
    pub committee: u16,
    pub offset: u16,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OffsetHintIndex {
    hints: HashMap<AccountId, Vec<OffsetHint>>,
}

impl OffsetHintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of `account` in committee `committee`, if hinted.
    pub fn get(&self, account: AccountId, committee: u16) -> Option<u16> {
        self.hints
            .get(&account)?
            .iter()
            .find(|hint| hint.committee == committee)
            .map(|hint| hint.offset)
    }

    /// All hints of `account`, in insertion order.
    pub fn for_account(&self, account: AccountId) -> &[OffsetHint] {
        self.hints.get(&account).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, account: AccountId, committee: u16) -> bool {
        self.get(account, committee).is_some()
    }

    /// Record that `account` sits at `offset` in `committee`.
    ///
    /// An account can hold at most one hint per committee.
    pub fn add(&mut self, account: AccountId, committee: u16, offset: u16) -> Result<(), OracleError> {
        let hints = self.hints.entry(account).or_default();
        if hints.iter().any(|hint| hint.committee == committee) {
            return Err(OracleError::OffsetAlreadyExists { account, committee });
        }
        hints.push(OffsetHint { committee, offset });
        Ok(())
    }

    /// Drop the hint of `account` for `committee`, keeping its other hints.
    pub fn remove(&mut self, account: AccountId, committee: u16) -> Result<u16, OracleError> {
        let hints = self
            .hints
            .get_mut(&account)
            .ok_or(OracleError::OffsetNotExists { account, committee })?;
        let position = hints
            .iter()
            .position(|hint| hint.committee == committee)
            .ok_or(OracleError::OffsetNotExists { account, committee })?;
        let removed = hints.remove(position);
        if hints.is_empty() {
            self.hints.remove(&account);
        }
        Ok(removed.offset)
    }
}
