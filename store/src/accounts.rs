//! Identity → account id registry.
//!
//! Ids are handed out once, in strictly increasing order starting at 1, and are
//! never reused or reassigned for the lifetime of the registry.

use crate::StoreError;
use caucus_types::{AccountId, Identity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Id lookup and creation shared by every registry that needs small account ids.
///
/// Implementors provide the two primitives; the get-or-create helpers come for free.
pub trait AccountIds {
    /// The id assigned to `identity`, if any.
    fn lookup(&self, identity: &Identity) -> Option<AccountId>;

    /// The most recently assigned id (`AccountId::UNASSIGNED` before the first).
    fn last_account_id(&self) -> AccountId;

    /// Assign the next id to `identity`.
    ///
    /// Fails with [`StoreError::AccountExists`] if the identity already has one.
    fn create_account_id(&mut self, identity: &Identity) -> Result<AccountId, StoreError>;

    /// The id of `identity`, or `AccountId::UNASSIGNED` when absent.
    fn get_id_if_exists(&self, identity: &Identity) -> AccountId {
        self.lookup(identity).unwrap_or(AccountId::UNASSIGNED)
    }

    fn must_get_id(&self, identity: &Identity) -> Result<AccountId, StoreError> {
        self.lookup(identity)
            .ok_or(StoreError::AccountNotExists(*identity))
    }

    fn get_or_create_id(&mut self, identity: &Identity) -> Result<AccountId, StoreError> {
        match self.lookup(identity) {
            Some(id) => Ok(id),
            None => self.create_account_id(identity),
        }
    }
}

/// In-memory account id registry with an owned monotonic counter.
///
/// Ordered by identity so that serialized snapshots are canonical.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountRegistry {
    ids: BTreeMap<Identity, AccountId>,
    last_id: u32,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities with an id.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl AccountIds for AccountRegistry {
    fn lookup(&self, identity: &Identity) -> Option<AccountId> {
        self.ids.get(identity).copied()
    }

    fn last_account_id(&self) -> AccountId {
        AccountId::new(self.last_id)
    }

    fn create_account_id(&mut self, identity: &Identity) -> Result<AccountId, StoreError> {
        if self.ids.contains_key(identity) {
            return Err(StoreError::AccountExists(*identity));
        }
        let next = self
            .last_id
            .checked_add(1)
            .ok_or(StoreError::AccountIdsExhausted)?;
        self.last_id = next;
        let id = AccountId::new(next);
        self.ids.insert(*identity, id);
        tracing::trace!(account = %identity, id = next, "assigned account id");
        Ok(id)
    }
}

/// Get-or-create resolution against a read-only registry.
///
/// Identities without an id receive the provisional ids that
/// [`AccountIds::create_account_id`] will hand out once [`commit_staged`]
/// replays them in order. Lets a multi-member call validate everything before
/// mutating the registry.
pub struct StagedAccounts<'a, R: AccountIds + ?Sized> {
    registry: &'a R,
    staged: HashMap<Identity, AccountId>,
    created: Vec<Identity>,
    next: u32,
}

impl<'a, R: AccountIds + ?Sized> StagedAccounts<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            staged: HashMap::new(),
            created: Vec::new(),
            next: registry.last_account_id().raw(),
        }
    }

    /// Existing id, previously staged id, or a fresh provisional id.
    pub fn get_or_stage(&mut self, identity: &Identity) -> Result<AccountId, StoreError> {
        if let Some(id) = self.registry.lookup(identity) {
            return Ok(id);
        }
        if let Some(id) = self.staged.get(identity) {
            return Ok(*id);
        }
        self.next = self
            .next
            .checked_add(1)
            .ok_or(StoreError::AccountIdsExhausted)?;
        let id = AccountId::new(self.next);
        self.staged.insert(*identity, id);
        self.created.push(*identity);
        Ok(id)
    }

    /// Whether `identity` only has a provisional id.
    pub fn is_staged(&self, identity: &Identity) -> bool {
        self.staged.contains_key(identity)
    }

    /// Identities that need an id, in the order their provisional ids were handed out.
    pub fn into_created(self) -> Vec<Identity> {
        self.created
    }
}

/// Create ids for the staged identities. They receive exactly their provisional ids.
pub fn commit_staged<R: AccountIds + ?Sized>(
    registry: &mut R,
    created: &[Identity],
) -> Result<(), StoreError> {
    for identity in created {
        registry.create_account_id(identity)?;
    }
    Ok(())
}
