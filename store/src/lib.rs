//! Storage primitives shared by the committee oracle and the delegator.
//!
//! - [`AccountRegistry`]: identity → monotonically assigned [`AccountId`](caucus_types::AccountId).
//! - [`PagedMemberStore`]: append-only fixed-size records sharded across fixed-capacity pages.
//! - [`StoredMember`]: the 8-byte `(account id, votes)` record kept in committee pages.

pub mod accounts;
pub mod error;
pub mod member;
pub mod paged;

pub use accounts::{commit_staged, AccountIds, AccountRegistry, StagedAccounts};
pub use error::StoreError;
pub use member::{decode_members, StoredMember};
pub use paged::{PageSetMeta, PagedMemberStore};
