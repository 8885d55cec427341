//! Fundamental types for the caucus workspace.
//!
//! This crate defines the types shared by every other crate: identities, committee
//! content hashes, numeric ids, timestamps, the per-call authorization context and
//! the error categories every failure is classified into.

pub mod context;
pub mod error;
pub mod hash;
pub mod id;
pub mod identity;
pub mod time;

pub use context::CallContext;
pub use error::ErrorCategory;
pub use hash::CommitteeId;
pub use id::{AccountId, ProposalId};
pub use identity::Identity;
pub use time::Timestamp;
