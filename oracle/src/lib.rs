//! Committee oracle.
//!
//! Registers voting committees (time-bounded, fixed-size cohorts of weighted
//! members), ingests their members into append-only paged storage in strictly
//! ascending account id order, and answers voting power queries in O(1) through
//! per-account offset hints.
//!
//! Lifecycle of a committee:
//! register → ingest (one or more batches) → complete → (uningest from the tail → unregister)

pub mod committee;
pub mod config;
pub mod error;
pub mod hints;
pub mod oracle;
pub mod reader;

pub use committee::{AccountRecord, CommitteeMetadata, MemberInput};
pub use config::OracleConfig;
pub use error::OracleError;
pub use hints::{OffsetHint, OffsetHintIndex};
pub use oracle::{CommitteeOracle, MAX_COMMITTEE_MEMBERS};
pub use reader::{CommitteePages, MembershipOracle};
