//! Nullable collaborators for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern: everything the delegator
//! talks to (time, the membership oracle, the external proposal registry and
//! its vote intake) sits behind a trait, and this crate provides in-memory
//! implementations that:
//! - Return exactly what the test configured
//! - Record what was written to them
//! - Can be told to fail
//!
//! Usage: swap real collaborators for nullables in tests.

pub mod clock;
pub mod oracle;
pub mod registry;
pub mod sink;

pub use clock::NullClock;
pub use oracle::NullOracle;
pub use registry::{NullProposal, NullProposalRegistry};
pub use sink::NullVoteSink;
