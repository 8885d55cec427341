//! Shared utilities for caucus services.

pub mod logging;

pub use logging::{init_logging, try_init_logging, LogFormat, LoggingError};
