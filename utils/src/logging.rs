//! Structured logging initialisation.
//!
//! Two output formats are supported:
//! - [`LogFormat::Human`]: readable lines for development.
//! - [`LogFormat::Json`]: newline-delimited JSON for log aggregation.
//!
//! The filter level can be overridden at runtime via the `RUST_LOG`
//! environment variable. When `RUST_LOG` is not set, the caller-supplied
//! `level` string is used (e.g. `"info"`, `"debug,caucus_delegator=trace"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::{fmt as layer_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoggingError {
    #[error("unknown log format {0:?}, expected \"human\" or \"json\"")]
    UnknownFormat(String),

    #[error("invalid log filter {level:?}: {reason}")]
    InvalidFilter { level: String, reason: String },

    #[error("global subscriber already set: {0}")]
    AlreadyInitialised(String),
}

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => f.write_str("human"),
            Self::Json => f.write_str("json"),
        }
    }
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidFilter {
            level: level.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Install the global tracing subscriber.
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn try_init_logging(format: LogFormat, level: &str) -> Result<(), LoggingError> {
    let filter = build_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Human => registry
            .with(layer_fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(layer_fmt::layer().json().with_target(true))
            .try_init(),
    };
    result.map_err(|e| LoggingError::AlreadyInitialised(e.to_string()))
}

/// Install the global tracing subscriber, keeping an existing one.
///
/// Used by tests and embedders that may initialise more than once.
pub fn init_logging(format: LogFormat, level: &str) {
    if let Err(e) = try_init_logging(format, level) {
        tracing::debug!(error = %e, "logging not initialised");
    }
}
