//! Delegator configuration with TOML support.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DelegatorError;
use caucus_utils::LogFormat;

/// How non-voting hours count when internal results are scaled to external votes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsenteeMode {
    /// Scale by all hours of the covered periods; absentees dilute the result.
    #[default]
    Strict,
    /// Scale by the hours that actually voted.
    Scaled,
}

impl fmt::Display for AbsenteeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Scaled => f.write_str("scaled"),
        }
    }
}

/// Configuration for a delegator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorConfig {
    /// Length of one algohour period; period keys must be multiples of it.
    #[serde(default = "default_period_length")]
    pub period_length: u64,

    /// Seconds between the internal vote deadline and the external one.
    #[serde(default = "default_vote_submit_threshold")]
    pub vote_submit_threshold: u64,

    #[serde(default)]
    pub absentee_mode: AbsenteeMode,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_period_length() -> u64 {
    1_000_000
}

fn default_vote_submit_threshold() -> u64 {
    3 * 3600
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DelegatorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, DelegatorError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DelegatorError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DelegatorError> {
        let config: Self = toml::from_str(s).map_err(|e| DelegatorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DelegatorError> {
        toml::to_string_pretty(self).map_err(|e| DelegatorError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), DelegatorError> {
        if self.period_length == 0 {
            return Err(DelegatorError::Config(
                "period_length must be greater than zero".to_string(),
            ));
        }
        self.log_format()?;
        Ok(())
    }

    /// The parsed `log_format`, for passing to `caucus_utils::init_logging`.
    pub fn log_format(&self) -> Result<LogFormat, DelegatorError> {
        self.log_format
            .parse()
            .map_err(|e: caucus_utils::LoggingError| DelegatorError::Config(e.to_string()))
    }
}

impl Default for DelegatorConfig {
    fn default() -> Self {
        Self {
            period_length: default_period_length(),
            vote_submit_threshold: default_vote_submit_threshold(),
            absentee_mode: AbsenteeMode::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
