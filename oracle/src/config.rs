//! Oracle configuration with TOML support.

use serde::{Deserialize, Serialize};

use crate::OracleError;
use caucus_store::StoredMember;

/// Configuration for a committee oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Bytes per member storage page. Fixed for a committee at registration.
    #[serde(default = "default_page_capacity")]
    pub page_capacity: u32,
}

fn default_page_capacity() -> u32 {
    2048
}

impl OracleConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, OracleError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| OracleError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, OracleError> {
        toml::from_str(s).map_err(|e| OracleError::Config(e.to_string()))
    }

    /// Pages must hold at least one member record.
    pub fn validate(&self) -> Result<(), OracleError> {
        if (self.page_capacity as usize) < StoredMember::SIZE {
            return Err(OracleError::Config(format!(
                "page_capacity {} is smaller than a member record",
                self.page_capacity
            )));
        }
        Ok(())
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, OracleError> {
        toml::to_string_pretty(self).map_err(|e| OracleError::Config(e.to_string()))
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            page_capacity: default_page_capacity(),
        }
    }
}
