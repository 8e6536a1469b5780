use crate::error::ToolError;
use crate::retry::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry settings for the workspace tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Total attempts per call, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-attempt timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        if self.max_retries == 0 {
            return Err(ToolError::Configuration(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ToolError::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
