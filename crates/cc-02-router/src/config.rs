//! Router configuration with validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default function name for the init phase.
pub const DEFAULT_INIT_FUNCTION: &str = "init";

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Name used in log records.
    pub name: String,
    /// Function name used when the init invocation carries none.
    pub init_function: String,
    /// Reject invocations with more arguments than declared parameters.
    pub strict_args: bool,
    /// Log every invocation at `info`; otherwise at `debug`.
    pub log_invocations: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            name: "chaincode".to_string(),
            init_function: DEFAULT_INIT_FUNCTION.to_string(),
            strict_args: false,
            log_invocations: false,
        }
    }
}

impl RouterConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name cannot be empty".into()));
        }

        if self.init_function.trim().is_empty() {
            return Err(ConfigError::InvalidFunctionName(
                "init_function cannot be empty".into(),
            ));
        }

        if self.init_function.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidFunctionName(format!(
                "init_function {:?} contains whitespace",
                self.init_function
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Function name unusable for routing
    #[error("invalid function name: {0}")]
    InvalidFunctionName(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
