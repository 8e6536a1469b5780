use thiserror::Error;

/// Message reported when the bearer credential is absent.
pub const MISSING_CONFIGURATION: &str = "Missing configuration";

/// Message reported when no workspace base URL was supplied.
pub const MISSING_ENDPOINT: &str = "Missing workspace endpoint";

/// Failure taxonomy of the workspace tool layer.
///
/// The `Display` text of every variant is exactly the message handed back to
/// the caller inside a failed `CommandResult`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Missing endpoint or credential, or an invalid retry configuration.
    #[error("{0}")]
    Configuration(String),

    /// Malformed command parameters.
    #[error("{0}")]
    Validation(String),

    /// Connection failure, timeout, or non-2xx status. Retried.
    #[error("{0}")]
    Transport(String),

    /// A 2xx response whose body could not be used. Never retried.
    #[error("{0}")]
    Protocol(String),

    #[error("Request failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl ToolError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::Transport(_))
    }
}
