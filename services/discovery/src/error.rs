//! Error taxonomy for the discovery service.
//!
//! A closed set of failure kinds, each mapped to a process exit code. There
//! is no retry anywhere: every error is fatal and the supervisor restarts
//! the whole process, which rebuilds all state from the API on the next
//! cycle anyway.

use thiserror::Error;

/// Exit code when the calling identity lacks permission on the API.
pub const EXIT_ACCESS_DENIED: i32 = 10;

/// Exit code for every other unrecoverable error.
pub const EXIT_FAILURE: i32 = 20;

/// Discovery failures.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The API rejected the call for lack of permission.
    #[error("access denied by orchestration API: {message}")]
    AccessDenied { message: String },

    /// Any other API-level failure (throttling, malformed response, ...).
    #[error("orchestration API call failed: {message}")]
    Api { message: String },

    /// Transport-level failure reaching the API.
    #[error("orchestration API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failure serializing the discovery file.
    #[error("failed to serialize discovery targets: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failure writing the discovery file.
    #[error("failed to write discovery file: {0}")]
    Io(#[from] std::io::Error),
}

impl DiscoveryError {
    /// The exit status the process terminates with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AccessDenied { .. } => EXIT_ACCESS_DENIED,
            Self::Api { .. } | Self::Transport(_) | Self::Serialize(_) | Self::Io(_) => {
                EXIT_FAILURE
            }
        }
    }
}
