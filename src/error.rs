//! Custom error types for gitxp.
//!
//! Most failures in the wrapper are recovered locally with a fallback value
//! (see the `config` and `profile` modules); the variants here cover the
//! cases that must surface to the caller.

use thiserror::Error;

/// Main error type for gitxp operations
#[derive(Error, Debug)]
pub enum GitxpError {
    /// Git invocation failed
    #[error("Git operation failed: {operation} - {message}")]
    Git { operation: String, message: String },

    /// The wrapped git binary could not be located
    #[error("Missing required tool: {tool}")]
    MissingTool { tool: String },

    /// Profile storage failed
    #[error("Profile error: {message}")]
    Profile { message: String },

    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GitxpError {
    /// Create a git error
    pub fn git(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Git {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a profile error
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }
}

/// Type alias for gitxp results
pub type Result<T> = std::result::Result<T, GitxpError>;
