//! Error types for call status resolution

use thiserror::Error;

use crate::status::{ActionKind, CallStatus};
use crate::types::CallId;

/// Result type for call status operations
pub type Result<T> = std::result::Result<T, CallStatusError>;

/// Errors that can occur while resolving a call status
#[derive(Debug, Error)]
pub enum CallStatusError {
    /// History resolution was requested for a session without an invite
    #[error("No invite event in history for call {call_id}")]
    MissingInvite { call_id: CallId },

    /// The requested action is not available in the current status
    #[error("Action {action} is not offered for call {call_id} in status {status}")]
    ActionNotOffered {
        call_id: CallId,
        action: ActionKind,
        status: CallStatus,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An event or session document is structurally invalid
    #[error("Invalid event: {message}")]
    InvalidEvent { message: String },

    /// Session document could not be decoded
    #[error("Session document error: {0}")]
    Document(#[from] serde_json::Error),
}

impl CallStatusError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid event error
    pub fn invalid_event(message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            message: message.into(),
        }
    }

    /// Create a missing invite error
    pub fn missing_invite(call_id: &CallId) -> Self {
        Self::MissingInvite {
            call_id: call_id.clone(),
        }
    }
}

impl From<toml::de::Error> for CallStatusError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}
