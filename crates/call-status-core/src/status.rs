//! Resolution output types
//!
//! A [`Resolution`] is a pure snapshot: it is recomputed from the current
//! inputs every time and never mutated in place. The presentation layer turns
//! its [`MessageKey`] into localized text and its [`ActionSpec`]s into
//! buttons; the action dispatch layer turns a chosen action into an
//! [`ActionRequest`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::CallId;

/// Discrete presentation status of a call session
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Unknown,
    Ringing,
    Active,
    Declined,
    Missed,
    Ended,
    Failed,
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallStatus::Unknown => "unknown",
            CallStatus::Ringing => "ringing",
            CallStatus::Active => "active",
            CallStatus::Declined => "declined",
            CallStatus::Missed => "missed",
            CallStatus::Ended => "ended",
            CallStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Identifier of the status text, plus its interpolation argument
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum MessageKey {
    /// "You are currently in a call"
    YouAreInCall,
    /// "You started a call"
    YouStartedCall,
    /// "Call ended" with the pre-formatted duration (may be empty)
    CallEnded { duration: String },
    YouMissedCall,
    YouDeclined,
    ConnectionFailed,
}

impl MessageKey {
    /// Stable key for the localization lookup
    pub fn localization_key(&self) -> &'static str {
        match self {
            MessageKey::YouAreInCall => "call_status.you_currently_in",
            MessageKey::YouStartedCall => "call_status.you_started",
            MessageKey::CallEnded { .. } => "call_status.call_ended",
            MessageKey::YouMissedCall => "call_status.you_missed",
            MessageKey::YouDeclined => "call_status.you_declined",
            MessageKey::ConnectionFailed => "call_status.connection_failed",
        }
    }

    /// Interpolation argument for the localized text, if any
    pub fn argument(&self) -> Option<&str> {
        match self {
            MessageKey::CallEnded { duration } => Some(duration),
            _ => None,
        }
    }
}

/// Default English rendering, used when no localization layer is present
impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKey::YouAreInCall => f.write_str("You're currently in a call"),
            MessageKey::YouStartedCall => f.write_str("You started a call"),
            MessageKey::CallEnded { duration } if duration.is_empty() => f.write_str("Call ended"),
            MessageKey::CallEnded { duration } => write!(f, "Call ended • {}", duration),
            MessageKey::YouMissedCall => f.write_str("You missed this call"),
            MessageKey::YouDeclined => f.write_str("You declined this call"),
            MessageKey::ConnectionFailed => f.write_str("Connection failed"),
        }
    }
}

/// What a user action does once triggered
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Answer,
    Decline,
    /// Place a new call to the same peer; used for both "call back" and "retry"
    CallBack,
}

impl ActionKind {
    /// Stable action identifier handed to the dispatch layer
    pub fn identifier(&self) -> &'static str {
        match self {
            ActionKind::Answer => "call_status.answer",
            ActionKind::Decline => "call_status.decline",
            ActionKind::CallBack => "call_status.call_back",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Presentation label of an action button
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionLabel {
    Decline,
    Answer,
    CallBack,
    Retry,
}

/// Visual weight of an action button
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStyle {
    Positive,
    Negative,
}

/// One action offered for the current status
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub kind: ActionKind,
    pub call_id: CallId,
    pub label: ActionLabel,
    pub style: ActionStyle,
}

impl ActionSpec {
    pub fn answer(call_id: CallId) -> Self {
        Self {
            kind: ActionKind::Answer,
            call_id,
            label: ActionLabel::Answer,
            style: ActionStyle::Positive,
        }
    }

    pub fn decline(call_id: CallId) -> Self {
        Self {
            kind: ActionKind::Decline,
            call_id,
            label: ActionLabel::Decline,
            style: ActionStyle::Negative,
        }
    }

    pub fn call_back(call_id: CallId) -> Self {
        Self {
            kind: ActionKind::CallBack,
            call_id,
            label: ActionLabel::CallBack,
            style: ActionStyle::Positive,
        }
    }

    /// Same action as [`ActionSpec::call_back`], labelled for a failed call
    pub fn retry(call_id: CallId) -> Self {
        Self {
            label: ActionLabel::Retry,
            ..Self::call_back(call_id)
        }
    }

    /// Build the request the outer layer needs to carry out this action
    pub fn request(&self, is_video: bool) -> ActionRequest {
        ActionRequest {
            kind: self.kind,
            call_id: self.call_id.clone(),
            is_video,
        }
    }
}

/// A triggered action, ready for outbound signaling
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub call_id: CallId,
    /// Call type of the original invite, reused when calling back
    pub is_video: bool,
}

/// Status, message, duration and actions for a session at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub status: CallStatus,
    pub message: Option<MessageKey>,
    /// Elapsed call time in seconds, never negative
    pub duration_seconds: f64,
    /// Formatted duration; empty when the call never started
    pub duration_text: String,
    pub actions: Vec<ActionSpec>,
}

impl Resolution {
    /// Resolution for a session whose status cannot be determined
    pub fn unknown() -> Self {
        Self {
            status: CallStatus::Unknown,
            message: None,
            duration_seconds: 0.0,
            duration_text: String::new(),
            actions: Vec::new(),
        }
    }

    pub fn action_kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(|action| action.kind).collect()
    }

    /// Find the offered action of the given kind
    pub fn action(&self, kind: ActionKind) -> Option<&ActionSpec> {
        self.actions.iter().find(|action| action.kind == kind)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}
