//! Status resolution
//!
//! [`StatusResolver::resolve`] is the single entry point. It computes the
//! duration from the event history, then dispatches on the session's
//! [`CallSource`]:
//!
//! ```text
//!   CallSessionView ──source()──┬── Live(call) ──────▶ live::resolve_live
//!                               │                         │ (Ended + Busy)
//!                               │                         ▼
//!                               │                    rejected::resolve_rejected
//!                               │                         ▲
//!                               └── History ─────────▶ history::resolve_history
//!                                                         ├─▶ unanswered
//!                                                         └─▶ hangup
//! ```
//!
//! Every branch is total: unrecognized states and reasons fail open to
//! [`CallStatus::Ended`]. The only error is asking for a history resolution
//! of a session whose history holds no invite.

mod history;
mod live;
mod rejected;

use std::sync::Arc;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::duration::{call_duration, DurationFormatter, UnitDurationFormatter};
use crate::error::Result;
use crate::status::{ActionSpec, CallStatus, MessageKey, Resolution};
use crate::types::{CallId, CallSessionView, CallSource, SignalEvent};

/// Pure resolver from session inputs to a [`Resolution`]
///
/// Holds no per-call state; one instance can serve any number of sessions
/// concurrently.
#[derive(Clone)]
pub struct StatusResolver {
    formatter: Arc<dyn DurationFormatter>,
}

impl Default for StatusResolver {
    fn default() -> Self {
        Self::with_formatter(Arc::new(UnitDurationFormatter::default()))
    }
}

impl std::fmt::Debug for StatusResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusResolver").finish_non_exhaustive()
    }
}

impl StatusResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        Self::with_formatter(Arc::new(UnitDurationFormatter::new(config.duration.clone())))
    }

    pub fn with_formatter(formatter: Arc<dyn DurationFormatter>) -> Self {
        Self { formatter }
    }

    /// Resolve the status of one session at `now_millis`
    ///
    /// `events` is the chronologically ordered history of the session. It is
    /// always used for the duration, and for the status when the session has
    /// no live call.
    pub fn resolve(
        &self,
        session: &CallSessionView,
        events: &[SignalEvent],
        now_millis: i64,
    ) -> Result<Resolution> {
        let duration_seconds = call_duration(events, now_millis);
        let outcome = Outcome {
            call_id: session.call_id.clone(),
            duration_text: self.formatter.format(duration_seconds),
            duration_seconds,
        };

        let resolution = match session.source() {
            CallSource::Live(call) => live::resolve_live(&call, outcome),
            CallSource::History { is_incoming } => {
                history::resolve_history(&session.call_id, events, is_incoming, outcome)?
            }
        };

        debug!(
            call_id = %session.call_id,
            status = %resolution.status,
            duration = resolution.duration_seconds,
            actions = resolution.actions.len(),
            "Resolved call status"
        );
        Ok(resolution)
    }
}

/// Duration and payload shared by every branch; each branch finishes it
/// into a [`Resolution`]
#[derive(Debug, Clone)]
pub(crate) struct Outcome {
    call_id: CallId,
    duration_seconds: f64,
    duration_text: String,
}

impl Outcome {
    fn finish(
        self,
        status: CallStatus,
        message: Option<MessageKey>,
        actions: Vec<ActionSpec>,
    ) -> Resolution {
        Resolution {
            status,
            message,
            duration_seconds: self.duration_seconds,
            duration_text: self.duration_text,
            actions,
        }
    }

    pub(crate) fn active(self, message: MessageKey) -> Resolution {
        self.finish(CallStatus::Active, Some(message), Vec::new())
    }

    /// Incoming call waiting for the user; decline is listed first
    pub(crate) fn ringing(self) -> Resolution {
        let actions = vec![
            ActionSpec::decline(self.call_id.clone()),
            ActionSpec::answer(self.call_id.clone()),
        ];
        self.finish(CallStatus::Ringing, None, actions)
    }

    pub(crate) fn ended(self) -> Resolution {
        let message = MessageKey::CallEnded {
            duration: self.duration_text.clone(),
        };
        self.finish(CallStatus::Ended, Some(message), Vec::new())
    }

    pub(crate) fn declined(self) -> Resolution {
        let actions = vec![ActionSpec::call_back(self.call_id.clone())];
        self.finish(CallStatus::Declined, Some(MessageKey::YouDeclined), actions)
    }

    pub(crate) fn missed(self) -> Resolution {
        let actions = vec![ActionSpec::call_back(self.call_id.clone())];
        self.finish(CallStatus::Missed, Some(MessageKey::YouMissedCall), actions)
    }

    pub(crate) fn failed(self) -> Resolution {
        let actions = vec![ActionSpec::retry(self.call_id.clone())];
        self.finish(CallStatus::Failed, Some(MessageKey::ConnectionFailed), actions)
    }
}

#[cfg(test)]
pub(crate) fn test_outcome(call_id: &str, duration_seconds: f64, duration_text: &str) -> Outcome {
    Outcome {
        call_id: CallId::new(call_id),
        duration_seconds,
        duration_text: duration_text.to_string(),
    }
}
