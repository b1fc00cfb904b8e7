//! Recorded session documents
//!
//! A session document is the JSON form of everything the resolver needs for
//! one call: the optional live call snapshot and the signaling history.
//!
//! ```json
//! {
//!   "call_id": "call-42",
//!   "live": { "state": "ended", "is_incoming": true, "end_reason": "busy" },
//!   "events": [
//!     { "kind": "invite", "sender_is_local_user": false, "timestamp_millis": 0,
//!       "content": { "type": "invite", "is_video": false } },
//!     { "kind": "answer", "sender_is_local_user": true, "timestamp_millis": 1000 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{CallStatusError, Result};
use crate::resolver::StatusResolver;
use crate::status::Resolution;
use crate::types::{first_of, CallId, CallSessionView, LiveCall, SignalEvent, SignalKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub call_id: CallId,
    /// Direction override; otherwise taken from the live call or the invite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_incoming: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<LiveCall>,
    #[serde(default)]
    pub events: Vec<SignalEvent>,
}

impl SessionDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        let document: SessionDocument = serde_json::from_str(text)?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CallStatusError::invalid_event(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Check the history invariants: at most one invite, timestamps never
    /// decreasing
    pub fn validate(&self) -> Result<()> {
        let invites = self.events.iter().filter(|e| e.is(SignalKind::Invite)).count();
        if invites > 1 {
            return Err(CallStatusError::invalid_event(format!(
                "call {} has {} invite events",
                self.call_id, invites
            )));
        }

        if let Some(pair) = self
            .events
            .windows(2)
            .find(|pair| pair[1].timestamp_millis < pair[0].timestamp_millis)
        {
            return Err(CallStatusError::invalid_event(format!(
                "{} at {} is recorded after {} at {}",
                pair[1].kind, pair[1].timestamp_millis, pair[0].kind, pair[0].timestamp_millis
            )));
        }
        Ok(())
    }

    /// The session view the resolver works on
    pub fn session_view(&self) -> CallSessionView {
        let invite = first_of(&self.events, SignalKind::Invite);
        let is_video = invite.map_or(false, |invite| invite.is_video_invite());

        let mut view = match self.live {
            Some(call) => CallSessionView::from_live(self.call_id.clone(), call),
            None => {
                let is_incoming = invite.map_or(false, |invite| !invite.sender_is_local_user);
                CallSessionView::from_history(self.call_id.clone(), is_incoming)
            }
        };
        if let Some(is_incoming) = self.is_incoming {
            view.is_incoming = is_incoming;
        }
        view.with_video(is_video)
    }

    pub fn resolve(&self, resolver: &StatusResolver, now_millis: i64) -> Result<Resolution> {
        let view = self.session_view();
        debug!(call_id = %self.call_id, live = view.live_state.is_some(), "Resolving session document");
        resolver.resolve(&view, &self.events, now_millis)
    }
}
