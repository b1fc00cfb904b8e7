//! Input types for call status resolution
//!
//! Everything in this module is supplied by the calling context: the live
//! call registry provides [`LiveCall`] snapshots and the event store provides
//! the ordered [`SignalEvent`] history of a session. The resolver only reads
//! these values; it never mutates or retains them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Stable identifier correlating a live call with its signaling history
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(pub String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Signaling state of a call that is still tracked in memory
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveCallState {
    Fledgling,
    WaitingLocalMedia,
    CreatingOffer,
    InviteSent,
    Connecting,
    CreatingAnswer,
    Connected,
    OnHold,
    RemotelyOnHold,
    Ringing,
    Ended,
    InviteExpired,
    AnsweredElsewhere,
    /// Any state name this version does not know about
    #[serde(other)]
    Unrecognized,
}

/// Why a live call reached [`LiveCallState::Ended`]
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Unknown,
    Hangup,
    HangupElsewhere,
    RemoteHangup,
    AnsweredElsewhere,
    Missed,
    Busy,
    /// Any reason name this version does not know about
    #[serde(other)]
    Unrecognized,
}

impl Default for EndReason {
    fn default() -> Self {
        EndReason::Unknown
    }
}

/// Snapshot of a live call as handed out by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveCall {
    pub state: LiveCallState,
    pub is_incoming: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
}

impl LiveCall {
    pub fn new(state: LiveCallState, is_incoming: bool) -> Self {
        Self {
            state,
            is_incoming,
            end_reason: None,
        }
    }

    /// Mark the call as ended for the given reason
    pub fn ended(is_incoming: bool, reason: EndReason) -> Self {
        Self {
            state: LiveCallState::Ended,
            is_incoming,
            end_reason: Some(reason),
        }
    }
}

/// Read-only view of one call session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSessionView {
    pub call_id: CallId,
    /// Direction relative to the local user
    pub is_incoming: bool,
    #[serde(default)]
    pub is_video: bool,
    /// Present only while the call object exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_state: Option<LiveCallState>,
    /// Set when `live_state` is [`LiveCallState::Ended`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_end_reason: Option<EndReason>,
}

impl CallSessionView {
    /// A session reconstructed purely from stored history
    pub fn from_history(call_id: impl Into<CallId>, is_incoming: bool) -> Self {
        Self {
            call_id: call_id.into(),
            is_incoming,
            is_video: false,
            live_state: None,
            live_end_reason: None,
        }
    }

    /// A session backed by a live call snapshot
    pub fn from_live(call_id: impl Into<CallId>, call: LiveCall) -> Self {
        Self {
            call_id: call_id.into(),
            is_incoming: call.is_incoming,
            is_video: false,
            live_state: Some(call.state),
            live_end_reason: call.end_reason,
        }
    }

    pub fn with_video(mut self, is_video: bool) -> Self {
        self.is_video = is_video;
        self
    }

    /// Which input shape drives resolution for this session
    pub fn source(&self) -> CallSource {
        match self.live_state {
            Some(state) => CallSource::Live(LiveCall {
                state,
                is_incoming: self.is_incoming,
                end_reason: self.live_end_reason,
            }),
            None => CallSource::History {
                is_incoming: self.is_incoming,
            },
        }
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The two input shapes the resolver accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSource {
    /// A live call object exists for the session
    Live(LiveCall),
    /// No live call; status is reconstructed from the event history
    History { is_incoming: bool },
}

/// Kind of a recorded signaling event
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Invite,
    Ringing,
    Answer,
    Reject,
    Hangup,
    Expired,
    /// Any other call event (candidates, negotiation, ...); never drives status
    #[serde(other)]
    Unrecognized,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::Invite => "invite",
            SignalKind::Ringing => "ringing",
            SignalKind::Answer => "answer",
            SignalKind::Reject => "reject",
            SignalKind::Hangup => "hangup",
            SignalKind::Expired => "expired",
            SignalKind::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

/// Reason carried by a hangup event
///
/// On the wire this is a plain string; `user_hangup` is the only value with
/// special meaning, everything else is kept verbatim in [`HangupReason::Other`].
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HangupReason {
    UserHangup,
    Other(String),
}

impl HangupReason {
    pub const USER_HANGUP: &'static str = "user_hangup";
}

impl From<String> for HangupReason {
    fn from(reason: String) -> Self {
        if reason == Self::USER_HANGUP {
            HangupReason::UserHangup
        } else {
            HangupReason::Other(reason)
        }
    }
}

impl From<HangupReason> for String {
    fn from(reason: HangupReason) -> Self {
        match reason {
            HangupReason::UserHangup => HangupReason::USER_HANGUP.to_string(),
            HangupReason::Other(other) => other,
        }
    }
}

/// Decoded payload of a signaling event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventContent {
    /// Nothing of interest to status resolution
    #[default]
    Empty,
    Invite {
        #[serde(default)]
        is_video: bool,
    },
    Hangup {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<HangupReason>,
    },
    /// The payload could not be decoded
    Malformed,
}

impl EventContent {
    /// Decode a raw payload, falling back to [`EventContent::Malformed`]
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or(EventContent::Malformed)
    }
}

/// Event payloads that fail to decode never fail the surrounding document
fn lenient_content<'de, D>(deserializer: D) -> std::result::Result<EventContent, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(EventContent::from_value(value))
}

/// One recorded signaling event of a call session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub kind: SignalKind,
    pub sender_is_local_user: bool,
    pub timestamp_millis: i64,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: EventContent,
}

impl SignalEvent {
    pub fn new(kind: SignalKind, sender_is_local_user: bool, timestamp_millis: i64) -> Self {
        Self {
            kind,
            sender_is_local_user,
            timestamp_millis,
            content: EventContent::Empty,
        }
    }

    pub fn invite(sender_is_local_user: bool, timestamp_millis: i64, is_video: bool) -> Self {
        Self::new(SignalKind::Invite, sender_is_local_user, timestamp_millis)
            .with_content(EventContent::Invite { is_video })
    }

    pub fn answer(sender_is_local_user: bool, timestamp_millis: i64) -> Self {
        Self::new(SignalKind::Answer, sender_is_local_user, timestamp_millis)
    }

    pub fn reject(sender_is_local_user: bool, timestamp_millis: i64) -> Self {
        Self::new(SignalKind::Reject, sender_is_local_user, timestamp_millis)
    }

    pub fn hangup(
        sender_is_local_user: bool,
        timestamp_millis: i64,
        reason: Option<HangupReason>,
    ) -> Self {
        Self::new(SignalKind::Hangup, sender_is_local_user, timestamp_millis)
            .with_content(EventContent::Hangup { reason })
    }

    pub fn with_content(mut self, content: EventContent) -> Self {
        self.content = content;
        self
    }

    pub fn is(&self, kind: SignalKind) -> bool {
        self.kind == kind
    }

    /// Whether the invite content announces a video call
    pub fn is_video_invite(&self) -> bool {
        matches!(self.content, EventContent::Invite { is_video: true })
    }
}

/// First event of the given kind, in history order
pub fn first_of(events: &[SignalEvent], kind: SignalKind) -> Option<&SignalEvent> {
    events.iter().find(|event| event.is(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangup_reason_wire_format() {
        let reason: HangupReason = serde_json::from_str("\"user_hangup\"").unwrap();
        assert_eq!(reason, HangupReason::UserHangup);

        let reason: HangupReason = serde_json::from_str("\"ice_failed\"").unwrap();
        assert_eq!(reason, HangupReason::Other("ice_failed".to_string()));
        assert_eq!(serde_json::to_string(&reason).unwrap(), "\"ice_failed\"");
    }

    #[test]
    fn test_unrecognized_enum_names_fall_back() {
        let state: LiveCallState = serde_json::from_str("\"transferring\"").unwrap();
        assert_eq!(state, LiveCallState::Unrecognized);

        let reason: EndReason = serde_json::from_str("\"declined_by_policy\"").unwrap();
        assert_eq!(reason, EndReason::Unrecognized);
    }

    #[test]
    fn test_unknown_event_kind_is_unrecognized() {
        let event: SignalEvent = serde_json::from_str(
            r#"{"kind":"candidates","sender_is_local_user":true,"timestamp_millis":5}"#,
        )
        .unwrap();
        assert_eq!(event.kind, SignalKind::Unrecognized);
    }

    #[test]
    fn test_undecodable_content_is_malformed() {
        let event: SignalEvent = serde_json::from_str(
            r#"{"kind":"hangup","sender_is_local_user":false,"timestamp_millis":5,
                "content":{"type":"hangup","reason":42}}"#,
        )
        .unwrap();
        assert_eq!(event.content, EventContent::Malformed);

        for raw in [r#""hangup""#, "null", r#"{"type":"negotiate"}"#, r#"{"reason":"user_hangup"}"#] {
            let value: serde_json::Value = serde_json::from_str(raw).unwrap();
            assert_eq!(EventContent::from_value(value), EventContent::Malformed, "{}", raw);
        }
    }

    #[test]
    fn test_invite_without_video_flag_is_voice() {
        let value = serde_json::json!({ "type": "invite" });
        assert_eq!(EventContent::from_value(value), EventContent::Invite { is_video: false });
    }

    #[test]
    fn test_event_content_defaults_to_empty() {
        let event: SignalEvent = serde_json::from_str(
            r#"{"kind":"answer","sender_is_local_user":false,"timestamp_millis":1000}"#,
        )
        .unwrap();
        assert_eq!(event.content, EventContent::Empty);
        assert_eq!(event, SignalEvent::answer(false, 1000));
    }

    #[test]
    fn test_session_source_selection() {
        let history = CallSessionView::from_history("c1", true);
        assert_eq!(history.source(), CallSource::History { is_incoming: true });

        let live = CallSessionView::from_live("c1", LiveCall::ended(false, EndReason::Busy));
        assert_eq!(
            live.source(),
            CallSource::Live(LiveCall {
                state: LiveCallState::Ended,
                is_incoming: false,
                end_reason: Some(EndReason::Busy),
            })
        );
    }

    #[test]
    fn test_first_of_keeps_history_order() {
        let events = vec![
            SignalEvent::invite(false, 0, true),
            SignalEvent::hangup(true, 10, Some(HangupReason::UserHangup)),
            SignalEvent::hangup(false, 20, None),
        ];
        let hangup = first_of(&events, SignalKind::Hangup).unwrap();
        assert_eq!(hangup.timestamp_millis, 10);
        assert!(events[0].is_video_invite());
        assert!(first_of(&events, SignalKind::Answer).is_none());
    }
}
