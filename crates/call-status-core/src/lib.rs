//! # Call Status Core - Call status resolution for rvoip
//!
//! This crate derives what a call looks like to the user at a point in time.
//! Given either the live signaling state of a call or the recorded signaling
//! history of a session, it produces a single [`Resolution`]:
//!
//! - a discrete [`CallStatus`] (ringing, active, declined, missed, ended, failed)
//! - a [`MessageKey`] for the status text, with the formatted call duration
//! - the elapsed duration in seconds
//! - the [`ActionSpec`]s (answer / decline / call back) the user may trigger
//!
//! Resolution is a pure, synchronous computation. It performs no I/O, keeps
//! no state between calls and may run concurrently for any number of
//! sessions.
//!
//! ## Quick Start
//!
//! ```rust
//! use rvoip_call_status_core::{
//!     resolve, ActionKind, CallSessionView, CallStatus, HangupReason, LiveCall,
//!     LiveCallState, SignalEvent,
//! };
//!
//! // An incoming call that is ringing right now
//! let ringing = CallSessionView::from_live("call-1", LiveCall::new(LiveCallState::Ringing, true));
//! let resolution = resolve(&ringing, &[], 0).unwrap();
//! assert_eq!(resolution.status, CallStatus::Ringing);
//! assert_eq!(resolution.action_kinds(), vec![ActionKind::Decline, ActionKind::Answer]);
//!
//! // A finished call reconstructed from its history
//! let events = vec![
//!     SignalEvent::invite(false, 0, false),
//!     SignalEvent::answer(true, 1_000),
//!     SignalEvent::hangup(false, 76_000, Some(HangupReason::UserHangup)),
//! ];
//! let finished = CallSessionView::from_history("call-2", true);
//! let resolution = resolve(&finished, &events, 100_000).unwrap();
//! assert_eq!(resolution.status, CallStatus::Ended);
//! assert_eq!(resolution.duration_seconds, 75.0);
//! assert_eq!(resolution.duration_text, "1m 15s");
//! ```
//!
//! ## Architecture
//!
//! - [`types`]: inputs (session view, live call state, signaling events)
//! - [`status`]: outputs (status, message keys, actions, resolution)
//! - [`resolver`]: the live-state and event-history resolvers
//! - [`duration`]: duration computation and formatting
//! - [`service`]: collaborator seams and [`CallStatusService`]
//! - [`document`]: JSON session documents
//! - [`config`]: formatting configuration

pub mod config;
pub mod document;
pub mod duration;
pub mod error;
pub mod resolver;
pub mod service;
pub mod status;
pub mod types;

// Re-export main types
pub use config::{DurationFormatConfig, DurationStyle, DurationUnit, ResolverConfig};
pub use document::SessionDocument;
pub use duration::{call_duration, DurationFormatter, UnitDurationFormatter};
pub use error::{CallStatusError, Result};
pub use resolver::StatusResolver;
pub use service::{
    CallStatusService, Clock, EventHistoryProvider, FixedClock, InMemoryCallRegistry,
    InMemoryEventHistory, LiveCallRegistry, SystemClock,
};
pub use status::{
    ActionKind, ActionLabel, ActionRequest, ActionSpec, ActionStyle, CallStatus, MessageKey,
    Resolution,
};
pub use types::{
    CallId, CallSessionView, CallSource, EndReason, EventContent, HangupReason, LiveCall,
    LiveCallState, SignalEvent, SignalKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve a session with the default resolver configuration
///
/// See [`StatusResolver::resolve`].
pub fn resolve(
    session: &CallSessionView,
    events: &[SignalEvent],
    now_millis: i64,
) -> Result<Resolution> {
    StatusResolver::default().resolve(session, events, now_millis)
}
