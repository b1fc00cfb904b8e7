//! Collaborator seams and the call status service
//!
//! The resolver itself is a pure function. [`CallStatusService`] wires it to
//! the collaborators that own the inputs: an [`EventHistoryProvider`] for
//! the stored signaling history, a [`LiveCallRegistry`] for calls still held
//! in memory, and a [`Clock`] for "now".
//!
//! ```rust
//! use std::sync::Arc;
//! use rvoip_call_status_core::{
//!     CallId, CallStatus, CallStatusService, FixedClock, InMemoryCallRegistry,
//!     InMemoryEventHistory, SignalEvent,
//! };
//!
//! let history = Arc::new(InMemoryEventHistory::new());
//! let call_id = CallId::new("call-1");
//! history.record(&call_id, SignalEvent::invite(false, 0, true)).unwrap();
//!
//! let service = CallStatusService::new(
//!     history,
//!     Arc::new(InMemoryCallRegistry::new()),
//!     Arc::new(FixedClock::new(60_000)),
//! );
//!
//! let resolution = service.status_for(&call_id).unwrap();
//! assert_eq!(resolution.status, CallStatus::Missed);
//! ```

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{CallStatusError, Result};
use crate::resolver::StatusResolver;
use crate::status::{ActionKind, ActionRequest, Resolution};
use crate::types::{first_of, CallId, CallSessionView, LiveCall, SignalEvent, SignalKind};

/// Source of the ordered signaling history of a call
pub trait EventHistoryProvider: Send + Sync {
    fn events_for(&self, call_id: &CallId) -> Vec<SignalEvent>;
}

/// Lookup of calls that are still tracked in memory
pub trait LiveCallRegistry: Send + Sync {
    fn live_call(&self, call_id: &CallId) -> Option<LiveCall>;
}

/// Current time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(i64);

impl FixedClock {
    pub fn new(now_millis: i64) -> Self {
        Self(now_millis)
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Event history kept in memory, ordered by timestamp per call
#[derive(Debug, Default)]
pub struct InMemoryEventHistory {
    events: DashMap<CallId, Vec<SignalEvent>>,
}

impl InMemoryEventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event, keeping the history ordered by timestamp
    ///
    /// Events with equal timestamps keep their arrival order. A second
    /// invite for the same call is rejected.
    pub fn record(&self, call_id: &CallId, event: SignalEvent) -> Result<()> {
        let mut events = self.events.entry(call_id.clone()).or_default();

        if event.is(SignalKind::Invite) && first_of(&events, SignalKind::Invite).is_some() {
            return Err(CallStatusError::invalid_event(format!(
                "call {} already has an invite",
                call_id
            )));
        }

        let position = events
            .iter()
            .position(|existing| existing.timestamp_millis > event.timestamp_millis)
            .unwrap_or(events.len());
        debug!(%call_id, kind = %event.kind, position, "Recording signal event");
        events.insert(position, event);
        Ok(())
    }

    /// Drop the history of a call
    pub fn forget(&self, call_id: &CallId) {
        self.events.remove(call_id);
    }

    /// Number of calls with recorded history
    pub fn call_count(&self) -> usize {
        self.events.len()
    }
}

impl EventHistoryProvider for InMemoryEventHistory {
    fn events_for(&self, call_id: &CallId) -> Vec<SignalEvent> {
        self.events
            .get(call_id)
            .map(|events| events.value().clone())
            .unwrap_or_default()
    }
}

/// Registry of live calls kept in memory
#[derive(Debug, Default)]
pub struct InMemoryCallRegistry {
    calls: DashMap<CallId, LiveCall>,
}

impl InMemoryCallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the snapshot of a live call
    pub fn update(&self, call_id: &CallId, call: LiveCall) {
        debug!(%call_id, state = ?call.state, "Live call updated");
        self.calls.insert(call_id.clone(), call);
    }

    /// Remove a call once its call object is torn down
    pub fn remove(&self, call_id: &CallId) -> Option<LiveCall> {
        self.calls.remove(call_id).map(|(_, call)| call)
    }
}

impl LiveCallRegistry for InMemoryCallRegistry {
    fn live_call(&self, call_id: &CallId) -> Option<LiveCall> {
        self.calls.get(call_id).map(|call| *call)
    }
}

/// Resolves call status by call id using the configured collaborators
#[derive(Clone)]
pub struct CallStatusService {
    history: Arc<dyn EventHistoryProvider>,
    registry: Arc<dyn LiveCallRegistry>,
    clock: Arc<dyn Clock>,
    resolver: StatusResolver,
}

impl CallStatusService {
    pub fn new(
        history: Arc<dyn EventHistoryProvider>,
        registry: Arc<dyn LiveCallRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            history,
            registry,
            clock,
            resolver: StatusResolver::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: StatusResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Build the session view from the invite and the live call, if any
    ///
    /// Returns `None` when neither exists.
    pub fn session_view(
        &self,
        call_id: &CallId,
        events: &[SignalEvent],
        live: Option<LiveCall>,
    ) -> Option<CallSessionView> {
        let invite = first_of(events, SignalKind::Invite);
        let is_video = invite.map_or(false, |invite| invite.is_video_invite());

        match (live, invite) {
            (Some(call), _) => Some(CallSessionView::from_live(call_id.clone(), call).with_video(is_video)),
            (None, Some(invite)) => Some(
                CallSessionView::from_history(call_id.clone(), !invite.sender_is_local_user)
                    .with_video(is_video),
            ),
            (None, None) => None,
        }
    }

    /// Current resolution for a call
    ///
    /// A call with neither a live call object nor an invite in its history
    /// resolves to [`Resolution::unknown`].
    pub fn status_for(&self, call_id: &CallId) -> Result<Resolution> {
        let events = self.history.events_for(call_id);
        let live = self.registry.live_call(call_id);

        let Some(session) = self.session_view(call_id, &events, live) else {
            warn!(%call_id, events = events.len(), "No live call and no invite, status unknown");
            return Ok(Resolution::unknown());
        };

        self.resolver.resolve(&session, &events, self.clock.now_millis())
    }

    /// Turn a user action into a request for the signaling layer
    ///
    /// Fails when the current status does not offer that action.
    pub fn request_action(&self, call_id: &CallId, kind: ActionKind) -> Result<ActionRequest> {
        let resolution = self.status_for(call_id)?;
        let Some(action) = resolution.action(kind) else {
            return Err(CallStatusError::ActionNotOffered {
                call_id: call_id.clone(),
                action: kind,
                status: resolution.status,
            });
        };

        let events = self.history.events_for(call_id);
        let is_video = first_of(&events, SignalKind::Invite)
            .map_or(false, |invite| invite.is_video_invite());

        info!(%call_id, action = %kind, "Dispatching call action");
        Ok(action.request(is_video))
    }
}

impl std::fmt::Debug for CallStatusService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallStatusService")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
