//! Call status service tests: collaborator wiring, live/history precedence,
//! and action dispatch

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rvoip_call_status_core::{
    ActionKind, ActionRequest, CallId, CallStatus, CallStatusError, CallStatusService, Clock,
    EndReason, FixedClock, HangupReason, InMemoryCallRegistry, InMemoryEventHistory, LiveCall,
    LiveCallState, Resolution, ResolverConfig, SignalEvent, StatusResolver,
};

struct Harness {
    history: Arc<InMemoryEventHistory>,
    registry: Arc<InMemoryCallRegistry>,
    service: CallStatusService,
}

fn harness(now_millis: i64) -> Harness {
    let history = Arc::new(InMemoryEventHistory::new());
    let registry = Arc::new(InMemoryCallRegistry::new());
    let service = CallStatusService::new(
        history.clone(),
        registry.clone(),
        Arc::new(FixedClock::new(now_millis)),
    );
    Harness {
        history,
        registry,
        service,
    }
}

#[test]
fn test_unknown_without_history_or_live_call() {
    let h = harness(0);
    let resolution = h.service.status_for(&CallId::new("nobody")).unwrap();
    assert_eq!(resolution, Resolution::unknown());
}

#[test]
fn test_live_call_takes_precedence_over_history() {
    let h = harness(10_000);
    let call_id = CallId::new("c1");
    h.history.record(&call_id, SignalEvent::invite(false, 0, false)).unwrap();

    // history alone: an incoming call never answered
    assert_eq!(h.service.status_for(&call_id).unwrap().status, CallStatus::Missed);

    h.registry.update(&call_id, LiveCall::new(LiveCallState::Ringing, true));
    let resolution = h.service.status_for(&call_id).unwrap();
    assert_eq!(resolution.status, CallStatus::Ringing);
    assert_eq!(resolution.action_kinds(), vec![ActionKind::Decline, ActionKind::Answer]);
}

#[test]
fn test_full_lifecycle_of_an_incoming_call() {
    let h = harness(0);
    let call_id = CallId::new("c1");

    h.history.record(&call_id, SignalEvent::invite(false, 0, true)).unwrap();
    h.registry.update(&call_id, LiveCall::new(LiveCallState::Ringing, true));
    assert_eq!(h.service.status_for(&call_id).unwrap().status, CallStatus::Ringing);

    h.history.record(&call_id, SignalEvent::answer(true, 2_000)).unwrap();
    h.registry.update(&call_id, LiveCall::new(LiveCallState::Connected, true));
    assert_eq!(h.service.status_for(&call_id).unwrap().status, CallStatus::Active);

    h.history
        .record(&call_id, SignalEvent::hangup(false, 3_602_000, Some(HangupReason::UserHangup)))
        .unwrap();
    h.registry.update(&call_id, LiveCall::ended(true, EndReason::RemoteHangup));
    let live_ended = h.service.status_for(&call_id).unwrap();
    assert_eq!(live_ended.status, CallStatus::Ended);
    assert_eq!(live_ended.duration_text, "1h");

    // the call object is torn down; history gives the same answer
    h.registry.remove(&call_id);
    let from_history = h.service.status_for(&call_id).unwrap();
    assert_eq!(from_history, live_ended);
}

#[test]
fn test_outgoing_direction_is_derived_from_invite_sender() {
    let h = harness(60_000);
    let call_id = CallId::new("c1");
    h.history.record(&call_id, SignalEvent::invite(true, 0, false)).unwrap();

    // outgoing and never answered reads as ended, not missed
    assert_eq!(h.service.status_for(&call_id).unwrap().status, CallStatus::Ended);
}

#[test]
fn test_request_action_carries_call_type() {
    let h = harness(0);
    let call_id = CallId::new("c1");
    h.history.record(&call_id, SignalEvent::invite(false, 0, true)).unwrap();
    h.registry.update(&call_id, LiveCall::new(LiveCallState::Ringing, true));

    let request = h.service.request_action(&call_id, ActionKind::Answer).unwrap();
    assert_eq!(
        request,
        ActionRequest {
            kind: ActionKind::Answer,
            call_id: call_id.clone(),
            is_video: true,
        }
    );
}

#[test]
fn test_request_action_not_offered() {
    let h = harness(0);
    let call_id = CallId::new("c1");
    h.registry.update(&call_id, LiveCall::new(LiveCallState::Connected, false));

    let err = h.service.request_action(&call_id, ActionKind::CallBack).unwrap_err();
    assert!(matches!(
        err,
        CallStatusError::ActionNotOffered {
            action: ActionKind::CallBack,
            status: CallStatus::Active,
            ..
        }
    ));
}

#[test]
fn test_custom_resolver_configuration() {
    let h = harness(0);
    let call_id = CallId::new("c1");
    h.history.record(&call_id, SignalEvent::invite(false, 0, false)).unwrap();
    h.history.record(&call_id, SignalEvent::answer(true, 0)).unwrap();
    h.history
        .record(&call_id, SignalEvent::hangup(true, 75_000, Some(HangupReason::UserHangup)))
        .unwrap();

    let config = ResolverConfig::from_toml_str("[duration]\nstyle = \"full\"\n").unwrap();
    let service = h.service.clone().with_resolver(StatusResolver::new(&config));
    let resolution = service.status_for(&call_id).unwrap();
    assert_eq!(resolution.duration_text, "1 minute 15 seconds");
}

struct SteppingClock(std::sync::atomic::AtomicI64);

impl Clock for SteppingClock {
    fn now_millis(&self) -> i64 {
        self.0.fetch_add(10_000, std::sync::atomic::Ordering::SeqCst)
    }
}

#[test]
fn test_in_progress_duration_follows_the_clock() {
    let history = Arc::new(InMemoryEventHistory::new());
    let call_id = CallId::new("c1");
    history.record(&call_id, SignalEvent::invite(true, 0, false)).unwrap();
    history.record(&call_id, SignalEvent::answer(false, 0)).unwrap();

    let registry = Arc::new(InMemoryCallRegistry::new());
    registry.update(&call_id, LiveCall::new(LiveCallState::Connected, false));

    let service = CallStatusService::new(
        history,
        registry,
        Arc::new(SteppingClock(std::sync::atomic::AtomicI64::new(10_000))),
    );

    assert_eq!(service.status_for(&call_id).unwrap().duration_seconds, 10.0);
    assert_eq!(service.status_for(&call_id).unwrap().duration_seconds, 20.0);
}
