use tracing::debug;

use super::Outcome;
use crate::status::Resolution;
use crate::types::{LiveCall, SignalEvent};

/// What is known about who rejected the call
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RejectEvidence<'a> {
    pub live_call: Option<&'a LiveCall>,
    pub reject_event: Option<&'a SignalEvent>,
}

/// "You declined" when the local user rejected the call, otherwise ended
///
/// An incoming live call is always declined locally. Without a live call the
/// sender of the reject event decides.
pub(crate) fn resolve_rejected(evidence: RejectEvidence<'_>, outcome: Outcome) -> Resolution {
    let by_live_call = evidence.live_call.map_or(false, |call| call.is_incoming);
    let by_event = evidence
        .reject_event
        .map_or(false, |event| event.sender_is_local_user);

    if by_live_call || by_event {
        debug!(by_live_call, by_event, "Call rejected by local user");
        outcome.declined()
    } else {
        debug!("Call rejected by remote party");
        outcome.ended()
    }
}
