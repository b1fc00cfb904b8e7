use tracing::{debug, warn};

use super::rejected::{resolve_rejected, RejectEvidence};
use super::Outcome;
use crate::error::{CallStatusError, Result};
use crate::status::Resolution;
use crate::types::{first_of, CallId, EventContent, HangupReason, SignalEvent, SignalKind};

/// Reconstruct the status of a session that has no live call
///
/// The first matching rule wins: a reject, then "never answered", then a
/// hangup. An answered call with neither is presented as ended.
pub(crate) fn resolve_history(
    call_id: &CallId,
    events: &[SignalEvent],
    is_incoming: bool,
    outcome: Outcome,
) -> Result<Resolution> {
    if first_of(events, SignalKind::Invite).is_none() {
        return Err(CallStatusError::missing_invite(call_id));
    }

    if let Some(reject) = first_of(events, SignalKind::Reject) {
        debug!(%call_id, "History contains a reject");
        let evidence = RejectEvidence {
            live_call: None,
            reject_event: Some(reject),
        };
        return Ok(resolve_rejected(evidence, outcome));
    }

    if first_of(events, SignalKind::Answer).is_none() {
        debug!(%call_id, "History has no answer");
        return Ok(resolve_unanswered(is_incoming, outcome));
    }

    if let Some(hangup) = first_of(events, SignalKind::Hangup) {
        debug!(%call_id, "History contains a hangup");
        return Ok(resolve_hangup(hangup, outcome));
    }

    debug!(%call_id, "Answered call without reject or hangup, presenting as ended");
    Ok(outcome.ended())
}

fn resolve_unanswered(is_incoming: bool, outcome: Outcome) -> Resolution {
    if is_incoming {
        outcome.missed()
    } else {
        // an unanswered outgoing call is not "missed" from our side
        outcome.ended()
    }
}

fn resolve_hangup(hangup: &SignalEvent, outcome: Outcome) -> Resolution {
    match &hangup.content {
        EventContent::Hangup {
            reason: Some(HangupReason::UserHangup),
        } => outcome.ended(),
        EventContent::Malformed => {
            warn!(
                timestamp = hangup.timestamp_millis,
                "Hangup content could not be decoded, presenting call as ended"
            );
            outcome.ended()
        }
        other => {
            debug!(content = ?other, "Hangup was not a user hangup");
            outcome.failed()
        }
    }
}
