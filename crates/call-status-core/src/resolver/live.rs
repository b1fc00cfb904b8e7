use tracing::{debug, warn};

use super::rejected::{resolve_rejected, RejectEvidence};
use super::Outcome;
use crate::status::{MessageKey, Resolution};
use crate::types::{EndReason, LiveCall, LiveCallState};

/// Map a live call snapshot to its presentation status
pub(crate) fn resolve_live(call: &LiveCall, outcome: Outcome) -> Resolution {
    debug!(state = ?call.state, incoming = call.is_incoming, "Resolving from live call");

    match call.state {
        LiveCallState::Fledgling
        | LiveCallState::WaitingLocalMedia
        | LiveCallState::CreatingOffer
        | LiveCallState::InviteSent
        | LiveCallState::Connecting => {
            if call.is_incoming {
                outcome.active(MessageKey::YouAreInCall)
            } else {
                outcome.active(MessageKey::YouStartedCall)
            }
        }
        LiveCallState::CreatingAnswer
        | LiveCallState::Connected
        | LiveCallState::OnHold
        | LiveCallState::RemotelyOnHold => outcome.active(MessageKey::YouAreInCall),
        LiveCallState::Ringing => {
            if call.is_incoming {
                outcome.ringing()
            } else {
                outcome.active(MessageKey::YouAreInCall)
            }
        }
        LiveCallState::Ended => resolve_ended(call, outcome),
        LiveCallState::InviteExpired | LiveCallState::AnsweredElsewhere => outcome.ended(),
        LiveCallState::Unrecognized => {
            warn!("Unrecognized live call state, presenting call as ended");
            outcome.ended()
        }
    }
}

fn resolve_ended(call: &LiveCall, outcome: Outcome) -> Resolution {
    match call.end_reason.unwrap_or_default() {
        EndReason::Unknown
        | EndReason::Hangup
        | EndReason::HangupElsewhere
        | EndReason::RemoteHangup
        | EndReason::AnsweredElsewhere => outcome.ended(),
        // "missed" only makes sense from the recipient's side
        EndReason::Missed if call.is_incoming => outcome.missed(),
        EndReason::Missed => outcome.ended(),
        EndReason::Busy => resolve_rejected(
            RejectEvidence {
                live_call: Some(call),
                reject_event: None,
            },
            outcome,
        ),
        EndReason::Unrecognized => {
            warn!("Unrecognized end reason, presenting call as ended");
            outcome.ended()
        }
    }
}
