//! Inbound event intake.
//!
//! ```bash
//! curl -X POST http://localhost:6969/events \
//!   -H "Content-Type: application/json" \
//!   -d '{"user_id": 42, "display_name": "neo", "event": {"type": "button_tap", "callback": "join:1"}}'
//! ```

use super::AppState;
use super::request_id::RequestId;
use crate::logging::{SecurityEvent, log_security_event};
use crate::metrics;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tourney::{Inbound, Routed, TournamentError};

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub request_id: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn outcome_label(routed: &Routed) -> &'static str {
    match routed {
        Routed::Handled => "handled",
        Routed::Refused(_) => "refused",
        Routed::Banned => "banned",
    }
}

/// Count the outcome and refresh the tournaments gauge, which any routed
/// event may have moved
fn record_routing(routed: &Routed, tournaments: usize) {
    metrics::events_routed_total(outcome_label(routed));
    metrics::tournaments_total(tournaments);
}

/// Route one event; answers once every reply has been queued
pub async fn post_event(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(inbound): Json<Inbound>,
) -> (StatusCode, Json<EventResponse>) {
    let user_id = inbound.user_id;
    metrics::events_received_total(inbound.event.kind());
    tracing::debug!(
        request_id = %request_id.as_str(),
        user_id = user_id,
        kind = inbound.event.kind(),
        "Routing event"
    );

    let routed = state.router.handle(inbound).await;
    let tournaments = state.router.engine().manager().tournament_count().await;
    record_routing(&routed, tournaments);

    match &routed {
        Routed::Banned => {
            log_security_event(SecurityEvent::BannedSender, user_id, request_id.as_str())
        }
        Routed::Refused(TournamentError::Unauthorized) => log_security_event(
            SecurityEvent::OperatorActionRefused,
            user_id,
            request_id.as_str(),
        ),
        _ => {}
    }

    let error = match &routed {
        Routed::Refused(e) => Some(e.to_string()),
        _ => None,
    };
    (
        StatusCode::ACCEPTED,
        Json(EventResponse {
            request_id: request_id.into_string(),
            outcome: outcome_label(&routed),
            error,
        }),
    )
}
