//! Outbound mailbox polling.

use super::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tourney::Outbound;
use tourney::tournament::UserId;

#[derive(Debug, Serialize)]
pub struct OutboxResponse {
    pub user_id: UserId,
    pub messages: Vec<Outbound>,
}

/// Take every queued message for a user, oldest first
pub async fn drain_outbox(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Json<OutboxResponse> {
    let messages = state.mailbox.drain(user_id).await;
    Json(OutboxResponse { user_id, messages })
}
