//! HTTP API standing in for the chat platform.
//!
//! A chat gateway posts every user action to `/events` and polls
//! `/outbox/{user_id}` for the messages the bot wants to send back.
//!
//! # Modules
//!
//! - [`events`]: Inbound event intake
//! - [`outbox`]: Outbound mailbox polling
//! - [`request_id`]: Request ID propagation
//!
//! # Endpoints Overview
//!
//! - `GET /health` - Bot health status
//! - `POST /events` - Route one inbound event
//! - `GET /outbox/{user_id}` - Drain a user's queued messages
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tourney::notify::{Dispatcher, MailboxNotifier};
//! use tourney::{ConversationStore, EventRouter, Settings, TournamentEngine, TournamentManager, UserRegistry};
//! use tourney_bot::api::{AppState, create_router};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mailbox = Arc::new(MailboxNotifier::default());
//! let engine = TournamentEngine::new(
//!     TournamentManager::new(),
//!     Dispatcher::new(mailbox.clone()),
//!     Arc::new(Settings::new([1])),
//! );
//! let router = EventRouter::new(
//!     engine,
//!     Arc::new(UserRegistry::new()),
//!     Arc::new(ConversationStore::new()),
//! );
//!
//! let app = create_router(AppState { router, mailbox });
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively; the gateway is expected to run next to
//! the bot.

pub mod events;
pub mod outbox;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tourney::{EventRouter, MailboxNotifier};
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// # Fields
///
/// - `router`: Routes inbound events to the tournament core
/// - `mailbox`: Per-user outbound queues drained by the gateway
#[derive(Clone)]
pub struct AppState {
    pub router: EventRouter,
    pub mailbox: Arc<MailboxNotifier>,
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/events", post(events::post_event))
        .route("/outbox/{user_id}", get(outbox::drain_outbox))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:6969/health
/// # {"status":"healthy","tournaments":{"total":2,"active":1},"timestamp":"2026-10-18T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let manager = state.router.engine().manager();
    let total = manager.tournament_count().await;

    let (status_code, status, active) = match manager.list_active().await {
        Ok(active) => (StatusCode::OK, "healthy", active.len()),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", 0)
        }
    };

    let response = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "tournaments": {
            "total": total,
            "active": active
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
