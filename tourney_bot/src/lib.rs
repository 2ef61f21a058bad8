//! Process wiring for the tournament bot: configuration, logging, metrics
//! and the HTTP transport that feeds the event router.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod notifier;

use std::sync::Arc;
use tourney::{
    ConversationStore, Dispatcher, EventRouter, MailboxNotifier, TournamentEngine,
    TournamentManager, UserRegistry,
};

/// Build the application state from a validated configuration
pub fn build_state(config: &config::BotConfig) -> api::AppState {
    let mailbox = Arc::new(MailboxNotifier::new(config.mailbox_capacity));
    let notifier = Arc::new(notifier::MeteredNotifier::new(mailbox.clone()));
    let engine = TournamentEngine::new(
        TournamentManager::new(),
        Dispatcher::new(notifier),
        Arc::new(config.settings()),
    );
    let router = EventRouter::new(
        engine,
        Arc::new(UserRegistry::new()),
        Arc::new(ConversationStore::new()),
    );
    api::AppState { router, mailbox }
}
