//! Tournament lifecycle: models, per-tournament actors, the manager that
//! registers them and the engine that applies the business rules.
//!
//! This module provides:
//! - Tournament creation with validated configuration
//! - Registration with capacity and duplicate checks
//! - Payment proof submission and operator confirmation
//! - Finishing, result self-report and sequential place filling
//! - Fund and commission bookkeeping
//!
//! ## Architecture
//!
//! Each tournament runs in its own Tokio task with an mpsc inbox. The
//! [`TournamentManager`] spawns the actors and keeps their handles; the
//! [`TournamentEngine`] sends them messages and fans out notifications after
//! each committed change.
//!
//! ## Example
//!
//! ```no_run
//! use tourney::notify::{Dispatcher, MailboxNotifier};
//! use tourney::settings::Settings;
//! use tourney::tournament::{TournamentConfig, TournamentEngine, TournamentManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = TournamentEngine::new(
//!         TournamentManager::new(),
//!         Dispatcher::new(Arc::new(MailboxNotifier::default())),
//!         Arc::new(Settings::new([1])),
//!     );
//!
//!     let config = TournamentConfig::new("Sunday Cup", 9, 100, vec![400, 200]);
//!     let tournament = engine.create_tournament(1, config).await?;
//!     engine.register(tournament.id, 42, "neo".to_string()).await?;
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod engine;
pub mod errors;
pub mod manager;
pub mod messages;
pub mod models;

pub use actor::{TournamentActor, TournamentHandle};
pub use engine::TournamentEngine;
pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use messages::TournamentMessage;
pub use models::{
    Confirmation, MAX_AMOUNT, Outcome, Participant, PaymentStatus, PhotoId, PrizeStructure,
    Tournament, TournamentConfig, TournamentId, TournamentStatus, TournamentSummary, UserId,
};
