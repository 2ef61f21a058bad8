//! # Tourney
//!
//! Core of a chat bot that runs paid-entry gaming tournaments.
//!
//! Operators create tournaments through a step-by-step wizard, players
//! register and upload payment screenshots, operators confirm payments and
//! finish tournaments, and winners report their results with a payout
//! destination. All state lives in memory for the lifetime of the process.
//!
//! ## Architecture
//!
//! - Each tournament is owned by an actor task; every mutation of one
//!   tournament goes through its inbox.
//! - Each user has one session holding at most one active wizard; the
//!   session lock is held while that user's event is handled.
//! - Notifications go out through a [`notify::Notifier`] after the change
//!   they describe has been committed.
//!
//! ## Core Modules
//!
//! - [`tournament`]: Models, actors, manager and engine
//! - [`conversation`]: Creation, registration and result wizards
//! - [`events`]: Inbound events, commands and button payloads
//! - [`notify`]: Outbound messages and best-effort delivery
//! - [`router`]: Dispatches inbound events
//!
//! ## Example
//!
//! ```
//! use tourney::conversation::{CreationWizard, Input, Step, Wizard};
//!
//! let mut wizard = CreationWizard::new();
//! assert_eq!(wizard.accept(Input::Text("Sunday Cup")).unwrap(), Step::Next);
//! assert!(wizard.accept(Input::Text("")).is_err());
//! ```

/// Per-user wizards and session store.
pub mod conversation;

/// Inbound event vocabulary.
pub mod events;

/// Outbound messages and delivery.
pub mod notify;

/// User-facing texts and menus.
pub mod render;

/// Inbound event routing.
pub mod router;

/// Operator-wide settings.
pub mod settings;

/// Tournament lifecycle.
pub mod tournament;

/// Known users and bans.
pub mod users;

pub use conversation::ConversationStore;
pub use events::{Callback, Command, Event, Inbound};
pub use notify::{Dispatcher, MailboxNotifier, Notifier, Outbound};
pub use router::{EventRouter, Routed};
pub use settings::{COMMISSION_PERCENT, Settings};
pub use tournament::{TournamentEngine, TournamentError, TournamentManager};
pub use users::UserRegistry;
