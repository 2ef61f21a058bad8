//! Outbound notifications.
//!
//! The core never talks to the chat platform directly. It hands [`Outbound`]
//! messages to a [`Dispatcher`], which delivers them through a [`Notifier`]
//! implementation supplied at startup. Delivery is best-effort: a failure for
//! one recipient is logged and never aborts a fan-out or the operation that
//! triggered it.

pub mod dispatcher;
pub mod mailbox;
pub mod messages;

pub use dispatcher::{DeliveryError, Dispatcher, Notifier};
pub use mailbox::MailboxNotifier;
pub use messages::{Button, Outbound};
