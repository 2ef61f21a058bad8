//! In-memory per-user mailboxes.
//!
//! Used by the HTTP transport, which lets the chat gateway poll each user's
//! queue, and by tests to observe what the core sent.

use super::dispatcher::{DeliveryError, Notifier};
use super::messages::Outbound;
use crate::tournament::UserId;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::Mutex;

/// Default number of undrained messages kept per user
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

/// Notifier that queues messages per recipient
pub struct MailboxNotifier {
    mailboxes: Mutex<HashMap<UserId, VecDeque<Outbound>>>,
    unreachable: Mutex<HashSet<UserId>>,
    capacity: usize,
}

impl Default for MailboxNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAILBOX_CAPACITY)
    }
}

impl MailboxNotifier {
    pub fn new(capacity: usize) -> Self {
        Self {
            mailboxes: Mutex::new(HashMap::new()),
            unreachable: Mutex::new(HashSet::new()),
            capacity,
        }
    }

    /// Reject every future delivery to this user (blocked the bot, left...)
    pub async fn mark_unreachable(&self, user_id: UserId) {
        self.unreachable.lock().await.insert(user_id);
    }

    /// Take every queued message for a user, oldest first
    ///
    /// The user's queue is dropped; the next delivery creates a fresh one.
    pub async fn drain(&self, user_id: UserId) -> Vec<Outbound> {
        self.mailboxes
            .lock()
            .await
            .remove(&user_id)
            .map(Vec::from)
            .unwrap_or_default()
    }

    /// Number of users with a queue awaiting collection
    pub async fn open_mailboxes(&self) -> usize {
        self.mailboxes.lock().await.len()
    }

    /// Number of queued messages for a user
    pub async fn pending(&self, user_id: UserId) -> usize {
        self.mailboxes
            .lock()
            .await
            .get(&user_id)
            .map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl Notifier for MailboxNotifier {
    async fn deliver(&self, user_id: UserId, message: Outbound) -> Result<(), DeliveryError> {
        if self.unreachable.lock().await.contains(&user_id) {
            return Err(DeliveryError::Unreachable(user_id));
        }

        let mut mailboxes = self.mailboxes.lock().await;
        let queue = mailboxes.entry(user_id).or_default();
        if queue.len() >= self.capacity {
            return Err(DeliveryError::MailboxFull(user_id));
        }
        queue.push_back(message);
        Ok(())
    }
}
