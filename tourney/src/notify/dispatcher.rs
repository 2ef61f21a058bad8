//! Best-effort delivery and fan-out.

use super::messages::Outbound;
use crate::tournament::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;

/// Delivery errors reported by a transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("recipient {0} is unreachable")]
    Unreachable(UserId),

    #[error("mailbox of {0} is full")]
    MailboxFull(UserId),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Transport seam for sending one message to one user
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, user_id: UserId, message: Outbound) -> Result<(), DeliveryError>;
}

/// Best-effort dispatcher over a [`Notifier`]
#[derive(Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Send one message; failures are logged and reported as `false`
    pub async fn notify(&self, user_id: UserId, message: Outbound) -> bool {
        match self.notifier.deliver(user_id, message).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Delivery to user {} failed: {}", user_id, e);
                false
            }
        }
    }

    /// Send the same message to every recipient
    ///
    /// # Returns
    ///
    /// * `usize` - Number of successful deliveries
    pub async fn notify_all<I>(&self, user_ids: I, message: &Outbound) -> usize
    where
        I: IntoIterator<Item = UserId>,
    {
        self.notify_each(user_ids.into_iter().map(|id| (id, message.clone())))
            .await
    }

    /// Send a tailored message per recipient, concurrently and independently
    pub async fn notify_each<I>(&self, messages: I) -> usize
    where
        I: IntoIterator<Item = (UserId, Outbound)>,
    {
        let mut tasks = JoinSet::new();
        for (user_id, message) in messages {
            let dispatcher = self.clone();
            tasks.spawn(async move { dispatcher.notify(user_id, message).await });
        }

        let mut delivered = 0;
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(true) => delivered += 1,
                Ok(false) => {}
                Err(e) => log::error!("Notification task failed: {}", e),
            }
        }
        delivered
    }
}
