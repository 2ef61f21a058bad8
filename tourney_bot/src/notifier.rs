//! Notifier decorator recording delivery metrics.

use crate::metrics;
use async_trait::async_trait;
use std::sync::Arc;
use tourney::notify::{DeliveryError, Notifier, Outbound};
use tourney::tournament::UserId;

/// Wraps a transport notifier and counts deliveries and failures
pub struct MeteredNotifier {
    inner: Arc<dyn Notifier>,
}

impl MeteredNotifier {
    pub fn new(inner: Arc<dyn Notifier>) -> Self {
        Self { inner }
    }
}

fn failure_reason(error: &DeliveryError) -> &'static str {
    match error {
        DeliveryError::Unreachable(_) => "unreachable",
        DeliveryError::MailboxFull(_) => "mailbox_full",
        DeliveryError::Transport(_) => "transport",
    }
}

#[async_trait]
impl Notifier for MeteredNotifier {
    async fn deliver(&self, user_id: UserId, message: Outbound) -> Result<(), DeliveryError> {
        let result = self.inner.deliver(user_id, message).await;
        match &result {
            Ok(()) => metrics::notifications_delivered_total(),
            Err(e) => metrics::notification_failures_total(failure_reason(e)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney::notify::MailboxNotifier;

    #[tokio::test]
    async fn test_passes_results_through() {
        let mailbox = Arc::new(MailboxNotifier::new(1));
        let notifier = MeteredNotifier::new(mailbox.clone());

        assert!(notifier.deliver(5, Outbound::text("one")).await.is_ok());
        assert_eq!(
            notifier.deliver(5, Outbound::text("two")).await,
            Err(DeliveryError::MailboxFull(5))
        );

        mailbox.mark_unreachable(6).await;
        assert_eq!(
            notifier.deliver(6, Outbound::text("hi")).await,
            Err(DeliveryError::Unreachable(6))
        );
        assert_eq!(mailbox.drain(5).await, vec![Outbound::text("one")]);
    }
}
