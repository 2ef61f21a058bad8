//! Log subscriber setup and security audit records.
//!
//! `tourney` logs through the `log` facade. The subscriber's default
//! features forward those records, so engine and router logs share the
//! filter and format set up here.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "info,tourney=info,hyper=warn,tower_http=warn";

/// Install the global subscriber
///
/// ```no_run
/// tourney_bot::logging::init();
/// tracing::info!("Bot starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    tracing::debug!(filter = DEFAULT_FILTER, "Logging ready");
}

/// Events worth an audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    /// A banned user kept talking to the bot
    BannedSender,
    /// A non-operator tried an operator action
    OperatorActionRefused,
}

impl SecurityEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BannedSender => "banned_sender",
            Self::OperatorActionRefused => "operator_action_refused",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::BannedSender => "event from banned user dropped",
            Self::OperatorActionRefused => "operator action refused",
        }
    }
}

/// Emit a `SECURITY` warning tied to the request that caused it
pub fn log_security_event(event: SecurityEvent, user_id: i64, request_id: &str) {
    tracing::warn!(
        event_type = event.as_str(),
        user_id,
        request_id,
        "SECURITY: {}",
        event.describe()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_event_labels_are_distinct() {
        assert_ne!(
            SecurityEvent::BannedSender.as_str(),
            SecurityEvent::OperatorActionRefused.as_str()
        );
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_log_without_subscriber() {
        log_security_event(SecurityEvent::OperatorActionRefused, 1, "req-1");
    }
}
