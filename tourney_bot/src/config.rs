//! Bot configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::collections::HashSet;
use std::net::SocketAddr;
use tourney::notify::mailbox::DEFAULT_MAILBOX_CAPACITY;
use tourney::settings::{COMMISSION_PERCENT, DEFAULT_INSTRUCTIONS, DEFAULT_SUPPORT_TEXT, Settings};
use tourney::tournament::UserId;

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:6969";

/// Complete bot configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// HTTP transport bind address
    pub bind: SocketAddr,
    /// Prometheus scrape endpoint; disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Operator allow-list
    pub operators: HashSet<UserId>,
    /// Commission applied to every fund, in percent
    pub commission_percent: i64,
    /// Default payment and payout instructions
    pub payment_details: String,
    /// Support and rules text
    pub support_text: String,
    /// Undrained messages kept per user
    pub mailbox_capacity: usize,
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `admins_override` - Optional comma-separated operator ids (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        admins_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok(), bind_override, admins_override)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        admins_override: Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_var(&lookup, "SERVER_BIND")?.unwrap_or(default_bind()?),
        };
        let metrics_bind = parse_var(&lookup, "METRICS_BIND")?;

        let admins = admins_override
            .or_else(|| lookup("ADMIN_IDS"))
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "ADMIN_IDS".to_string(),
                hint: "Comma-separated operator user ids, e.g. ADMIN_IDS=1234,5678".to_string(),
            })?;
        let operators = parse_operator_ids(&admins)?;

        Ok(BotConfig {
            bind,
            metrics_bind,
            operators,
            commission_percent: parse_var(&lookup, "COMMISSION_PERCENT")?
                .unwrap_or(COMMISSION_PERCENT),
            payment_details: lookup("PAYMENT_DETAILS")
                .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string()),
            support_text: lookup("SUPPORT_TEXT")
                .unwrap_or_else(|| DEFAULT_SUPPORT_TEXT.to_string()),
            mailbox_capacity: parse_var(&lookup, "MAILBOX_CAPACITY")?
                .unwrap_or(DEFAULT_MAILBOX_CAPACITY),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operators.is_empty() {
            return Err(ConfigError::Invalid {
                var: "ADMIN_IDS".to_string(),
                reason: "At least one operator is required".to_string(),
            });
        }

        if !(0..=100).contains(&self.commission_percent) {
            return Err(ConfigError::Invalid {
                var: "COMMISSION_PERCENT".to_string(),
                reason: format!("Must be between 0 and 100, got {}", self.commission_percent),
            });
        }

        if self.payment_details.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "PAYMENT_DETAILS".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "MAILBOX_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Operator-wide settings for the tournament engine
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::new(self.operators.iter().copied());
        settings.commission_percent = self.commission_percent;
        settings.default_instructions = self.payment_details.clone();
        settings.support_text = self.support_text.clone();
        settings
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> Result<SocketAddr, ConfigError> {
    DEFAULT_BIND.parse().map_err(|_| ConfigError::Invalid {
        var: "SERVER_BIND".to_string(),
        reason: format!("Default {DEFAULT_BIND} is not an address"),
    })
}

/// Parse an optional variable; a present but malformed value is an error
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse {raw:?}"),
        }),
    }
}

/// Parse `1234, 5678` into a set of user ids
fn parse_operator_ids(raw: &str) -> Result<HashSet<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse().map_err(|_| ConfigError::Invalid {
                var: "ADMIN_IDS".to_string(),
                reason: format!("{id:?} is not a user id"),
            })
        })
        .collect()
}
