//! Global user registry: display names and bans.

use crate::tournament::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Known user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub display_name: String,
    pub banned: bool,
}

/// Registry of every user who has sent an event
#[derive(Default)]
pub struct UserRegistry {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the user's latest display name
    pub async fn touch(&self, user_id: UserId, display_name: &str) {
        let mut users = self.users.write().await;
        let record = users.entry(user_id).or_insert_with(|| UserRecord {
            display_name: display_name.to_string(),
            banned: false,
        });
        if record.display_name != display_name {
            record.display_name = display_name.to_string();
        }
    }

    pub async fn get(&self, user_id: UserId) -> Option<UserRecord> {
        self.users.read().await.get(&user_id).cloned()
    }

    pub async fn is_banned(&self, user_id: UserId) -> bool {
        self.users
            .read()
            .await
            .get(&user_id)
            .is_some_and(|record| record.banned)
    }

    /// Ban a user, known or not; returns false if already banned
    pub async fn ban(&self, user_id: UserId) -> bool {
        let mut users = self.users.write().await;
        let record = users.entry(user_id).or_insert_with(|| UserRecord {
            display_name: String::new(),
            banned: false,
        });
        !std::mem::replace(&mut record.banned, true)
    }

    /// Lift a ban; returns false if the user was not banned
    pub async fn unban(&self, user_id: UserId) -> bool {
        self.users
            .write()
            .await
            .get_mut(&user_id)
            .is_some_and(|record| std::mem::replace(&mut record.banned, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_touch_updates_name() {
        let registry = UserRegistry::new();
        registry.touch(1, "old").await;
        registry.touch(1, "new").await;
        assert_eq!(registry.get(1).await.unwrap().display_name, "new");
    }

    #[tokio::test]
    async fn test_ban_and_unban() {
        let registry = UserRegistry::new();
        assert!(!registry.is_banned(5).await);
        assert!(registry.ban(5).await);
        assert!(!registry.ban(5).await);
        assert!(registry.is_banned(5).await);

        registry.touch(5, "still banned").await;
        assert!(registry.is_banned(5).await);

        assert!(registry.unban(5).await);
        assert!(!registry.unban(5).await);
        assert!(!registry.is_banned(5).await);
    }
}
