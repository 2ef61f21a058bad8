//! Per-user conversation sessions.

use super::wizards::{Flow, FlowKind};
use crate::tournament::UserId;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};

/// Conversation state of one user
#[derive(Debug, Default)]
pub struct Session {
    flow: Option<Flow>,
}

impl Session {
    pub fn flow(&self) -> Option<&Flow> {
        self.flow.as_ref()
    }

    pub fn flow_mut(&mut self) -> Option<&mut Flow> {
        self.flow.as_mut()
    }

    /// Start a flow, discarding any flow in progress
    pub fn start(&mut self, flow: impl Into<Flow>) -> Option<Flow> {
        self.flow.replace(flow.into())
    }

    /// Leave the current flow, if any
    pub fn clear(&mut self) -> Option<Flow> {
        self.flow.take()
    }
}

/// Sessions of every user
///
/// Holding a session's lock for the whole handling of an event serializes the
/// events of that user while other users proceed independently.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: RwLock<HashMap<UserId, Arc<Mutex<Session>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session of a user, created on first use
    pub async fn session(&self, user_id: UserId) -> Arc<Mutex<Session>> {
        if let Some(session) = self.sessions.read().await.get(&user_id) {
            return session.clone();
        }
        self.sessions
            .write()
            .await
            .entry(user_id)
            .or_default()
            .clone()
    }

    /// Kind of the user's active flow
    pub async fn active_flow(&self, user_id: UserId) -> Option<FlowKind> {
        let session = self.sessions.read().await.get(&user_id).cloned()?;
        let session = session.lock().await;
        session.flow().map(Flow::kind)
    }
}
