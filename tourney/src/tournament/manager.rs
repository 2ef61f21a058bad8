//! Tournament manager: the process-wide registry of tournament actors.
//!
//! This is the entity store. It allocates ids, spawns one actor per
//! tournament and forwards reads and mutations to the right actor. No lock is
//! ever held across all tournaments while a tournament is being mutated.

use super::{
    actor::{TournamentActor, TournamentHandle},
    errors::{TournamentError, TournamentResult},
    models::{
        Participant, Tournament, TournamentConfig, TournamentId, TournamentStatus,
        TournamentSummary, UserId,
    },
};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;

/// Tournament manager for managing tournament actors
#[derive(Clone, Default)]
pub struct TournamentManager {
    /// Live actor handles, ordered by id
    tournaments: Arc<RwLock<BTreeMap<TournamentId, TournamentHandle>>>,

    /// Last id handed out; ids start at 1 and are never reused
    last_id: Arc<RwLock<TournamentId>>,
}

impl TournamentManager {
    /// Create an empty tournament manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration, allocate an id and spawn the actor
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn create_tournament(&self, config: TournamentConfig) -> TournamentResult<TournamentId> {
        config.validate()?;

        let mut last_id = self.last_id.write().await;
        *last_id += 1;
        let tournament_id = *last_id;
        drop(last_id);

        let (actor, handle) = TournamentActor::new(Tournament::new(tournament_id, config));
        self.tournaments.write().await.insert(tournament_id, handle);

        tokio::spawn(actor.run());

        log::info!("Created tournament {}", tournament_id);
        Ok(tournament_id)
    }

    /// Get the actor handle of a tournament
    pub async fn handle(&self, tournament_id: TournamentId) -> TournamentResult<TournamentHandle> {
        self.tournaments
            .read()
            .await
            .get(&tournament_id)
            .cloned()
            .ok_or(TournamentError::NotFound(tournament_id))
    }

    /// Snapshot of one tournament
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> TournamentResult<Tournament> {
        self.handle(tournament_id).await?.snapshot().await
    }

    /// Snapshots of every tournament, ordered by id
    pub async fn list_all(&self) -> TournamentResult<Vec<Tournament>> {
        let handles: Vec<TournamentHandle> =
            self.tournaments.read().await.values().cloned().collect();

        let mut tournaments = Vec::with_capacity(handles.len());
        for handle in handles {
            tournaments.push(handle.snapshot().await?);
        }
        Ok(tournaments)
    }

    /// Active tournaments, ordered by id
    pub async fn list_active(&self) -> TournamentResult<Vec<TournamentSummary>> {
        Ok(self
            .list_all()
            .await?
            .iter()
            .filter(|t| t.status == TournamentStatus::Active)
            .map(Tournament::summary)
            .collect())
    }

    /// Tournaments the user registered in, ordered by id
    pub async fn tournaments_of(&self, user_id: UserId) -> TournamentResult<Vec<Tournament>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|t| t.find_participant(user_id).is_some())
            .collect())
    }

    /// Register a participant; capacity and duplicates are checked by the actor
    pub async fn add_participant(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
        nickname: String,
    ) -> TournamentResult<Participant> {
        self.handle(tournament_id)
            .await?
            .register(user_id, nickname)
            .await
    }

    /// Look up one participant
    pub async fn find_participant(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
    ) -> TournamentResult<Participant> {
        self.get_tournament(tournament_id)
            .await?
            .find_participant(user_id)
            .cloned()
            .ok_or(TournamentError::ParticipantNotFound {
                tournament_id,
                user_id,
            })
    }

    /// Number of tournaments ever created
    pub async fn tournament_count(&self) -> usize {
        self.tournaments.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(capacity: usize) -> TournamentConfig {
        TournamentConfig::new("Cup", capacity, 100, vec![100])
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let manager = TournamentManager::new();
        assert_eq!(manager.create_tournament(config(2)).await.unwrap(), 1);
        assert_eq!(manager.create_tournament(config(2)).await.unwrap(), 2);
        assert_eq!(manager.tournament_count().await, 2);
    }

    #[tokio::test]
    async fn test_invalid_config_does_not_consume_id() {
        let manager = TournamentManager::new();
        assert!(manager.create_tournament(config(0)).await.is_err());
        assert_eq!(manager.create_tournament(config(2)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tournament() {
        let manager = TournamentManager::new();
        assert_eq!(
            manager.get_tournament(42).await.unwrap_err(),
            TournamentError::NotFound(42)
        );
        assert_eq!(
            manager.add_participant(42, 1, "a".into()).await.unwrap_err(),
            TournamentError::NotFound(42)
        );
    }

    #[tokio::test]
    async fn test_list_active_excludes_finished() {
        let manager = TournamentManager::new();
        let first = manager.create_tournament(config(2)).await.unwrap();
        let second = manager.create_tournament(config(2)).await.unwrap();
        manager.handle(first).await.unwrap().finish().await.unwrap();

        let active = manager.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second);
    }

    #[tokio::test]
    async fn test_find_participant() {
        let manager = TournamentManager::new();
        let id = manager.create_tournament(config(2)).await.unwrap();
        manager.add_participant(id, 7, "seven".into()).await.unwrap();

        assert_eq!(manager.find_participant(id, 7).await.unwrap().nickname, "seven");
        assert!(matches!(
            manager.find_participant(id, 8).await,
            Err(TournamentError::ParticipantNotFound { user_id: 8, .. })
        ));
        assert_eq!(manager.tournaments_of(7).await.unwrap().len(), 1);
        assert!(manager.tournaments_of(8).await.unwrap().is_empty());
    }
}
