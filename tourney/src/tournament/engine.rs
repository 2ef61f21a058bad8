//! Tournament engine: business operations layered over the manager.
//!
//! Each operation commits its change through the tournament's actor first and
//! only then fans out notifications, so nobody is told about a change that
//! did not happen. Notification failures never turn a committed operation
//! into an error.

use super::{
    errors::{TournamentError, TournamentResult},
    manager::TournamentManager,
    models::{Confirmation, Participant, PhotoId, Tournament, TournamentConfig, TournamentId, UserId},
};
use crate::{
    notify::{Dispatcher, Outbound},
    render,
    settings::Settings,
};
use std::sync::Arc;

/// Business rules and side effects of the tournament lifecycle
#[derive(Clone)]
pub struct TournamentEngine {
    manager: TournamentManager,
    dispatcher: Dispatcher,
    settings: Arc<Settings>,
}

impl TournamentEngine {
    pub fn new(manager: TournamentManager, dispatcher: Dispatcher, settings: Arc<Settings>) -> Self {
        Self {
            manager,
            dispatcher,
            settings,
        }
    }

    pub fn manager(&self) -> &TournamentManager {
        &self.manager
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn require_operator(&self, actor: UserId) -> TournamentResult<()> {
        if self.settings.is_operator(actor) {
            Ok(())
        } else {
            Err(TournamentError::Unauthorized)
        }
    }

    async fn notify_operators(&self, message: &Outbound) -> usize {
        self.dispatcher
            .notify_all(self.settings.operators.iter().copied(), message)
            .await
    }

    /// Create a tournament and return its first snapshot
    pub async fn create_tournament(
        &self,
        actor: UserId,
        config: TournamentConfig,
    ) -> TournamentResult<Tournament> {
        self.require_operator(actor)?;
        let tournament_id = self.manager.create_tournament(config).await?;
        self.manager.get_tournament(tournament_id).await
    }

    /// Register a user; returns the tournament as it is after registration
    pub async fn register(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
        nickname: String,
    ) -> TournamentResult<Tournament> {
        self.manager
            .add_participant(tournament_id, user_id, nickname)
            .await?;
        self.manager.get_tournament(tournament_id).await
    }

    /// Attach a payment screenshot and forward it to every operator
    pub async fn submit_payment_proof(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
        photo: PhotoId,
    ) -> TournamentResult<Participant> {
        let handle = self.manager.handle(tournament_id).await?;
        let participant = handle.submit_payment_proof(user_id, photo).await?;
        let tournament = handle.snapshot().await?;

        let delivered = self
            .notify_operators(&render::payment_proof_notice(&tournament, &participant))
            .await;
        log::info!(
            "Tournament {}: payment proof from {} forwarded to {} operator(s)",
            tournament_id,
            user_id,
            delivered
        );
        Ok(participant)
    }

    /// Confirm a payment; only the first confirmation notifies the participant
    pub async fn confirm_payment(
        &self,
        actor: UserId,
        tournament_id: TournamentId,
        user_id: UserId,
    ) -> TournamentResult<Confirmation> {
        self.require_operator(actor)?;
        let handle = self.manager.handle(tournament_id).await?;
        let confirmation = handle.confirm_payment(user_id).await?;

        if confirmation == Confirmation::Confirmed {
            let tournament = handle.snapshot().await?;
            self.dispatcher
                .notify(user_id, render::payment_confirmed(&tournament))
                .await;
        }
        Ok(confirmation)
    }

    /// Finish a tournament and prompt each confirmed participant once
    ///
    /// # Returns
    ///
    /// * `usize` - Number of participants prompted
    pub async fn finish(&self, actor: UserId, tournament_id: TournamentId) -> TournamentResult<usize> {
        self.require_operator(actor)?;
        let handle = self.manager.handle(tournament_id).await?;
        let confirmed = handle.finish().await?;
        let tournament = handle.snapshot().await?;

        let prompts = confirmed
            .iter()
            .map(|&user_id| (user_id, render::result_prompt(&tournament, user_id)));
        let delivered = self.dispatcher.notify_each(prompts).await;
        if delivered < confirmed.len() {
            log::warn!(
                "Tournament {}: {} of {} result prompts delivered",
                tournament_id,
                delivered,
                confirmed.len()
            );
        }
        Ok(confirmed.len())
    }

    /// Check that a participant may report a result
    pub async fn check_reportable(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
    ) -> TournamentResult<()> {
        self.manager
            .handle(tournament_id)
            .await?
            .check_reportable(user_id)
            .await
    }

    /// Participant answered "lost"
    pub async fn report_eliminated(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
    ) -> TournamentResult<()> {
        self.manager
            .handle(tournament_id)
            .await?
            .report_eliminated(user_id)
            .await
    }

    /// Record a self-reported win and notify operators once
    ///
    /// `payout_instructions` of `None` selects the operator default.
    pub async fn record_win(
        &self,
        tournament_id: TournamentId,
        user_id: UserId,
        result_proof: PhotoId,
        payout_instructions: Option<String>,
    ) -> TournamentResult<Participant> {
        let payout = self
            .settings
            .resolve_instructions(payout_instructions.as_deref());
        let handle = self.manager.handle(tournament_id).await?;
        let participant = handle.record_win(user_id, result_proof, payout).await?;
        let tournament = handle.snapshot().await?;

        self.notify_operators(&render::win_report(&tournament, &participant))
            .await;
        Ok(participant)
    }

    /// Operator-driven sequential place filling
    pub async fn fill_place(
        &self,
        actor: UserId,
        tournament_id: TournamentId,
        place: u32,
        payout_instructions: Option<String>,
    ) -> TournamentResult<Participant> {
        self.require_operator(actor)?;
        let payout = self
            .settings
            .resolve_instructions(payout_instructions.as_deref());
        let handle = self.manager.handle(tournament_id).await?;
        let participant = handle.assign_next_place(place, payout).await?;
        let tournament = handle.snapshot().await?;

        self.dispatcher
            .notify(
                participant.user_id,
                render::place_awarded(&tournament, &participant),
            )
            .await;
        Ok(participant)
    }
}
