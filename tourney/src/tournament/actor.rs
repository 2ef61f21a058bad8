//! Tournament actor: the single owner of one tournament's state.
//!
//! All reads and writes of a tournament are messages to its actor, handled one
//! at a time. The capacity check and the append of a registration therefore
//! happen in one step, and racing registrations can never over-admit.

use super::{
    errors::{TournamentError, TournamentResult},
    messages::TournamentMessage,
    models::{Confirmation, Participant, PhotoId, Tournament, TournamentId, UserId},
};
use tokio::sync::{mpsc, oneshot};

/// Inbox size of each tournament actor
const INBOX_CAPACITY: usize = 100;

/// Tournament actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TournamentHandle {
    sender: mpsc::Sender<TournamentMessage>,
    tournament_id: TournamentId,
}

impl TournamentHandle {
    /// Create a new tournament handle
    pub fn new(sender: mpsc::Sender<TournamentMessage>, tournament_id: TournamentId) -> Self {
        Self {
            sender,
            tournament_id,
        }
    }

    /// Get tournament ID
    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    /// Send a message and wait for the actor's reply
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TournamentMessage,
    ) -> TournamentResult<T> {
        let (response, reply) = oneshot::channel();
        self.sender
            .send(build(response))
            .await
            .map_err(|_| TournamentError::ActorUnavailable(self.tournament_id))?;
        reply
            .await
            .map_err(|_| TournamentError::ActorUnavailable(self.tournament_id))
    }

    pub async fn snapshot(&self) -> TournamentResult<Tournament> {
        self.request(|response| TournamentMessage::Snapshot { response })
            .await
    }

    pub async fn register(&self, user_id: UserId, nickname: String) -> TournamentResult<Participant> {
        self.request(|response| TournamentMessage::Register {
            user_id,
            nickname,
            response,
        })
        .await?
    }

    pub async fn submit_payment_proof(
        &self,
        user_id: UserId,
        photo: PhotoId,
    ) -> TournamentResult<Participant> {
        self.request(|response| TournamentMessage::SubmitPaymentProof {
            user_id,
            photo,
            response,
        })
        .await?
    }

    pub async fn confirm_payment(&self, user_id: UserId) -> TournamentResult<Confirmation> {
        self.request(|response| TournamentMessage::ConfirmPayment { user_id, response })
            .await?
    }

    pub async fn finish(&self) -> TournamentResult<Vec<UserId>> {
        self.request(|response| TournamentMessage::Finish { response })
            .await?
    }

    pub async fn check_reportable(&self, user_id: UserId) -> TournamentResult<()> {
        self.request(|response| TournamentMessage::CheckReportable { user_id, response })
            .await?
    }

    pub async fn report_eliminated(&self, user_id: UserId) -> TournamentResult<()> {
        self.request(|response| TournamentMessage::ReportEliminated { user_id, response })
            .await?
    }

    pub async fn record_win(
        &self,
        user_id: UserId,
        result_proof: PhotoId,
        payout_instructions: String,
    ) -> TournamentResult<Participant> {
        self.request(|response| TournamentMessage::RecordWin {
            user_id,
            result_proof,
            payout_instructions,
            response,
        })
        .await?
    }

    pub async fn assign_next_place(
        &self,
        place: u32,
        payout_instructions: String,
    ) -> TournamentResult<Participant> {
        self.request(|response| TournamentMessage::AssignNextPlace {
            place,
            payout_instructions,
            response,
        })
        .await?
    }
}

/// Tournament actor owning a single tournament
pub struct TournamentActor {
    /// Tournament state
    tournament: Tournament,

    /// Message inbox
    inbox: mpsc::Receiver<TournamentMessage>,
}

impl TournamentActor {
    /// Create a new tournament actor
    ///
    /// # Returns
    ///
    /// * `(TournamentActor, TournamentHandle)` - Actor and handle for sending messages
    pub fn new(tournament: Tournament) -> (Self, TournamentHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let handle = TournamentHandle::new(sender, tournament.id);
        (Self { tournament, inbox }, handle)
    }

    /// Run the actor until every handle is dropped
    pub async fn run(mut self) {
        log::info!(
            "Tournament {} '{}' open",
            self.tournament.id,
            self.tournament.config.title
        );

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
        }

        log::info!("Tournament {} actor stopped", self.tournament.id);
    }

    /// Handle a tournament message
    fn handle_message(&mut self, message: TournamentMessage) {
        let tournament = &mut self.tournament;
        match message {
            TournamentMessage::Snapshot { response } => {
                let _ = response.send(tournament.clone());
            }

            TournamentMessage::Register {
                user_id,
                nickname,
                response,
            } => {
                let result = tournament.add_participant(user_id, nickname).cloned();
                match &result {
                    Ok(_) => log::info!(
                        "Tournament {}: user {} registered ({}/{})",
                        tournament.id,
                        user_id,
                        tournament.participants.len(),
                        tournament.config.capacity
                    ),
                    Err(e) => log::debug!(
                        "Tournament {}: registration of {} rejected: {}",
                        tournament.id,
                        user_id,
                        e
                    ),
                }
                let _ = response.send(result);
            }

            TournamentMessage::SubmitPaymentProof {
                user_id,
                photo,
                response,
            } => {
                let result = tournament
                    .submit_payment_proof(user_id, photo)
                    .and_then(|()| participant_of(tournament, user_id));
                let _ = response.send(result);
            }

            TournamentMessage::ConfirmPayment { user_id, response } => {
                let result = tournament.confirm_payment(user_id);
                if let Ok(Confirmation::Confirmed) = result {
                    log::info!("Tournament {}: payment of {} confirmed", tournament.id, user_id);
                }
                let _ = response.send(result);
            }

            TournamentMessage::Finish { response } => {
                let result = tournament.finish();
                if result.is_ok() {
                    log::info!("Tournament {} finished", tournament.id);
                }
                let _ = response.send(result);
            }

            TournamentMessage::CheckReportable { user_id, response } => {
                let _ = response.send(tournament.ensure_can_report(user_id));
            }

            TournamentMessage::ReportEliminated { user_id, response } => {
                let _ = response.send(tournament.report_eliminated(user_id));
            }

            TournamentMessage::RecordWin {
                user_id,
                result_proof,
                payout_instructions,
                response,
            } => {
                let result = tournament
                    .record_win(user_id, result_proof, payout_instructions)
                    .cloned();
                let _ = response.send(result);
            }

            TournamentMessage::AssignNextPlace {
                place,
                payout_instructions,
                response,
            } => {
                let result = tournament
                    .assign_next_place(place, payout_instructions)
                    .cloned();
                let _ = response.send(result);
            }
        }
    }
}

fn participant_of(tournament: &Tournament, user_id: UserId) -> TournamentResult<Participant> {
    tournament
        .find_participant(user_id)
        .cloned()
        .ok_or(TournamentError::ParticipantNotFound {
            tournament_id: tournament.id,
            user_id,
        })
}
