//! Tournament error types.

use super::models::{TournamentId, UserId};
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("User {user_id} is not registered in tournament {tournament_id}")]
    ParticipantNotFound {
        tournament_id: TournamentId,
        user_id: UserId,
    },

    #[error("Tournament is full")]
    CapacityExceeded,

    #[error("Player already registered")]
    AlreadyRegistered,

    #[error("Tournament {0} is not accepting registrations or payments")]
    TournamentNotActive(TournamentId),

    #[error("Tournament {0} is still running")]
    TournamentNotFinished(TournamentId),

    #[error("Tournament {0} is already finished")]
    AlreadyFinished(TournamentId),

    #[error("Payment already confirmed")]
    PaymentAlreadyConfirmed,

    #[error("No payment proof submitted")]
    NoPaymentProof,

    #[error("Payment not confirmed")]
    PaymentNotConfirmed,

    #[error("Result already recorded")]
    OutcomeAlreadyRecorded,

    #[error("Invalid place {place}: tournament pays {places} place(s)")]
    InvalidPlace { place: u32, places: u32 },

    #[error("Place {0} is already assigned")]
    PlaceTaken(u32),

    #[error("Every participant of tournament {0} already has a result")]
    NoUnplacedParticipant(TournamentId),

    #[error("Invalid tournament configuration: {0}")]
    InvalidConfig(String),

    #[error("Operator permission required")]
    Unauthorized,

    #[error("Tournament {0} is unavailable")]
    ActorUnavailable(TournamentId),
}

impl TournamentError {
    /// Message suitable for the acting chat user
    ///
    /// Internal identifiers and actor failures are not exposed.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::NotFound(_) => "Tournament not found.".to_string(),
            TournamentError::ParticipantNotFound { .. } => {
                "You are not registered in this tournament.".to_string()
            }
            TournamentError::CapacityExceeded => {
                "Sorry, all slots in this tournament are taken.".to_string()
            }
            TournamentError::AlreadyRegistered => {
                "You are already registered in this tournament.".to_string()
            }
            TournamentError::TournamentNotActive(_) => "This tournament is closed.".to_string(),
            TournamentError::ActorUnavailable(_) => {
                "Internal error, please try again later.".to_string()
            }
            _ => format!("{self}."),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
