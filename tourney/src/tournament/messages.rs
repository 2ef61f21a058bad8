//! Tournament actor message types.

use super::errors::TournamentResult;
use super::models::{Confirmation, Participant, PhotoId, Tournament, UserId};
use tokio::sync::oneshot;

/// Messages that can be sent to a TournamentActor
#[derive(Debug)]
pub enum TournamentMessage {
    /// Clone of the current tournament state
    Snapshot {
        response: oneshot::Sender<Tournament>,
    },

    /// Register a participant
    Register {
        user_id: UserId,
        nickname: String,
        response: oneshot::Sender<TournamentResult<Participant>>,
    },

    /// Attach a payment screenshot
    SubmitPaymentProof {
        user_id: UserId,
        photo: PhotoId,
        response: oneshot::Sender<TournamentResult<Participant>>,
    },

    /// Operator confirms a payment
    ConfirmPayment {
        user_id: UserId,
        response: oneshot::Sender<TournamentResult<Confirmation>>,
    },

    /// Operator closes the tournament
    Finish {
        response: oneshot::Sender<TournamentResult<Vec<UserId>>>,
    },

    /// Check whether the result flow may start for a participant
    CheckReportable {
        user_id: UserId,
        response: oneshot::Sender<TournamentResult<()>>,
    },

    /// Participant reports elimination
    ReportEliminated {
        user_id: UserId,
        response: oneshot::Sender<TournamentResult<()>>,
    },

    /// Participant reports a win with proof
    RecordWin {
        user_id: UserId,
        result_proof: PhotoId,
        payout_instructions: String,
        response: oneshot::Sender<TournamentResult<Participant>>,
    },

    /// Operator assigns the next place in registration order
    AssignNextPlace {
        place: u32,
        payout_instructions: String,
        response: oneshot::Sender<TournamentResult<Participant>>,
    },
}
