//! Tournament data models and the invariant-preserving mutators that own them.
//!
//! Every mutation of a [`Tournament`] goes through a method on this type so the
//! registration, payment and outcome rules live next to the data they guard.
//! The methods are synchronous and all-or-nothing: they validate first and only
//! then touch state, so a rejected call leaves the tournament unchanged.

use super::errors::{TournamentError, TournamentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tournament ID type
pub type TournamentId = i64;

/// External identity of a chat user
pub type UserId = i64;

/// Opaque reference to an uploaded image, never decoded here
pub type PhotoId = String;

/// Largest fund or prize total a tournament may carry
///
/// Keeps `amount * percent` inside `i64` for any percentage up to 100.
pub const MAX_AMOUNT: i64 = i64::MAX / 100;

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    /// Accepting registrations and payment proofs
    Active,
    /// Closed by an operator; only result reporting remains
    Finished,
}

/// Payment progress of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Unpaid,
    ProofSubmitted,
    Confirmed,
}

/// Self-reported or operator-assigned result of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Undetermined,
    Eliminated,
    Won,
}

/// Result of a payment confirmation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Status moved from `ProofSubmitted` to `Confirmed`
    Confirmed,
    /// Participant was already confirmed; nothing changed
    AlreadyConfirmed,
}

/// Payout amounts by place, index 0 is first place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeStructure {
    pub payouts: Vec<i64>,
}

impl PrizeStructure {
    pub fn new(payouts: Vec<i64>) -> Self {
        Self { payouts }
    }

    /// Number of paid places
    pub fn places(&self) -> usize {
        self.payouts.len()
    }

    /// Sum of all payouts, `None` on overflow
    pub fn checked_total(&self) -> Option<i64> {
        self.payouts
            .iter()
            .try_fold(0i64, |total, amount| total.checked_add(*amount))
    }

    /// Sum of all payouts
    pub fn total(&self) -> i64 {
        self.checked_total().unwrap_or(i64::MAX)
    }

    /// Get payout for a specific place (1-indexed)
    pub fn payout_for_place(&self, place: u32) -> Option<i64> {
        if place == 0 {
            return None;
        }
        self.payouts.get(place as usize - 1).copied()
    }
}

/// Tournament configuration collected by the creation wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Display title
    pub title: String,
    /// Game being played
    pub game: String,
    /// Game mode (solo, 1v1, 3v3...)
    pub mode: String,
    /// Maximum number of paying participants
    pub capacity: usize,
    /// Entry fee in currency units
    pub entry_fee: i64,
    /// Prize per place
    pub prizes: PrizeStructure,
    /// Payment instructions; the operator default applies when unset
    pub payment_instructions: Option<String>,
    /// Optional map image shown with the tournament card
    pub map_photo: Option<PhotoId>,
}

impl TournamentConfig {
    /// Create a configuration with the mandatory fields
    pub fn new(title: impl Into<String>, capacity: usize, entry_fee: i64, prizes: Vec<i64>) -> Self {
        Self {
            title: title.into(),
            game: String::new(),
            mode: String::new(),
            capacity,
            entry_fee,
            prizes: PrizeStructure::new(prizes),
            payment_instructions: None,
            map_photo: None,
        }
    }

    /// Check the creation rules
    ///
    /// The prize total is not compared with the fund; the creation summary
    /// reports both.
    pub fn validate(&self) -> TournamentResult<()> {
        if self.capacity == 0 {
            return Err(TournamentError::InvalidConfig(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if self.entry_fee < 0 {
            return Err(TournamentError::InvalidConfig(
                "entry fee can't be negative".to_string(),
            ));
        }
        let places = self.prizes.places();
        if places == 0 || places > self.capacity {
            return Err(TournamentError::InvalidConfig(format!(
                "prize places must be between 1 and {}",
                self.capacity
            )));
        }
        if self.prizes.payouts.iter().any(|amount| *amount < 0) {
            return Err(TournamentError::InvalidConfig(
                "prize amounts can't be negative".to_string(),
            ));
        }
        if !self.checked_fund().is_some_and(|fund| fund <= MAX_AMOUNT) {
            return Err(TournamentError::InvalidConfig(format!(
                "fund (capacity x entry fee) can't exceed {MAX_AMOUNT}"
            )));
        }
        if !self.prizes.checked_total().is_some_and(|total| total <= MAX_AMOUNT) {
            return Err(TournamentError::InvalidConfig(format!(
                "prize total can't exceed {MAX_AMOUNT}"
            )));
        }
        Ok(())
    }

    fn checked_fund(&self) -> Option<i64> {
        i64::try_from(self.capacity).ok()?.checked_mul(self.entry_fee)
    }

    /// `capacity * entry_fee`, saturating for configurations that never
    /// passed [`validate`](Self::validate)
    pub fn fund(&self) -> i64 {
        self.checked_fund().unwrap_or(i64::MAX)
    }

    /// Operator's cut of the fund, truncated
    pub fn commission(&self, commission_percent: i64) -> i64 {
        let commission = i128::from(self.fund()) * i128::from(commission_percent) / 100;
        i64::try_from(commission).unwrap_or(if commission < 0 { i64::MIN } else { i64::MAX })
    }

    /// What remains of the fund after commission; informational only
    pub fn net_for_prizes(&self, commission_percent: i64) -> i64 {
        self.fund().saturating_sub(self.commission(commission_percent))
    }
}

/// A registrant of one tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub user_id: UserId,
    pub nickname: String,
    pub registered_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub payment_proof: Option<PhotoId>,
    pub outcome: Outcome,
    pub place: Option<u32>,
    pub result_proof: Option<PhotoId>,
    pub payout_instructions: Option<String>,
}

impl Participant {
    fn new(user_id: UserId, nickname: String) -> Self {
        Self {
            user_id,
            nickname,
            registered_at: Utc::now(),
            payment_status: PaymentStatus::Unpaid,
            payment_proof: None,
            outcome: Outcome::Undetermined,
            place: None,
            result_proof: None,
            payout_instructions: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.payment_status == PaymentStatus::Confirmed
    }
}

/// Short listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub title: String,
    pub status: TournamentStatus,
    pub registered: usize,
    pub capacity: usize,
    pub entry_fee: i64,
}

/// A tournament and its participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub config: TournamentConfig,
    pub status: TournamentStatus,
    /// Registration order
    pub participants: Vec<Participant>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Tournament {
    pub fn new(id: TournamentId, config: TournamentConfig) -> Self {
        Self {
            id,
            config,
            status: TournamentStatus::Active,
            participants: Vec::new(),
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TournamentStatus::Active
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.config.capacity
    }

    pub fn summary(&self) -> TournamentSummary {
        TournamentSummary {
            id: self.id,
            title: self.config.title.clone(),
            status: self.status,
            registered: self.participants.len(),
            capacity: self.config.capacity,
            entry_fee: self.config.entry_fee,
        }
    }

    pub fn find_participant(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    fn participant_mut(&mut self, user_id: UserId) -> TournamentResult<&mut Participant> {
        let tournament_id = self.id;
        self.participants
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or(TournamentError::ParticipantNotFound {
                tournament_id,
                user_id,
            })
    }

    /// Confirmed participants in registration order
    pub fn confirmed_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_confirmed())
    }

    /// Append a participant after checking status, duplicates and capacity
    pub fn add_participant(
        &mut self,
        user_id: UserId,
        nickname: String,
    ) -> TournamentResult<&Participant> {
        if !self.is_active() {
            return Err(TournamentError::TournamentNotActive(self.id));
        }
        if self.find_participant(user_id).is_some() {
            return Err(TournamentError::AlreadyRegistered);
        }
        if self.is_full() {
            return Err(TournamentError::CapacityExceeded);
        }

        self.participants.push(Participant::new(user_id, nickname));
        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Attach a payment screenshot
    ///
    /// A new proof replaces an earlier unconfirmed one.
    pub fn submit_payment_proof(&mut self, user_id: UserId, photo: PhotoId) -> TournamentResult<()> {
        if !self.is_active() {
            return Err(TournamentError::TournamentNotActive(self.id));
        }
        let participant = self.participant_mut(user_id)?;
        if participant.is_confirmed() {
            return Err(TournamentError::PaymentAlreadyConfirmed);
        }

        participant.payment_proof = Some(photo);
        participant.payment_status = PaymentStatus::ProofSubmitted;
        Ok(())
    }

    /// Move `ProofSubmitted` to `Confirmed`; confirming twice is a no-op
    pub fn confirm_payment(&mut self, user_id: UserId) -> TournamentResult<Confirmation> {
        let participant = self.participant_mut(user_id)?;
        match participant.payment_status {
            PaymentStatus::Confirmed => Ok(Confirmation::AlreadyConfirmed),
            PaymentStatus::Unpaid => Err(TournamentError::NoPaymentProof),
            PaymentStatus::ProofSubmitted => {
                participant.payment_status = PaymentStatus::Confirmed;
                Ok(Confirmation::Confirmed)
            }
        }
    }

    /// Close the tournament and return the confirmed participants to prompt
    pub fn finish(&mut self) -> TournamentResult<Vec<UserId>> {
        if !self.is_active() {
            return Err(TournamentError::AlreadyFinished(self.id));
        }

        self.status = TournamentStatus::Finished;
        self.finished_at = Some(Utc::now());
        Ok(self.confirmed_participants().map(|p| p.user_id).collect())
    }

    /// Shared guard for the self-report path
    fn reportable_participant(&mut self, user_id: UserId) -> TournamentResult<&mut Participant> {
        if self.is_active() {
            return Err(TournamentError::TournamentNotFinished(self.id));
        }
        let participant = self.participant_mut(user_id)?;
        if !participant.is_confirmed() {
            return Err(TournamentError::PaymentNotConfirmed);
        }
        if participant.outcome != Outcome::Undetermined {
            return Err(TournamentError::OutcomeAlreadyRecorded);
        }
        Ok(participant)
    }

    /// Check that a participant may still start the result flow
    pub fn ensure_can_report(&mut self, user_id: UserId) -> TournamentResult<()> {
        self.reportable_participant(user_id).map(|_| ())
    }

    /// Mark a participant out of the prizes
    pub fn report_eliminated(&mut self, user_id: UserId) -> TournamentResult<()> {
        let participant = self.reportable_participant(user_id)?;
        participant.outcome = Outcome::Eliminated;
        Ok(())
    }

    /// Record a self-reported win with its proof and payout instructions
    pub fn record_win(
        &mut self,
        user_id: UserId,
        result_proof: PhotoId,
        payout_instructions: String,
    ) -> TournamentResult<&Participant> {
        let participant = self.reportable_participant(user_id)?;
        participant.outcome = Outcome::Won;
        participant.result_proof = Some(result_proof);
        participant.payout_instructions = Some(payout_instructions);
        Ok(&*participant)
    }

    /// Give `place` to the first participant, in registration order, who has
    /// no place yet and was not eliminated
    ///
    /// A place value is held by at most one participant and an assigned place
    /// is never overwritten. A participant who already reported a win keeps
    /// the payout instructions they sent.
    pub fn assign_next_place(
        &mut self,
        place: u32,
        payout_instructions: String,
    ) -> TournamentResult<&Participant> {
        let places = self.config.prizes.places() as u32;
        if place == 0 || place > places {
            return Err(TournamentError::InvalidPlace { place, places });
        }
        if self.participants.iter().any(|p| p.place == Some(place)) {
            return Err(TournamentError::PlaceTaken(place));
        }

        let tournament_id = self.id;
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.place.is_none() && p.outcome != Outcome::Eliminated)
            .ok_or(TournamentError::NoUnplacedParticipant(tournament_id))?;

        participant.place = Some(place);
        participant.outcome = Outcome::Won;
        participant.payout_instructions.get_or_insert(payout_instructions);
        Ok(&*participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tournament(capacity: usize, entry_fee: i64) -> Tournament {
        Tournament::new(1, TournamentConfig::new("Cup", capacity, entry_fee, vec![100]))
    }

    fn paid(t: &mut Tournament, user_id: UserId) {
        t.add_participant(user_id, format!("player{user_id}")).unwrap();
        t.submit_payment_proof(user_id, format!("pay-{user_id}")).unwrap();
        t.confirm_payment(user_id).unwrap();
    }

    #[test]
    fn test_fund_and_commission() {
        let config = TournamentConfig::new("Cup", 2, 100, vec![100]);
        assert_eq!(config.fund(), 200);
        assert_eq!(config.commission(30), 60);
        assert_eq!(config.net_for_prizes(30), 140);
    }

    #[test]
    fn test_commission_truncates() {
        let config = TournamentConfig::new("Cup", 3, 33, vec![10]);
        // 99 * 30 / 100 = 29.7
        assert_eq!(config.commission(30), 29);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = TournamentConfig::new("Cup", 0, 100, vec![]);
        assert!(matches!(
            config.validate(),
            Err(TournamentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_more_places_than_capacity() {
        let config = TournamentConfig::new("Cup", 2, 100, vec![10, 10, 10]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_prizes_above_fund() {
        let config = TournamentConfig::new("Cup", 5, 100, vec![500, 300]);
        assert!(config.validate().is_ok());
        assert_eq!(config.prizes.total(), 800);
        assert_eq!(config.fund(), 500);
    }

    #[test]
    fn test_payout_for_place() {
        let prizes = PrizeStructure::new(vec![500, 300]);
        assert_eq!(prizes.payout_for_place(0), None);
        assert_eq!(prizes.payout_for_place(1), Some(500));
        assert_eq!(prizes.payout_for_place(2), Some(300));
        assert_eq!(prizes.payout_for_place(3), None);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut t = tournament(2, 100);
        t.add_participant(1, "a".into()).unwrap();
        t.add_participant(2, "b".into()).unwrap();
        let err = t.add_participant(3, "c".into()).unwrap_err();
        assert!(matches!(err, TournamentError::CapacityExceeded));
        assert_eq!(t.participants.len(), 2);
    }

    #[test]
    fn test_duplicate_registration() {
        let mut t = tournament(5, 100);
        t.add_participant(1, "a".into()).unwrap();
        let err = t.add_participant(1, "again".into()).unwrap_err();
        assert!(matches!(err, TournamentError::AlreadyRegistered));
        assert_eq!(t.participants.len(), 1);
        assert_eq!(t.participants[0].nickname, "a");
    }

    #[test]
    fn test_registration_closed_after_finish() {
        let mut t = tournament(5, 100);
        t.finish().unwrap();
        assert!(matches!(
            t.add_participant(1, "a".into()),
            Err(TournamentError::TournamentNotActive(1))
        ));
    }

    #[test]
    fn test_payment_status_progression() {
        let mut t = tournament(5, 100);
        t.add_participant(7, "p".into()).unwrap();
        assert_eq!(t.participants[0].payment_status, PaymentStatus::Unpaid);

        assert!(matches!(
            t.confirm_payment(7),
            Err(TournamentError::NoPaymentProof)
        ));

        t.submit_payment_proof(7, "photo".into()).unwrap();
        assert_eq!(t.participants[0].payment_status, PaymentStatus::ProofSubmitted);
        assert_eq!(t.participants[0].payment_proof.as_deref(), Some("photo"));

        assert_eq!(t.confirm_payment(7).unwrap(), Confirmation::Confirmed);
        assert_eq!(t.confirm_payment(7).unwrap(), Confirmation::AlreadyConfirmed);
        assert_eq!(t.participants[0].payment_status, PaymentStatus::Confirmed);

        assert!(matches!(
            t.submit_payment_proof(7, "again".into()),
            Err(TournamentError::PaymentAlreadyConfirmed)
        ));
    }

    #[test]
    fn test_payment_proof_requires_registration() {
        let mut t = tournament(5, 100);
        assert!(matches!(
            t.submit_payment_proof(9, "photo".into()),
            Err(TournamentError::ParticipantNotFound { user_id: 9, .. })
        ));
    }

    #[test]
    fn test_finish_returns_only_confirmed() {
        let mut t = tournament(5, 100);
        paid(&mut t, 1);
        t.add_participant(2, "unpaid".into()).unwrap();
        t.add_participant(3, "pending".into()).unwrap();
        t.submit_payment_proof(3, "p".into()).unwrap();

        assert_eq!(t.finish().unwrap(), vec![1]);
        assert_eq!(t.status, TournamentStatus::Finished);
        assert!(t.finished_at.is_some());
        assert!(matches!(t.finish(), Err(TournamentError::AlreadyFinished(1))));
    }

    #[test]
    fn test_outcome_reported_once() {
        let mut t = tournament(5, 100);
        paid(&mut t, 1);
        paid(&mut t, 2);

        assert!(matches!(
            t.report_eliminated(1),
            Err(TournamentError::TournamentNotFinished(1))
        ));

        t.finish().unwrap();
        t.report_eliminated(1).unwrap();
        assert_eq!(t.participants[0].outcome, Outcome::Eliminated);
        assert!(matches!(
            t.record_win(1, "proof".into(), "card".into()),
            Err(TournamentError::OutcomeAlreadyRecorded)
        ));

        let winner = t.record_win(2, "proof".into(), "card".into()).unwrap();
        assert_eq!(winner.outcome, Outcome::Won);
        assert_eq!(winner.result_proof.as_deref(), Some("proof"));
        assert_eq!(winner.place, None);
    }

    #[test]
    fn test_unconfirmed_cannot_report() {
        let mut t = tournament(5, 100);
        t.add_participant(1, "a".into()).unwrap();
        t.finish().unwrap();
        assert!(matches!(
            t.report_eliminated(1),
            Err(TournamentError::PaymentNotConfirmed)
        ));
    }

    #[test]
    fn test_sequential_place_filling() {
        let mut t = Tournament::new(1, TournamentConfig::new("Cup", 5, 100, vec![300, 200]));
        t.add_participant(10, "a".into()).unwrap();
        t.add_participant(20, "b".into()).unwrap();
        t.add_participant(30, "c".into()).unwrap();

        assert_eq!(t.assign_next_place(1, "card a".into()).unwrap().user_id, 10);
        assert_eq!(t.assign_next_place(2, "card b".into()).unwrap().user_id, 20);
        assert_eq!(t.participants[1].place, Some(2));
        assert_eq!(t.participants[2].place, None);
    }

    #[test]
    fn test_place_filling_guards() {
        let mut t = Tournament::new(1, TournamentConfig::new("Cup", 5, 100, vec![300, 200]));
        t.add_participant(10, "a".into()).unwrap();

        assert!(matches!(
            t.assign_next_place(3, String::new()),
            Err(TournamentError::InvalidPlace { place: 3, places: 2 })
        ));
        t.assign_next_place(1, String::new()).unwrap();
        assert!(matches!(
            t.assign_next_place(1, String::new()),
            Err(TournamentError::PlaceTaken(1))
        ));
        assert!(matches!(
            t.assign_next_place(2, String::new()),
            Err(TournamentError::NoUnplacedParticipant(1))
        ));
    }

    #[test]
    fn test_place_filling_skips_eliminated() {
        let mut t = Tournament::new(1, TournamentConfig::new("Cup", 5, 100, vec![300]));
        paid(&mut t, 1);
        paid(&mut t, 2);
        t.finish().unwrap();
        t.report_eliminated(1).unwrap();

        assert_eq!(t.assign_next_place(1, "card".into()).unwrap().user_id, 2);
        assert_eq!(t.participants[0].place, None);
    }

    #[test]
    fn test_place_filling_keeps_self_reported_payout() {
        let mut t = Tournament::new(1, TournamentConfig::new("Cup", 5, 100, vec![300, 200]));
        paid(&mut t, 1);
        paid(&mut t, 2);
        t.finish().unwrap();
        t.record_win(1, "proof".into(), "my card 1111".into()).unwrap();

        let placed = t.assign_next_place(1, "DEFAULT".into()).unwrap();
        assert_eq!(placed.user_id, 1);
        assert_eq!(placed.place, Some(1));
        assert_eq!(placed.payout_instructions.as_deref(), Some("my card 1111"));
        assert_eq!(placed.result_proof.as_deref(), Some("proof"));

        let placed = t.assign_next_place(2, "DEFAULT".into()).unwrap();
        assert_eq!(placed.user_id, 2);
        assert_eq!(placed.payout_instructions.as_deref(), Some("DEFAULT"));
    }

    #[test]
    fn test_validate_rejects_fund_past_commission_range() {
        let capacity = u32::MAX as usize;
        let config = TournamentConfig::new("Cup", capacity, 2_147_483_648, vec![1]);
        assert!(matches!(
            config.validate(),
            Err(TournamentError::InvalidConfig(_))
        ));

        let largest_fee = MAX_AMOUNT / capacity as i64;
        let config = TournamentConfig::new("Cup", capacity, largest_fee, vec![1]);
        assert!(config.validate().is_ok());
        assert!(config.commission(100) <= config.fund());
        assert!(config.net_for_prizes(30) >= 0);
    }

    #[test]
    fn test_validate_rejects_prize_total_overflow() {
        let config = TournamentConfig::new("Cup", 2, 10, vec![i64::MAX, 1]);
        assert!(config.validate().is_err());
        assert_eq!(config.prizes.checked_total(), None);
        assert_eq!(config.prizes.total(), i64::MAX);

        let config = TournamentConfig::new("Cup", 2, 10, vec![MAX_AMOUNT, 1]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unvalidated_amounts_saturate() {
        let config = TournamentConfig::new("Cup", usize::MAX, i64::MAX, vec![1]);
        assert_eq!(config.fund(), i64::MAX);
        assert_eq!(config.commission(30), 2_767_011_611_056_432_742);
        assert_eq!(config.commission(100), i64::MAX);
    }
}
