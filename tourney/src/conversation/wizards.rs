//! Linear multi-step wizards.
//!
//! A wizard accepts one input shape per step. Valid input advances the step,
//! invalid input is rejected with a [`WizardError`] and leaves the wizard
//! exactly as it was. Wizards never touch tournaments themselves: the step
//! that completes a record hands back a [`Commit`] for the router to apply.

use crate::{
    notify::Outbound,
    settings::Settings,
    tournament::{MAX_AMOUNT, PhotoId, PrizeStructure, TournamentConfig, TournamentId},
};
use enum_dispatch::enum_dispatch;
use thiserror::Error;

/// Longest nickname accepted at registration
pub const MAX_NICKNAME_LEN: usize = 32;

/// Rejected wizard input; the step is unchanged and asked again
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("{0}")]
    Validation(String),

    #[error("Please send {expected}.")]
    UnexpectedInput { expected: &'static str },
}

/// One unit of user input fed to a wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Text(&'a str),
    Photo(&'a PhotoId),
}

impl<'a> Input<'a> {
    fn text(self) -> Result<&'a str, WizardError> {
        match self {
            Input::Text(text) if !text.trim().is_empty() => Ok(text.trim()),
            Input::Text(_) => Err(WizardError::Validation("This can't be empty.".to_string())),
            Input::Photo(_) => Err(WizardError::UnexpectedInput { expected: "text" }),
        }
    }

    fn photo(self) -> Result<&'a PhotoId, WizardError> {
        match self {
            Input::Photo(photo) => Ok(photo),
            Input::Text(_) => Err(WizardError::UnexpectedInput { expected: "a photo" }),
        }
    }

    fn number(self, min: i64, max: i64) -> Result<i64, WizardError> {
        let text = self.text()?;
        let value: i64 = text
            .parse()
            .map_err(|_| WizardError::Validation(format!("\"{text}\" is not a number.")))?;
        if value < min || value > max {
            return Err(WizardError::Validation(format!(
                "Enter a number from {min} to {max}."
            )));
        }
        Ok(value)
    }

    fn yes_no(self) -> Result<bool, WizardError> {
        match self.text()?.to_lowercase().as_str() {
            "yes" | "y" => Ok(true),
            "no" | "n" => Ok(false),
            _ => Err(WizardError::Validation("Answer yes or no.".to_string())),
        }
    }
}

/// Engine operation requested by a wizard step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    CreateTournament(TournamentConfig),
    Register {
        tournament_id: TournamentId,
        nickname: String,
    },
    PaymentProof {
        tournament_id: TournamentId,
        photo: PhotoId,
    },
    Win {
        tournament_id: TournamentId,
        result_proof: PhotoId,
        payout_instructions: Option<String>,
    },
}

/// What the router does after an accepted input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Ask the next question
    Next,
    /// Apply the commit, then ask the next question; abort the flow on failure
    Checkpoint(Commit),
    /// Apply the commit and end the flow
    Complete(Commit),
}

/// Behaviour shared by every wizard
#[enum_dispatch]
pub trait Wizard {
    /// Question for the current step
    fn prompt(&self) -> Outbound;

    /// Feed one input to the current step
    fn accept(&mut self, input: Input<'_>) -> Result<Step, WizardError>;
}

/// Which flow a user is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    CreateTournament,
    Registration,
    ResultSubmission,
}

/// The active wizard of a user
#[enum_dispatch(Wizard)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    CreateTournament(CreationWizard),
    Registration(RegistrationWizard),
    ResultSubmission(ResultWizard),
}

impl Flow {
    pub fn kind(&self) -> FlowKind {
        match self {
            Flow::CreateTournament(_) => FlowKind::CreateTournament,
            Flow::Registration(_) => FlowKind::Registration,
            Flow::ResultSubmission(_) => FlowKind::ResultSubmission,
        }
    }
}

// ============================================================================
// Tournament creation
// ============================================================================

/// Steps of the creation wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStep {
    Title,
    Game,
    Mode,
    Capacity,
    EntryFee,
    PrizePlaces,
    /// 1-indexed place whose prize is asked
    Prize(usize),
    PaymentInstructions,
    MapPhotoChoice,
    MapPhoto,
}

/// Operator's tournament creation wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationWizard {
    step: CreationStep,
    draft: TournamentConfig,
    prize_places: usize,
}

impl Default for CreationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationWizard {
    pub fn new() -> Self {
        Self {
            step: CreationStep::Title,
            draft: TournamentConfig::new(String::new(), 0, 0, Vec::new()),
            prize_places: 0,
        }
    }

    pub fn step(&self) -> CreationStep {
        self.step
    }

    fn complete(&self, map_photo: Option<PhotoId>) -> Step {
        let mut config = self.draft.clone();
        config.map_photo = map_photo;
        Step::Complete(Commit::CreateTournament(config))
    }
}

impl Wizard for CreationWizard {
    fn prompt(&self) -> Outbound {
        let text = match self.step {
            CreationStep::Title => "Tournament title:".to_string(),
            CreationStep::Game => "Game:".to_string(),
            CreationStep::Mode => "Mode (e.g. Solo Showdown, 1v1, 3v3):".to_string(),
            CreationStep::Capacity => "Number of paying players (e.g. 9):".to_string(),
            CreationStep::EntryFee => "Entry fee (e.g. 100):".to_string(),
            CreationStep::PrizePlaces => {
                format!("Prize places (1-{}):", self.draft.capacity)
            }
            CreationStep::Prize(place) => format!("Prize for place {place}:"),
            CreationStep::PaymentInstructions => {
                "Payment details for registrants (send \"default\" for the standard ones):"
                    .to_string()
            }
            CreationStep::MapPhotoChoice => "Attach a map photo? (yes/no)".to_string(),
            CreationStep::MapPhoto => "Send the map photo:".to_string(),
        };
        Outbound::text(text)
    }

    fn accept(&mut self, input: Input<'_>) -> Result<Step, WizardError> {
        match self.step {
            CreationStep::Title => {
                self.draft.title = input.text()?.to_string();
                self.step = CreationStep::Game;
            }
            CreationStep::Game => {
                self.draft.game = input.text()?.to_string();
                self.step = CreationStep::Mode;
            }
            CreationStep::Mode => {
                self.draft.mode = input.text()?.to_string();
                self.step = CreationStep::Capacity;
            }
            CreationStep::Capacity => {
                self.draft.capacity = input.number(1, i64::from(u32::MAX))? as usize;
                self.step = CreationStep::EntryFee;
            }
            CreationStep::EntryFee => {
                // The fund must stay within MAX_AMOUNT for this capacity
                let max_fee = MAX_AMOUNT / self.draft.capacity as i64;
                self.draft.entry_fee = input.number(0, max_fee)?;
                self.step = CreationStep::PrizePlaces;
            }
            CreationStep::PrizePlaces => {
                self.prize_places = input.number(1, self.draft.capacity as i64)? as usize;
                self.draft.prizes = PrizeStructure::new(Vec::new());
                self.step = CreationStep::Prize(1);
            }
            CreationStep::Prize(place) => {
                let remaining = MAX_AMOUNT - self.draft.prizes.total();
                let amount = input.number(0, remaining)?;
                self.draft.prizes.payouts.push(amount);
                self.step = if place < self.prize_places {
                    CreationStep::Prize(place + 1)
                } else {
                    CreationStep::PaymentInstructions
                };
            }
            CreationStep::PaymentInstructions => {
                self.draft.payment_instructions = Settings::custom_instructions(input.text()?);
                self.step = CreationStep::MapPhotoChoice;
            }
            CreationStep::MapPhotoChoice => {
                if let Input::Photo(photo) = input {
                    return Ok(self.complete(Some(photo.clone())));
                }
                if !input.yes_no()? {
                    return Ok(self.complete(None));
                }
                self.step = CreationStep::MapPhoto;
            }
            CreationStep::MapPhoto => {
                let photo = input.photo()?.clone();
                return Ok(self.complete(Some(photo)));
            }
        }
        Ok(Step::Next)
    }
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Nickname,
    PaymentProof,
}

/// Player registration: nickname, then payment screenshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationWizard {
    tournament_id: TournamentId,
    step: RegistrationStep,
}

impl RegistrationWizard {
    pub fn new(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            step: RegistrationStep::Nickname,
        }
    }

    /// Resume at the payment step for an already registered user
    pub fn awaiting_payment(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            step: RegistrationStep::PaymentProof,
        }
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }
}

impl Wizard for RegistrationWizard {
    fn prompt(&self) -> Outbound {
        match self.step {
            RegistrationStep::Nickname => Outbound::text("Enter your in-game nickname:"),
            RegistrationStep::PaymentProof => {
                Outbound::text("Send a screenshot of your payment.")
            }
        }
    }

    fn accept(&mut self, input: Input<'_>) -> Result<Step, WizardError> {
        match self.step {
            RegistrationStep::Nickname => {
                let nickname = input.text()?;
                if nickname.chars().count() > MAX_NICKNAME_LEN {
                    return Err(WizardError::Validation(format!(
                        "Nickname must be at most {MAX_NICKNAME_LEN} characters."
                    )));
                }
                self.step = RegistrationStep::PaymentProof;
                Ok(Step::Checkpoint(Commit::Register {
                    tournament_id: self.tournament_id,
                    nickname: nickname.to_string(),
                }))
            }
            RegistrationStep::PaymentProof => Ok(Step::Complete(Commit::PaymentProof {
                tournament_id: self.tournament_id,
                photo: input.photo()?.clone(),
            })),
        }
    }
}

// ============================================================================
// Result submission
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStep {
    ResultProof,
    PayoutInstructions { result_proof: PhotoId },
}

/// Winner's result flow: screenshot, then payout details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultWizard {
    tournament_id: TournamentId,
    step: ResultStep,
}

impl ResultWizard {
    pub fn new(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            step: ResultStep::ResultProof,
        }
    }

    pub fn step(&self) -> &ResultStep {
        &self.step
    }
}

impl Wizard for ResultWizard {
    fn prompt(&self) -> Outbound {
        match self.step {
            ResultStep::ResultProof => Outbound::text("Send a screenshot of your result."),
            ResultStep::PayoutInstructions { .. } => Outbound::text(
                "Where should we send your prize? Send your details, or \"default\" to be paid the usual way.",
            ),
        }
    }

    fn accept(&mut self, input: Input<'_>) -> Result<Step, WizardError> {
        match &self.step {
            ResultStep::ResultProof => {
                let result_proof = input.photo()?.clone();
                self.step = ResultStep::PayoutInstructions { result_proof };
                Ok(Step::Next)
            }
            ResultStep::PayoutInstructions { result_proof } => {
                let payout_instructions = Settings::custom_instructions(input.text()?);
                Ok(Step::Complete(Commit::Win {
                    tournament_id: self.tournament_id,
                    result_proof: result_proof.clone(),
                    payout_instructions,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(wizard: &mut impl Wizard, inputs: &[&str]) {
        for input in inputs {
            assert_eq!(wizard.accept(Input::Text(input)).unwrap(), Step::Next);
        }
    }

    #[test]
    fn test_creation_happy_path() {
        let mut wizard = CreationWizard::new();
        feed(
            &mut wizard,
            &["Friday Cup", "Brawl Stars", "Solo", "5", "100", "2", "500", "300", "default"],
        );
        assert_eq!(wizard.step(), CreationStep::MapPhotoChoice);

        let Step::Complete(Commit::CreateTournament(config)) =
            wizard.accept(Input::Text("no")).unwrap()
        else {
            panic!("expected a completed creation");
        };
        assert_eq!(config.title, "Friday Cup");
        assert_eq!(config.game, "Brawl Stars");
        assert_eq!(config.capacity, 5);
        assert_eq!(config.entry_fee, 100);
        assert_eq!(config.prizes.payouts, vec![500, 300]);
        assert_eq!(config.payment_instructions, None);
        assert_eq!(config.map_photo, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_creation_with_map_photo() {
        let mut wizard = CreationWizard::new();
        feed(
            &mut wizard,
            &["Cup", "Standoff 2", "1v1", "2", "50", "1", "90", "card 1111", "yes"],
        );
        assert_eq!(wizard.step(), CreationStep::MapPhoto);
        assert_eq!(
            wizard.accept(Input::Text("here")),
            Err(WizardError::UnexpectedInput { expected: "a photo" })
        );

        let photo = "map-1".to_string();
        let Step::Complete(Commit::CreateTournament(config)) =
            wizard.accept(Input::Photo(&photo)).unwrap()
        else {
            panic!("expected a completed creation");
        };
        assert_eq!(config.map_photo.as_deref(), Some("map-1"));
        assert_eq!(config.payment_instructions.as_deref(), Some("card 1111"));
    }

    #[test]
    fn test_invalid_capacity_keeps_step() {
        let mut wizard = CreationWizard::new();
        feed(&mut wizard, &["Cup", "Game", "Mode"]);
        let before = wizard.clone();

        assert!(matches!(
            wizard.accept(Input::Text("nine")),
            Err(WizardError::Validation(_))
        ));
        assert!(wizard.accept(Input::Text("0")).is_err());
        assert!(wizard.accept(Input::Text("-3")).is_err());
        assert_eq!(wizard, before);
        assert_eq!(wizard.step(), CreationStep::Capacity);
    }

    #[test]
    fn test_amounts_bounded_so_commission_fits() {
        let mut wizard = CreationWizard::new();
        feed(&mut wizard, &["Cup", "Game", "Mode", "4294967295"]);
        assert!(wizard.accept(Input::Text("2147483648")).is_err());
        assert_eq!(wizard.step(), CreationStep::EntryFee);

        let max_fee = MAX_AMOUNT / i64::from(u32::MAX);
        feed(&mut wizard, &[&max_fee.to_string(), "2", &(MAX_AMOUNT - 1).to_string()]);
        assert!(wizard.accept(Input::Text("2")).is_err());
        feed(&mut wizard, &["1", "default"]);

        let Step::Complete(Commit::CreateTournament(config)) =
            wizard.accept(Input::Text("no")).unwrap()
        else {
            panic!("expected a completed creation");
        };
        assert!(config.validate().is_ok());
        assert!(config.fund() <= MAX_AMOUNT);
        assert_eq!(config.prizes.total(), MAX_AMOUNT);
        assert!(config.commission(30) < config.fund());
    }

    #[test]
    fn test_prize_places_bounded_by_capacity() {
        let mut wizard = CreationWizard::new();
        feed(&mut wizard, &["Cup", "Game", "Mode", "3", "10"]);
        assert!(wizard.accept(Input::Text("4")).is_err());
        assert_eq!(wizard.step(), CreationStep::PrizePlaces);
        assert_eq!(wizard.prompt().text, "Prize places (1-3):");
    }

    #[test]
    fn test_negative_prize_rejected() {
        let mut wizard = CreationWizard::new();
        feed(&mut wizard, &["Cup", "Game", "Mode", "3", "10", "1"]);
        assert!(wizard.accept(Input::Text("-5")).is_err());
        assert_eq!(wizard.step(), CreationStep::Prize(1));
    }

    #[test]
    fn test_photo_where_text_expected() {
        let mut wizard = CreationWizard::new();
        let photo = "x".to_string();
        assert_eq!(
            wizard.accept(Input::Photo(&photo)),
            Err(WizardError::UnexpectedInput { expected: "text" })
        );
        assert_eq!(wizard.step(), CreationStep::Title);
    }

    #[test]
    fn test_registration_steps() {
        let mut flow = Flow::from(RegistrationWizard::new(4));
        assert_eq!(flow.kind(), FlowKind::Registration);
        assert!(flow.accept(Input::Text("   ")).is_err());
        assert!(flow.accept(Input::Text(&"x".repeat(MAX_NICKNAME_LEN + 1))).is_err());

        assert_eq!(
            flow.accept(Input::Text("neo")).unwrap(),
            Step::Checkpoint(Commit::Register {
                tournament_id: 4,
                nickname: "neo".to_string()
            })
        );
        assert_eq!(flow.prompt().text, "Send a screenshot of your payment.");

        let photo = "pay".to_string();
        assert_eq!(
            flow.accept(Input::Photo(&photo)).unwrap(),
            Step::Complete(Commit::PaymentProof {
                tournament_id: 4,
                photo: "pay".to_string()
            })
        );
    }

    #[test]
    fn test_result_flow_with_default_payout() {
        let mut flow = Flow::from(ResultWizard::new(2));
        assert!(flow.accept(Input::Text("I won")).is_err());

        let photo = "result".to_string();
        assert_eq!(flow.accept(Input::Photo(&photo)).unwrap(), Step::Next);
        assert_eq!(
            flow.accept(Input::Text("-")).unwrap(),
            Step::Complete(Commit::Win {
                tournament_id: 2,
                result_proof: "result".to_string(),
                payout_instructions: None,
            })
        );
    }
}
