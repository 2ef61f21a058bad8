//! Conversation state machine.
//!
//! Every user is in at most one linear flow: tournament creation,
//! registration or result submission. Flows are plain values held in the
//! user's [`Session`]; starting a new flow discards the old one and `/cancel`
//! clears it.

pub mod store;
pub mod wizards;

pub use store::{ConversationStore, Session};
pub use wizards::{
    Commit, CreationStep, CreationWizard, Flow, FlowKind, Input, MAX_NICKNAME_LEN,
    RegistrationStep, RegistrationWizard, ResultStep, ResultWizard, Step, Wizard, WizardError,
};
