//! Event router: the single entry point for inbound events.
//!
//! Bans are checked first. The user's session lock is then held until the
//! event is fully handled, so two events of one user never interleave.
//! Commands and button taps are global and work inside a flow; text and
//! photos feed the active wizard.

use crate::{
    conversation::{
        Commit, ConversationStore, CreationWizard, Flow, Input, RegistrationWizard,
        ResultWizard, Session, Step, Wizard,
    },
    events::{Callback, Command, Event, Inbound},
    notify::Outbound,
    render,
    tournament::{
        Confirmation, TournamentEngine, TournamentError, TournamentResult, UserId,
    },
    users::UserRegistry,
};
use std::sync::Arc;

/// How an inbound event was disposed of
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Processed and answered
    Handled,
    /// Processed, but the requested operation was refused
    Refused(TournamentError),
    /// Sender is banned; nothing was processed or sent
    Banned,
}

/// Routes inbound events to commands, wizards and engine operations
#[derive(Clone)]
pub struct EventRouter {
    engine: TournamentEngine,
    users: Arc<UserRegistry>,
    conversations: Arc<ConversationStore>,
}

impl EventRouter {
    pub fn new(
        engine: TournamentEngine,
        users: Arc<UserRegistry>,
        conversations: Arc<ConversationStore>,
    ) -> Self {
        Self {
            engine,
            users,
            conversations,
        }
    }

    pub fn engine(&self) -> &TournamentEngine {
        &self.engine
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Handle one inbound event to completion
    pub async fn handle(&self, inbound: Inbound) -> Routed {
        let Inbound {
            user_id,
            display_name,
            event,
        } = inbound;

        if self.users.is_banned(user_id).await {
            log::warn!("Dropped event from banned user {}", user_id);
            return Routed::Banned;
        }
        self.users.touch(user_id, &display_name).await;

        let session = self.conversations.session(user_id).await;
        let mut session = session.lock().await;

        let result = match event {
            Event::Command { command } => self.command(user_id, &mut session, command).await,
            Event::ButtonTap { callback } => self.callback(user_id, &mut session, callback).await,
            Event::TextInput { text } => self.input(user_id, &mut session, Input::Text(&text)).await,
            Event::PhotoInput { photo } => {
                self.input(user_id, &mut session, Input::Photo(&photo)).await
            }
        };

        match result {
            Ok(()) => Routed::Handled,
            Err(e) => {
                log::debug!("User {} refused: {}", user_id, e);
                self.reply(user_id, Outbound::text(e.client_message())).await;
                Routed::Refused(e)
            }
        }
    }

    async fn reply(&self, user_id: UserId, message: Outbound) {
        self.engine.dispatcher().notify(user_id, message).await;
    }

    fn require_operator(&self, user_id: UserId) -> TournamentResult<()> {
        if self.engine.settings().is_operator(user_id) {
            Ok(())
        } else {
            Err(TournamentError::Unauthorized)
        }
    }

    /// Start a flow and ask its first question
    async fn start_flow(&self, user_id: UserId, session: &mut Session, flow: impl Into<Flow>) {
        let flow = flow.into();
        let prompt = flow.prompt();
        if let Some(previous) = session.start(flow) {
            log::debug!("User {} abandoned {:?} flow", user_id, previous.kind());
        }
        self.reply(user_id, prompt).await;
    }

    async fn command(
        &self,
        user_id: UserId,
        session: &mut Session,
        command: Command,
    ) -> TournamentResult<()> {
        let settings = self.engine.settings();
        let manager = self.engine.manager();

        match command {
            Command::Start => {
                session.clear();
                self.reply(user_id, render::main_menu(settings.is_operator(user_id)))
                    .await;
            }

            Command::Cancel => {
                let text = match session.clear() {
                    Some(_) => "Cancelled.",
                    None => "Nothing to cancel.",
                };
                self.reply(user_id, Outbound::text(text)).await;
                self.reply(user_id, render::main_menu(settings.is_operator(user_id)))
                    .await;
            }

            Command::Tournaments => {
                let active = manager.list_active().await?;
                self.reply(user_id, render::tournament_list(&active)).await;
            }

            Command::MyTournaments => {
                let mine = manager.tournaments_of(user_id).await?;
                self.reply(user_id, render::my_tournaments(user_id, &mine))
                    .await;
            }

            Command::Support => {
                self.reply(user_id, Outbound::text(settings.support_text.clone()))
                    .await;
            }

            Command::AdminPanel => {
                self.require_operator(user_id)?;
                self.reply(user_id, render::admin_menu()).await;
            }

            Command::CreateTournament => {
                self.require_operator(user_id)?;
                self.start_flow(user_id, session, CreationWizard::new()).await;
            }

            Command::Participants(tournament_id) => {
                self.require_operator(user_id)?;
                let tournament = manager.get_tournament(tournament_id).await?;
                self.reply(user_id, render::participants(&tournament)).await;
            }

            Command::Finish(tournament_id) => {
                self.require_operator(user_id)?;
                let prompted = self.engine.finish(user_id, tournament_id).await?;
                self.reply(
                    user_id,
                    Outbound::text(format!(
                        "Tournament #{tournament_id} finished. {prompted} participant(s) asked for their result."
                    )),
                )
                .await;
            }

            Command::Confirm {
                tournament_id,
                user_id: participant,
            } => {
                self.require_operator(user_id)?;
                let text = match self
                    .engine
                    .confirm_payment(user_id, tournament_id, participant)
                    .await?
                {
                    Confirmation::Confirmed => {
                        format!("Payment of {participant} in #{tournament_id} confirmed.")
                    }
                    Confirmation::AlreadyConfirmed => {
                        format!("Payment of {participant} in #{tournament_id} was already confirmed.")
                    }
                };
                self.reply(user_id, Outbound::text(text)).await;
            }

            Command::FillPlace {
                tournament_id,
                place,
                payout_instructions,
            } => {
                self.require_operator(user_id)?;
                let participant = self
                    .engine
                    .fill_place(user_id, tournament_id, place, payout_instructions)
                    .await?;
                self.reply(
                    user_id,
                    Outbound::text(format!(
                        "Place {place} of #{tournament_id} goes to {} [{}].",
                        participant.nickname, participant.user_id
                    )),
                )
                .await;
            }

            Command::Ban(target) => {
                self.require_operator(user_id)?;
                let text = if self.users.ban(target).await {
                    log::info!("User {} banned by {}", target, user_id);
                    format!("User {target} banned.")
                } else {
                    format!("User {target} is already banned.")
                };
                self.reply(user_id, Outbound::text(text)).await;
            }

            Command::Unban(target) => {
                self.require_operator(user_id)?;
                let text = if self.users.unban(target).await {
                    log::info!("User {} unbanned by {}", target, user_id);
                    format!("User {target} unbanned.")
                } else {
                    format!("User {target} is not banned.")
                };
                self.reply(user_id, Outbound::text(text)).await;
            }
        }
        Ok(())
    }

    async fn callback(
        &self,
        user_id: UserId,
        session: &mut Session,
        callback: Callback,
    ) -> TournamentResult<()> {
        if let Some(command) = callback.as_command() {
            return self.command(user_id, session, command).await;
        }

        let manager = self.engine.manager();
        match callback {
            Callback::Show(tournament_id) => {
                let tournament = manager.get_tournament(tournament_id).await?;
                self.reply(
                    user_id,
                    render::tournament_card(&tournament, user_id, self.engine.settings()),
                )
                .await;
            }

            Callback::Join(tournament_id) => {
                // Early feedback only; the actor re-checks when the nickname commits
                let tournament = manager.get_tournament(tournament_id).await?;
                if !tournament.is_active() {
                    return Err(TournamentError::TournamentNotActive(tournament_id));
                }
                if tournament.find_participant(user_id).is_some() {
                    return Err(TournamentError::AlreadyRegistered);
                }
                if tournament.is_full() {
                    return Err(TournamentError::CapacityExceeded);
                }
                self.start_flow(user_id, session, RegistrationWizard::new(tournament_id))
                    .await;
            }

            Callback::Pay(tournament_id) => {
                let tournament = manager.get_tournament(tournament_id).await?;
                if !tournament.is_active() {
                    return Err(TournamentError::TournamentNotActive(tournament_id));
                }
                let participant = manager.find_participant(tournament_id, user_id).await?;
                if participant.is_confirmed() {
                    return Err(TournamentError::PaymentAlreadyConfirmed);
                }
                self.start_flow(
                    user_id,
                    session,
                    RegistrationWizard::awaiting_payment(tournament_id),
                )
                .await;
            }

            Callback::Won {
                tournament_id,
                user_id: reporter,
            } => {
                Self::require_self(user_id, reporter)?;
                self.engine.check_reportable(tournament_id, user_id).await?;
                self.start_flow(user_id, session, ResultWizard::new(tournament_id))
                    .await;
            }

            Callback::Lost {
                tournament_id,
                user_id: reporter,
            } => {
                Self::require_self(user_id, reporter)?;
                self.engine.report_eliminated(tournament_id, user_id).await?;
                self.reply(
                    user_id,
                    Outbound::text("Thanks for playing! Your result is recorded."),
                )
                .await;
            }

            // Mapped to commands above
            Callback::Tournaments
            | Callback::MyTournaments
            | Callback::Support
            | Callback::AdminPanel
            | Callback::CreateTournament
            | Callback::Participants(_)
            | Callback::Finish(_)
            | Callback::Confirm { .. } => {}
        }
        Ok(())
    }

    /// Result buttons are addressed to one participant
    fn require_self(user_id: UserId, addressed_to: UserId) -> TournamentResult<()> {
        if user_id == addressed_to {
            Ok(())
        } else {
            Err(TournamentError::Unauthorized)
        }
    }

    async fn input(
        &self,
        user_id: UserId,
        session: &mut Session,
        input: Input<'_>,
    ) -> TournamentResult<()> {
        let Some(flow) = session.flow_mut() else {
            let is_operator = self.engine.settings().is_operator(user_id);
            self.reply(user_id, render::main_menu(is_operator)).await;
            return Ok(());
        };

        let step = match flow.accept(input) {
            Ok(step) => step,
            Err(e) => {
                let prompt = flow.prompt();
                self.reply(user_id, Outbound::text(format!("{e}\n{}", prompt.text)))
                    .await;
                return Ok(());
            }
        };
        let next_prompt = flow.prompt();

        match step {
            Step::Next => self.reply(user_id, next_prompt).await,
            Step::Checkpoint(commit) => match self.apply(user_id, commit).await {
                Ok(confirmation) => {
                    self.reply(user_id, confirmation).await;
                    self.reply(user_id, next_prompt).await;
                }
                Err(e) => {
                    session.clear();
                    return Err(e);
                }
            },
            Step::Complete(commit) => {
                session.clear();
                let confirmation = self.apply(user_id, commit).await?;
                self.reply(user_id, confirmation).await;
            }
        }
        Ok(())
    }

    /// Perform the engine operation a wizard step asked for
    async fn apply(&self, user_id: UserId, commit: Commit) -> TournamentResult<Outbound> {
        let settings = self.engine.settings();
        match commit {
            Commit::CreateTournament(config) => {
                let tournament = self.engine.create_tournament(user_id, config).await?;
                Ok(render::creation_summary(&tournament, settings))
            }
            Commit::Register {
                tournament_id,
                nickname,
            } => {
                let tournament = self
                    .engine
                    .register(tournament_id, user_id, nickname)
                    .await?;
                Ok(render::registration_card(&tournament, settings))
            }
            Commit::PaymentProof {
                tournament_id,
                photo,
            } => {
                self.engine
                    .submit_payment_proof(tournament_id, user_id, photo)
                    .await?;
                Ok(Outbound::text(
                    "Payment screenshot received. An operator will confirm it shortly.",
                ))
            }
            Commit::Win {
                tournament_id,
                result_proof,
                payout_instructions,
            } => {
                self.engine
                    .record_win(tournament_id, user_id, result_proof, payout_instructions)
                    .await?;
                Ok(Outbound::text(
                    "Your result was sent to the organizers. The prize will be paid after review.",
                ))
            }
        }
    }
}
