//! Inbound event vocabulary.
//!
//! The transport turns whatever the chat platform delivers into one of the
//! closed [`Event`] variants. Slash commands and button payloads are parsed
//! once, at the boundary, into [`Command`] and [`Callback`].

use crate::tournament::{PhotoId, TournamentId, UserId};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Errors while decoding commands and callback payloads
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("/{command} needs <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid {argument}: {value}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },

    #[error("unknown button payload: {0}")]
    UnknownCallback(String),
}

/// One inbound event from the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: String,
    pub event: Event,
}

impl Inbound {
    pub fn new(user_id: UserId, display_name: impl Into<String>, event: Event) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            event,
        }
    }
}

/// Closed set of inbound event shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Slash command
    Command { command: Command },
    /// Free-text message
    TextInput { text: String },
    /// Uploaded image
    PhotoInput { photo: PhotoId },
    /// Inline button tap
    ButtonTap { callback: Callback },
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::TextInput { text: text.into() }
    }

    pub fn photo(photo: impl Into<PhotoId>) -> Self {
        Event::PhotoInput {
            photo: photo.into(),
        }
    }

    pub fn tap(callback: Callback) -> Self {
        Event::ButtonTap { callback }
    }

    pub fn command(command: Command) -> Self {
        Event::Command { command }
    }

    /// Wire tag of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Command { .. } => "command",
            Event::TextInput { .. } => "text_input",
            Event::PhotoInput { .. } => "photo_input",
            Event::ButtonTap { .. } => "button_tap",
        }
    }
}

/// Slash commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Command {
    Start,
    Cancel,
    Tournaments,
    MyTournaments,
    Support,
    AdminPanel,
    CreateTournament,
    Participants(TournamentId),
    Finish(TournamentId),
    Confirm {
        tournament_id: TournamentId,
        user_id: UserId,
    },
    /// Sequential place filling: `/place <tournament> <place> [payout instructions]`
    FillPlace {
        tournament_id: TournamentId,
        place: u32,
        payout_instructions: Option<String>,
    },
    Ban(UserId),
    Unban(UserId),
}

fn argument<T: FromStr>(
    args: &mut std::str::SplitWhitespace<'_>,
    command: &'static str,
    argument: &'static str,
) -> Result<T, EventError> {
    let value = args
        .next()
        .ok_or(EventError::MissingArgument { command, argument })?;
    value.parse().map_err(|_| EventError::InvalidArgument {
        argument,
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();
        // "/start@my_bot" addresses a bot in group chats
        let name = head
            .trim_start_matches('/')
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let mut args = rest.split_whitespace();

        let command = match name.as_str() {
            "start" => Command::Start,
            "cancel" => Command::Cancel,
            "tournaments" => Command::Tournaments,
            "mine" => Command::MyTournaments,
            "support" => Command::Support,
            "admin" => Command::AdminPanel,
            "create" => Command::CreateTournament,
            "participants" => {
                Command::Participants(argument(&mut args, "participants", "tournament")?)
            }
            "finish" => Command::Finish(argument(&mut args, "finish", "tournament")?),
            "confirm" => Command::Confirm {
                tournament_id: argument(&mut args, "confirm", "tournament")?,
                user_id: argument(&mut args, "confirm", "user")?,
            },
            "place" => {
                let tournament_id = argument(&mut args, "place", "tournament")?;
                let place = argument(&mut args, "place", "place")?;
                let payout = args.collect::<Vec<_>>().join(" ");
                Command::FillPlace {
                    tournament_id,
                    place,
                    payout_instructions: crate::settings::Settings::custom_instructions(&payout),
                }
            }
            "ban" => Command::Ban(argument(&mut args, "ban", "user")?),
            "unban" => Command::Unban(argument(&mut args, "unban", "user")?),
            _ => return Err(EventError::UnknownCommand(head.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Start => write!(f, "/start"),
            Command::Cancel => write!(f, "/cancel"),
            Command::Tournaments => write!(f, "/tournaments"),
            Command::MyTournaments => write!(f, "/mine"),
            Command::Support => write!(f, "/support"),
            Command::AdminPanel => write!(f, "/admin"),
            Command::CreateTournament => write!(f, "/create"),
            Command::Participants(id) => write!(f, "/participants {id}"),
            Command::Finish(id) => write!(f, "/finish {id}"),
            Command::Confirm {
                tournament_id,
                user_id,
            } => write!(f, "/confirm {tournament_id} {user_id}"),
            Command::FillPlace {
                tournament_id,
                place,
                payout_instructions,
            } => match payout_instructions {
                Some(payout) => write!(f, "/place {tournament_id} {place} {payout}"),
                None => write!(f, "/place {tournament_id} {place}"),
            },
            Command::Ban(id) => write!(f, "/ban {id}"),
            Command::Unban(id) => write!(f, "/unban {id}"),
        }
    }
}

impl TryFrom<String> for Command {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.to_string()
    }
}

/// Button actions with their target ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Callback {
    Tournaments,
    MyTournaments,
    Support,
    AdminPanel,
    CreateTournament,
    Show(TournamentId),
    Join(TournamentId),
    Pay(TournamentId),
    Participants(TournamentId),
    Finish(TournamentId),
    Confirm {
        tournament_id: TournamentId,
        user_id: UserId,
    },
    Won {
        tournament_id: TournamentId,
        user_id: UserId,
    },
    Lost {
        tournament_id: TournamentId,
        user_id: UserId,
    },
}

impl Callback {
    /// Same action reachable through a slash command, if any
    pub fn as_command(&self) -> Option<Command> {
        match *self {
            Callback::Tournaments => Some(Command::Tournaments),
            Callback::MyTournaments => Some(Command::MyTournaments),
            Callback::Support => Some(Command::Support),
            Callback::AdminPanel => Some(Command::AdminPanel),
            Callback::CreateTournament => Some(Command::CreateTournament),
            Callback::Participants(id) => Some(Command::Participants(id)),
            Callback::Finish(id) => Some(Command::Finish(id)),
            Callback::Confirm {
                tournament_id,
                user_id,
            } => Some(Command::Confirm {
                tournament_id,
                user_id,
            }),
            Callback::Show(_)
            | Callback::Join(_)
            | Callback::Pay(_)
            | Callback::Won { .. }
            | Callback::Lost { .. } => None,
        }
    }

    /// Opaque payload carried by the button
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Tournaments => write!(f, "list"),
            Callback::MyTournaments => write!(f, "mine"),
            Callback::Support => write!(f, "support"),
            Callback::AdminPanel => write!(f, "admin"),
            Callback::CreateTournament => write!(f, "create"),
            Callback::Show(id) => write!(f, "show:{id}"),
            Callback::Join(id) => write!(f, "join:{id}"),
            Callback::Pay(id) => write!(f, "pay:{id}"),
            Callback::Participants(id) => write!(f, "participants:{id}"),
            Callback::Finish(id) => write!(f, "finish:{id}"),
            Callback::Confirm {
                tournament_id,
                user_id,
            } => write!(f, "confirm:{tournament_id}:{user_id}"),
            Callback::Won {
                tournament_id,
                user_id,
            } => write!(f, "won:{tournament_id}:{user_id}"),
            Callback::Lost {
                tournament_id,
                user_id,
            } => write!(f, "lost:{tournament_id}:{user_id}"),
        }
    }
}

impl FromStr for Callback {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || EventError::UnknownCallback(s.to_string());
        let mut parts = s.split(':');
        let action = parts.next().unwrap_or_default();
        let ids = parts
            .map(|part| part.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| unknown())?;

        let callback = match (action, ids.as_slice()) {
            ("list", []) => Callback::Tournaments,
            ("mine", []) => Callback::MyTournaments,
            ("support", []) => Callback::Support,
            ("admin", []) => Callback::AdminPanel,
            ("create", []) => Callback::CreateTournament,
            ("show", [id]) => Callback::Show(*id),
            ("join", [id]) => Callback::Join(*id),
            ("pay", [id]) => Callback::Pay(*id),
            ("participants", [id]) => Callback::Participants(*id),
            ("finish", [id]) => Callback::Finish(*id),
            ("confirm", [tournament_id, user_id]) => Callback::Confirm {
                tournament_id: *tournament_id,
                user_id: *user_id,
            },
            ("won", [tournament_id, user_id]) => Callback::Won {
                tournament_id: *tournament_id,
                user_id: *user_id,
            },
            ("lost", [tournament_id, user_id]) => Callback::Lost {
                tournament_id: *tournament_id,
                user_id: *user_id,
            },
            _ => return Err(unknown()),
        };
        Ok(callback)
    }
}

impl TryFrom<String> for Callback {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Callback> for String {
    fn from(callback: Callback) -> Self {
        callback.to_string()
    }
}
