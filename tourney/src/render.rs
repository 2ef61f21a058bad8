//! User-facing texts and menus.

use crate::{
    events::Callback,
    notify::{Button, Outbound},
    settings::Settings,
    tournament::{
        Outcome, Participant, PaymentStatus, Tournament, TournamentStatus, TournamentSummary,
        UserId,
    },
};
use std::fmt::Write;

fn button(label: &str, callback: Callback) -> Button {
    Button::new(label, callback.encode())
}

/// Main menu; operators also get the admin entry
pub fn main_menu(is_operator: bool) -> Outbound {
    let mut buttons = vec![
        button("🏆 Tournaments", Callback::Tournaments),
        button("👤 My tournaments", Callback::MyTournaments),
        button("ℹ️ About & support", Callback::Support),
    ];
    if is_operator {
        buttons.push(button("🔧 Admin panel", Callback::AdminPanel));
    }
    Outbound::text("Welcome!").with_buttons(buttons)
}

pub fn admin_menu() -> Outbound {
    Outbound::text("Admin panel:").with_buttons(vec![
        button("Create tournament", Callback::CreateTournament),
        button("Tournaments", Callback::Tournaments),
    ])
}

fn payment_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Unpaid => "unpaid",
        PaymentStatus::ProofSubmitted => "proof sent",
        PaymentStatus::Confirmed => "paid",
    }
}

fn outcome_label(participant: &Participant) -> String {
    match (participant.outcome, participant.place) {
        (Outcome::Undetermined, _) => "-".to_string(),
        (Outcome::Eliminated, _) => "eliminated".to_string(),
        (Outcome::Won, Some(place)) => format!("place {place}"),
        (Outcome::Won, None) => "won".to_string(),
    }
}

fn prize_lines(text: &mut String, tournament: &Tournament) {
    for (place, prize) in tournament.config.prizes.payouts.iter().enumerate() {
        let _ = writeln!(text, "{} place: {}", place + 1, prize);
    }
}

/// Summary shown to the operator right after creation
pub fn creation_summary(tournament: &Tournament, settings: &Settings) -> Outbound {
    let config = &tournament.config;
    let percent = settings.commission_percent;

    let mut text = format!("Tournament #{} created!\n", tournament.id);
    let _ = writeln!(text, "Title: {}", config.title);
    let _ = writeln!(text, "Game: {}", config.game);
    let _ = writeln!(text, "Mode: {}", config.mode);
    let _ = writeln!(text, "Slots: {}", config.capacity);
    let _ = writeln!(text, "Entry fee: {}", config.entry_fee);
    text.push_str("Prizes:\n");
    prize_lines(&mut text, tournament);
    let _ = writeln!(text, "Fund: {}", config.fund());
    let _ = writeln!(text, "Prize total: {}", config.prizes.total());
    let _ = writeln!(text, "Commission ({percent}%): {}", config.commission(percent));
    let _ = writeln!(text, "Net for prizes: {}", config.net_for_prizes(percent));
    if config.prizes.total() > config.net_for_prizes(percent) {
        text.push_str("⚠️ Prizes exceed the fund after commission.\n");
    }
    let _ = write!(
        text,
        "Payment details: {}",
        settings.resolve_instructions(config.payment_instructions.as_deref())
    );

    Outbound::text(text)
        .with_optional_photo(config.map_photo.clone())
        .with_buttons(vec![
            button("Participants", Callback::Participants(tournament.id)),
            button("Admin panel", Callback::AdminPanel),
        ])
}

/// Tournament card with the buttons relevant to the viewer
pub fn tournament_card(tournament: &Tournament, viewer: UserId, settings: &Settings) -> Outbound {
    let config = &tournament.config;
    let mut text = format!("#{} {}\n", tournament.id, config.title);
    if !config.game.is_empty() {
        let _ = writeln!(text, "{} / {}", config.game, config.mode);
    }
    let _ = writeln!(
        text,
        "Players: {}/{}",
        tournament.participants.len(),
        config.capacity
    );
    let _ = writeln!(text, "Entry fee: {}", config.entry_fee);
    text.push_str("Prizes:\n");
    prize_lines(&mut text, tournament);

    let mut buttons = Vec::new();
    match (tournament.status, tournament.find_participant(viewer)) {
        (TournamentStatus::Finished, _) => text.push_str("Finished."),
        (TournamentStatus::Active, None) if tournament.is_full() => text.push_str("No slots left."),
        (TournamentStatus::Active, None) => {
            buttons.push(button("Register", Callback::Join(tournament.id)));
        }
        (TournamentStatus::Active, Some(participant)) => {
            let _ = write!(
                text,
                "You are registered as {} ({}).",
                participant.nickname,
                payment_label(participant.payment_status)
            );
            if !participant.is_confirmed() {
                buttons.push(button("Send payment screenshot", Callback::Pay(tournament.id)));
            }
        }
    }

    if settings.is_operator(viewer) {
        buttons.push(button("Participants", Callback::Participants(tournament.id)));
        if tournament.is_active() {
            buttons.push(button("Finish", Callback::Finish(tournament.id)));
        }
    }

    Outbound::text(text)
        .with_optional_photo(config.map_photo.clone())
        .with_buttons(buttons)
}

/// Listing of active tournaments
pub fn tournament_list(summaries: &[TournamentSummary]) -> Outbound {
    if summaries.is_empty() {
        return Outbound::text("No open tournaments right now.");
    }

    let mut text = String::from("Open tournaments:\n");
    let mut buttons = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let _ = writeln!(
            text,
            "#{} {} ({}/{}, fee {})",
            summary.id, summary.title, summary.registered, summary.capacity, summary.entry_fee
        );
        buttons.push(button(
            &format!("#{} {}", summary.id, summary.title),
            Callback::Show(summary.id),
        ));
    }
    Outbound::text(text.trim_end()).with_buttons(buttons)
}

/// The user's registrations
pub fn my_tournaments(user_id: UserId, tournaments: &[Tournament]) -> Outbound {
    let mut text = String::new();
    for tournament in tournaments {
        if let Some(participant) = tournament.find_participant(user_id) {
            let _ = writeln!(
                text,
                "#{} {}: {}, result {}",
                tournament.id,
                tournament.config.title,
                payment_label(participant.payment_status),
                outcome_label(participant)
            );
        }
    }
    if text.is_empty() {
        return Outbound::text("You have not registered anywhere yet.");
    }
    Outbound::text(format!("Your tournaments:\n{}", text.trim_end()))
}

/// Operator view of the participants with confirm buttons
pub fn participants(tournament: &Tournament) -> Outbound {
    if tournament.participants.is_empty() {
        return Outbound::text(format!("#{}: no participants yet.", tournament.id));
    }

    let mut text = format!(
        "#{} {} participants ({}/{}):\n",
        tournament.id,
        tournament.config.title,
        tournament.participants.len(),
        tournament.config.capacity
    );
    let mut buttons = Vec::new();
    for (index, participant) in tournament.participants.iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. {} [{}] {}, result {}",
            index + 1,
            participant.nickname,
            participant.user_id,
            payment_label(participant.payment_status),
            outcome_label(participant)
        );
        if participant.payment_status == PaymentStatus::ProofSubmitted {
            buttons.push(button(
                &format!("Confirm {}", participant.nickname),
                Callback::Confirm {
                    tournament_id: tournament.id,
                    user_id: participant.user_id,
                },
            ));
        }
    }
    Outbound::text(text.trim_end()).with_buttons(buttons)
}

/// Shown to a registrant right after registration
pub fn registration_card(tournament: &Tournament, settings: &Settings) -> Outbound {
    let config = &tournament.config;
    Outbound::text(format!(
        "You are registered in #{} {}.\nPay {} using: {}",
        tournament.id,
        config.title,
        config.entry_fee,
        settings.resolve_instructions(config.payment_instructions.as_deref())
    ))
}

/// Payment proof forwarded to operators
pub fn payment_proof_notice(tournament: &Tournament, participant: &Participant) -> Outbound {
    let text = format!(
        "Payment proof for #{} {}\nPlayer: {} [{}]\nAmount: {}",
        tournament.id,
        tournament.config.title,
        participant.nickname,
        participant.user_id,
        tournament.config.entry_fee
    );
    Outbound::text(text)
        .with_optional_photo(participant.payment_proof.clone())
        .with_buttons(vec![button(
            "Confirm payment",
            Callback::Confirm {
                tournament_id: tournament.id,
                user_id: participant.user_id,
            },
        )])
}

pub fn payment_confirmed(tournament: &Tournament) -> Outbound {
    Outbound::text(format!(
        "Your payment for #{} {} is confirmed. Good luck!",
        tournament.id, tournament.config.title
    ))
}

/// Outcome prompt sent to each confirmed participant when a tournament ends
pub fn result_prompt(tournament: &Tournament, user_id: UserId) -> Outbound {
    Outbound::text(format!(
        "Tournament #{} {} is over. How did it go?",
        tournament.id, tournament.config.title
    ))
    .with_buttons(vec![
        button(
            "🏆 I won a prize place",
            Callback::Won {
                tournament_id: tournament.id,
                user_id,
            },
        ),
        button(
            "I lost",
            Callback::Lost {
                tournament_id: tournament.id,
                user_id,
            },
        ),
    ])
}

/// Self-reported win forwarded to operators
pub fn win_report(tournament: &Tournament, participant: &Participant) -> Outbound {
    Outbound::text(format!(
        "Result for #{} {}\nWinner: {} [{}]\nPayout to: {}",
        tournament.id,
        tournament.config.title,
        participant.nickname,
        participant.user_id,
        participant.payout_instructions.as_deref().unwrap_or_default()
    ))
    .with_optional_photo(participant.result_proof.clone())
}

/// Sent to the participant who received a place from an operator
pub fn place_awarded(tournament: &Tournament, participant: &Participant) -> Outbound {
    let place = participant.place.unwrap_or_default();
    let prize = tournament
        .config
        .prizes
        .payout_for_place(place)
        .unwrap_or_default();
    Outbound::text(format!(
        "Congratulations! You took place {} in #{} {}. Prize: {}.\nPayout to: {}",
        place,
        tournament.id,
        tournament.config.title,
        prize,
        participant.payout_instructions.as_deref().unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::TournamentConfig;

    fn tournament() -> Tournament {
        let mut config = TournamentConfig::new("Friday Cup", 5, 100, vec![500, 300]);
        config.game = "Brawl Stars".to_string();
        config.mode = "Solo".to_string();
        Tournament::new(3, config)
    }

    #[test]
    fn test_creation_summary_reports_money() {
        let summary = creation_summary(&tournament(), &Settings::new([1]));
        assert!(summary.text.contains("Fund: 500"));
        assert!(summary.text.contains("Prize total: 800"));
        assert!(summary.text.contains("Commission (30%): 150"));
        assert!(summary.text.contains("Net for prizes: 350"));
        assert!(summary.text.contains("Prizes exceed"));
    }

    #[test]
    fn test_card_buttons_depend_on_viewer() {
        let settings = Settings::new([1]);
        let mut t = tournament();

        let card = tournament_card(&t, 9, &settings);
        assert_eq!(card.payloads().collect::<Vec<_>>(), vec!["join:3"]);

        t.add_participant(9, "nine".into()).unwrap();
        let card = tournament_card(&t, 9, &settings);
        assert_eq!(card.payloads().collect::<Vec<_>>(), vec!["pay:3"]);

        let card = tournament_card(&t, 1, &settings);
        assert_eq!(
            card.payloads().collect::<Vec<_>>(),
            vec!["join:3", "participants:3", "finish:3"]
        );
    }

    #[test]
    fn test_participants_offers_confirm_for_pending_proofs() {
        let mut t = tournament();
        t.add_participant(9, "nine".into()).unwrap();
        t.add_participant(10, "ten".into()).unwrap();
        t.submit_payment_proof(10, "img".into()).unwrap();

        let view = participants(&t);
        assert_eq!(view.payloads().collect::<Vec<_>>(), vec!["confirm:3:10"]);
        assert!(view.text.contains("nine [9] unpaid"));
    }

    #[test]
    fn test_main_menu_admin_entry() {
        assert_eq!(main_menu(false).buttons.len(), 3);
        assert_eq!(
            main_menu(true).buttons.last().map(|b| b.payload.as_str()),
            Some("admin")
        );
    }
}
