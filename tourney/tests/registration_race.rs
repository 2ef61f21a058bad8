//! Concurrent registration tests.
//!
//! Many users race for the last slots of one tournament; the actor must
//! never admit more than the capacity or the same user twice.

use std::collections::HashSet;
use std::sync::Arc;
use tourney::events::{Callback, Event, Inbound};
use tourney::notify::{Dispatcher, MailboxNotifier};
use tourney::settings::Settings;
use tourney::tournament::{TournamentConfig, TournamentError, TournamentManager};
use tourney::{ConversationStore, EventRouter, Routed, TournamentEngine, UserRegistry};

#[tokio::test]
async fn test_forty_users_race_for_five_slots() {
    let manager = TournamentManager::new();
    let id = manager
        .create_tournament(TournamentConfig::new("Race", 5, 10, vec![30]))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for user_id in 100..140 {
        let manager = manager.clone();
        tasks.push(tokio::spawn(async move {
            manager
                .add_participant(id, user_id, format!("p{user_id}"))
                .await
        }));
    }

    let mut admitted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(e) => assert_eq!(e, TournamentError::CapacityExceeded),
        }
    }

    let tournament = manager.get_tournament(id).await.unwrap();
    assert_eq!(admitted, 5);
    assert_eq!(tournament.participants.len(), 5);
}

#[tokio::test]
async fn test_same_user_registers_once_under_retries() {
    let manager = TournamentManager::new();
    let id = manager
        .create_tournament(TournamentConfig::new("Retry", 10, 10, vec![30]))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let manager = manager.clone();
        tasks.push(tokio::spawn(async move {
            manager.add_participant(id, 7, "seven".to_string()).await
        }));
    }

    let mut admitted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(e) => assert_eq!(e, TournamentError::AlreadyRegistered),
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(manager.get_tournament(id).await.unwrap().participants.len(), 1);
}

#[tokio::test]
async fn test_nicknames_racing_for_last_slots_through_router() {
    const OPERATOR: i64 = 1;
    let mailbox = Arc::new(MailboxNotifier::default());
    let engine = TournamentEngine::new(
        TournamentManager::new(),
        Dispatcher::new(mailbox.clone()),
        Arc::new(Settings::new([OPERATOR])),
    );
    let id = engine
        .create_tournament(OPERATOR, TournamentConfig::new("Race", 3, 10, vec![30]))
        .await
        .unwrap()
        .id;
    let router = EventRouter::new(
        engine,
        Arc::new(UserRegistry::new()),
        Arc::new(ConversationStore::new()),
    );

    // Everyone passes the early check before anyone commits
    let users: Vec<i64> = (200..212).collect();
    for &user_id in &users {
        let routed = router
            .handle(Inbound::new(user_id, "racer", Event::tap(Callback::Join(id))))
            .await;
        assert_eq!(routed, Routed::Handled);
    }

    let mut tasks = Vec::new();
    for &user_id in &users {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            let routed = router
                .handle(Inbound::new(user_id, "racer", Event::text(format!("r{user_id}"))))
                .await;
            (user_id, routed)
        }));
    }

    let mut admitted = HashSet::new();
    for task in tasks {
        let (user_id, routed) = task.await.unwrap();
        match routed {
            Routed::Handled => {
                admitted.insert(user_id);
            }
            other => {
                assert_eq!(other, Routed::Refused(TournamentError::CapacityExceeded));
                // A failed registration ends the flow
                assert_eq!(router.conversations().active_flow(user_id).await, None);
            }
        }
    }

    let tournament = router.engine().manager().get_tournament(id).await.unwrap();
    assert_eq!(admitted.len(), 3);
    assert_eq!(tournament.participants.len(), 3);
    let registered: HashSet<i64> = tournament.participants.iter().map(|p| p.user_id).collect();
    assert_eq!(registered, admitted);
}
