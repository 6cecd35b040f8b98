//! Round progression, status, credential release and session eviction
//! through `GameService`.

mod common;
mod support;

use std::time::Duration;

use backend_test_support::fixtures;
use backend_test_support::unique_helpers::unique_user_id;
use riddler::config::{AppConfig, SessionConfig};
use riddler::services::game::NO_ROUND_HINT;
use riddler::{ErrorCode, Record, RoundStatus};
use support::{state_with, StubGenerator};

fn catalog(n: usize) -> Vec<Record> {
    match fixtures::numbered_catalog(n) {
        serde_json::Value::Array(docs) => docs.into_iter().map(common::record).collect(),
        _ => unreachable!("numbered_catalog returns an array"),
    }
}

#[test]
fn fourth_advance_over_three_rounds_ends_the_game() {
    let state = state_with(catalog(3), 1, StubGenerator::answering("TRUE"), AppConfig::default());
    let user = unique_user_id("player");

    let advances: Vec<_> = (0..4)
        .map(|_| state.game().next_round(&user).unwrap())
        .collect();

    assert_eq!(
        advances.iter().map(|a| a.status).collect::<Vec<_>>(),
        vec![
            RoundStatus::NextRoundStarted,
            RoundStatus::NextRoundStarted,
            RoundStatus::NextRoundStarted,
            RoundStatus::GameOverAllRounds,
        ]
    );
    assert_eq!(
        advances.iter().map(|a| a.current_round).collect::<Vec<_>>(),
        vec![1, 2, 3, 3]
    );
    assert_eq!(
        advances.iter().map(|a| a.remaining_rounds).collect::<Vec<_>>(),
        vec![3, 2, 1, 0]
    );
    assert!(advances.iter().all(|a| a.total_rounds == 3));

    let status = state.game().status(&user).unwrap();
    assert!(!status.ready);
    assert!(state.game().sessions().current_record(&user).unwrap().is_none());
}

#[tokio::test]
async fn asking_after_the_last_round_reports_no_game() {
    let stub = StubGenerator::answering("TRUE");
    let state = state_with(catalog(1), 1, stub.clone(), AppConfig::default());

    state.game().next_round("alice").unwrap();
    let over = state.game().next_round("alice").unwrap();
    assert_eq!(over.status, RoundStatus::GameOverAllRounds);

    let resp = state.game().ask("alice", "Is it male?", &[]).await.unwrap();
    assert_eq!(resp.answer, "ERROR: Game not initialized.");
    assert_eq!(resp.hint, NO_ROUND_HINT);
    assert!(!resp.game_over);
    assert_eq!(stub.calls(), 0);
}

#[test]
fn status_creates_the_session_on_first_access() {
    let state = state_with(catalog(4), 1, StubGenerator::answering("TRUE"), AppConfig::default());

    let status = state.game().status("alice").unwrap();
    assert_eq!(status.total_rounds, 4);
    assert_eq!(status.remaining_rounds, 4);
    assert_eq!(status.current_round, 1);
    assert!(status.ready);

    let json = serde_json::to_value(status).unwrap();
    assert_eq!(json["game_ready"], true);
}

#[test]
fn records_never_repeat_within_a_session() {
    let state = state_with(catalog(10), 1, StubGenerator::answering("TRUE"), AppConfig::default());
    let mut seen = std::collections::HashSet::new();

    loop {
        if let Some(record) = state.game().sessions().current_record("alice").unwrap() {
            assert!(seen.insert(record.display_name().to_string()));
        }
        if state.game().next_round("alice").unwrap().status == RoundStatus::GameOverAllRounds {
            break;
        }
    }
    assert_eq!(seen.len(), 10);
}

#[test]
fn round_cap_limits_total_rounds() {
    let config = AppConfig::default().with_session(SessionConfig::default().with_max_rounds(10));
    let state = state_with(catalog(25), 1, StubGenerator::answering("TRUE"), config);

    assert_eq!(state.game().status("alice").unwrap().total_rounds, 10);
}

#[test]
fn empty_catalog_is_a_structured_failure() {
    let state = state_with(Vec::new(), 1, StubGenerator::answering("TRUE"), AppConfig::default());

    let err = state.game().status("alice").unwrap_err();
    assert_eq!(err.code(), ErrorCode::CatalogEmpty);
    let err = state.game().next_round("alice").unwrap_err();
    assert_eq!(err.code(), ErrorCode::CatalogEmpty);
}

#[tokio::test]
async fn finishing_the_game_releases_the_credential() {
    let state = state_with(catalog(2), 2, StubGenerator::answering("TRUE"), AppConfig::default());

    state.game().ask("alice", "Is it male?", &[]).await.unwrap();
    assert_eq!(state.game().pool_stats().iter().map(|s| s.load).sum::<u64>(), 1);

    state.game().next_round("alice").unwrap();
    let over = state.game().next_round("alice").unwrap();
    assert_eq!(over.status, RoundStatus::GameOverAllRounds);

    assert!(state.game().pool_stats().iter().all(|s| s.load == 0));
    assert_eq!(state.game().evaluator().pool().bound_index("alice"), None);
}

#[tokio::test]
async fn idle_sessions_are_evicted_and_unbound() {
    let config = AppConfig::default()
        .with_session(SessionConfig::default().with_idle_ttl(Duration::from_millis(20)));
    let state = state_with(catalog(3), 1, StubGenerator::answering("TRUE"), config);

    state.game().ask("alice", "Is it male?", &[]).await.unwrap();
    assert_eq!(state.game().sessions().len(), 1);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(state.game().evict_idle_sessions(), 1);
    assert!(state.game().sessions().is_empty());
    assert_eq!(state.game().pool_stats()[0].load, 0);

    // A returning user starts over.
    assert_eq!(state.game().status("alice").unwrap().current_round, 1);
}

#[test]
fn concurrent_advances_for_one_user_never_skip_a_round() {
    let state = state_with(catalog(64), 1, StubGenerator::answering("TRUE"), AppConfig::default());
    state.game().status("alice").unwrap();

    let rounds: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| state.game().next_round("alice").unwrap().current_round))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut sorted = rounds.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (2..=17).collect::<Vec<_>>());
    assert_eq!(state.game().status("alice").unwrap().current_round, 17);
}
