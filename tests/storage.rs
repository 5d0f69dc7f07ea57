//! Integration tests for snapshot persistence.

use chrono::{Duration, Utc};
use tictactoe_match_web::{
    complete_round, place_mark, start_match, GameState, PersistedSession, Snapshot,
};
use uuid::Uuid;

fn temp_path() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tictactoe-snapshot-{}.json", Uuid::new_v4()))
}

fn session_with_match() -> PersistedSession {
    let mut game = GameState::new();
    start_match(&mut game, "Ada", "Lin", 5);
    let m = game.current_match_mut().unwrap();
    let (a, b) = (m.player_1.id, m.player_2.id);
    place_mark(m, 0, 0, a);
    place_mark(m, 1, 1, b);
    complete_round(m, Some(b), false);
    PersistedSession {
        game,
        last_activity: Utc::now(),
    }
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut snapshot = Snapshot::default();
    snapshot.root.insert(Uuid::new_v4(), session_with_match());

    let bytes = snapshot.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(value.get("root").is_some());

    assert_eq!(Snapshot::from_json(&bytes).unwrap(), snapshot);
}

#[test]
fn save_then_load_restores_sessions() {
    let path = temp_path();
    let mut snapshot = Snapshot::default();
    let sid = Uuid::new_v4();
    snapshot.root.insert(sid, session_with_match());

    snapshot.save(&path).unwrap();
    let loaded = Snapshot::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, snapshot);
    let m = loaded.root[&sid].game.current_match().unwrap();
    assert_eq!(m.player_2.wins, 1);
}

#[test]
fn missing_file_loads_empty() {
    let loaded = Snapshot::load(temp_path()).unwrap();
    assert!(loaded.root.is_empty());
}

#[test]
fn corrupt_file_is_an_error() {
    let path = temp_path();
    std::fs::write(&path, b"{ not json").unwrap();
    let result = Snapshot::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(tictactoe_match_web::StoreError::Json(_))));
}

#[test]
fn prune_drops_only_inactive_sessions() {
    let mut snapshot = Snapshot::default();
    let fresh = Uuid::new_v4();
    let stale = Uuid::new_v4();
    snapshot.root.insert(fresh, session_with_match());
    let mut old = session_with_match();
    old.last_activity = Utc::now() - Duration::hours(13);
    snapshot.root.insert(stale, old);

    let removed = snapshot.prune_inactive(Utc::now() - Duration::hours(12));

    assert_eq!(removed, 1);
    assert!(snapshot.root.contains_key(&fresh));
    assert!(!snapshot.root.contains_key(&stale));
}
