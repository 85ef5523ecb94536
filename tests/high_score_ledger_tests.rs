//! High-score ledger tests - ordering rules, persistence across restarts and finished games

use std::sync::Arc;

use askeladd::core::{ManualScheduler, MatchConfig, MatchEngine, Phase};
use askeladd::store::{
    HighScoreLedger, HighScoreRecord, JsonFileStore, KeyValueStore, MemoryStore, RecordMode,
    SettingsStore, HIGH_SCORE_KEY, SETTINGS_KEY,
};
use askeladd::types::{DEFAULT_TIME_LIMIT_SECS, TIME_LIMIT_CHOICES};

fn record(score: u32, moves: u32, name: &str) -> HighScoreRecord {
    HighScoreRecord {
        score,
        moves,
        time: None,
        mode: RecordMode::Single,
        player_name: name.to_string(),
        difficulty: None,
    }
}

/// Play a solo game to the end, missing `misses` times before clearing the board
fn finish_solo(name: &str, seed: u32, misses: usize) -> MatchEngine<ManualScheduler> {
    let mut engine = MatchEngine::new(MatchConfig::solo(name, 120), seed, ManualScheduler::new());
    engine.start();

    let first_symbol = engine.deck().tiles()[0].symbol;
    let stranger = (1..engine.deck().len())
        .find(|&p| engine.deck().tiles()[p].symbol != first_symbol)
        .unwrap();
    for _ in 0..misses {
        engine.pick(0, engine.deck().tiles()[0].id);
        engine.pick(0, engine.deck().tiles()[stranger].id);
        engine.advance_ms(1000);
    }

    while engine.phase() != Phase::Complete {
        let first = engine.deck().pickable_positions().next().unwrap();
        let symbol = engine.deck().tiles()[first].symbol;
        let second = engine
            .deck()
            .pickable_positions()
            .find(|&p| p != first && engine.deck().tiles()[p].symbol == symbol)
            .unwrap();
        engine.pick(0, engine.deck().tiles()[first].id);
        engine.pick(0, engine.deck().tiles()[second].id);
        engine.advance_ms(1000);
    }
    engine
}

#[test]
fn test_ordering_sequence() {
    let ledger = HighScoreLedger::open(Arc::new(MemoryStore::new()));
    assert_eq!(ledger.current(), None);

    assert!(ledger.update(record(5, 12, "Thorkell")).unwrap());
    assert!(ledger.update(record(5, 10, "Bjorn")).unwrap());
    assert!(!ledger.update(record(5, 10, "Thorfinn")).unwrap());
    assert!(!ledger.update(record(4, 1, "Thorfinn")).unwrap());
    assert!(ledger.update(record(6, 30, "Canute")).unwrap());

    assert_eq!(ledger.current(), Some(record(6, 30, "Canute")));
}

#[test]
fn test_record_survives_reopen_on_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    {
        let ledger = HighScoreLedger::open(Arc::new(JsonFileStore::new(dir.path())));
        ledger.update(record(7, 15, "Askeladd"))?;
    }

    let store = JsonFileStore::new(dir.path());
    let raw = store.get(HIGH_SCORE_KEY)?.unwrap_or_default();
    let v: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(v["playerName"], "Askeladd");
    assert_eq!(v["mode"], "single");
    assert!(v.get("time").is_none());

    let reopened = HighScoreLedger::open(Arc::new(store));
    assert_eq!(reopened.current(), Some(record(7, 15, "Askeladd")));
    Ok(())
}

#[test]
fn test_two_ledgers_converge_through_reload() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let a = HighScoreLedger::open(store.clone());
    let b = HighScoreLedger::open(store);
    let rx = b.subscribe();

    a.update(record(3, 9, "Bjorn")).unwrap();
    assert_eq!(b.current(), None);

    b.reload();
    assert!(rx.has_changed().unwrap());
    assert_eq!(b.current(), a.current());
}

#[test]
fn test_worse_result_from_stale_ledger_keeps_stored_best() {
    let dir = tempfile::tempdir().unwrap();
    let a = HighScoreLedger::open(Arc::new(JsonFileStore::new(dir.path())));
    let b = HighScoreLedger::open(Arc::new(JsonFileStore::new(dir.path())));

    assert!(b.update(record(8, 5, "Canute")).unwrap());
    assert!(!a.update(record(3, 30, "Bjorn")).unwrap());

    let reopened = HighScoreLedger::open(Arc::new(JsonFileStore::new(dir.path())));
    assert_eq!(reopened.current(), Some(record(8, 5, "Canute")));
    assert_eq!(a.current(), Some(record(8, 5, "Canute")));

    // A genuinely better result still wins from either ledger.
    assert!(a.update(record(8, 4, "Bjorn")).unwrap());
    assert!(!b.update(record(8, 5, "Canute")).unwrap());
    assert_eq!(b.current().map(|r| r.player_name), Some("Bjorn".to_string()));
}

#[test]
fn test_finished_games_feed_the_ledger() {
    let ledger = HighScoreLedger::open(Arc::new(MemoryStore::new()));

    let sloppy = finish_solo("Thorkell", 11, 3);
    assert!(ledger.submit(sloppy.result().unwrap()).unwrap());
    let best = ledger.current().unwrap();
    assert_eq!((best.score, best.moves), (8, 11));
    assert_eq!(best.mode, RecordMode::Single);
    assert!(best.time.is_some());

    let clean = finish_solo("Thorfinn", 12, 0);
    assert!(ledger.submit(clean.result().unwrap()).unwrap());
    assert_eq!(ledger.current().unwrap().player_name, "Thorfinn");

    let worse = finish_solo("Bjorn", 13, 1);
    assert!(!ledger.submit(worse.result().unwrap()).unwrap());
    assert_eq!(ledger.current().unwrap().moves, 8);
}

#[test]
fn test_settings_default_and_update() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(dir.path()));
    let settings = SettingsStore::new(store.clone());
    assert_eq!(settings.load().time_limit, DEFAULT_TIME_LIMIT_SECS);

    let updated = settings.set_time_limit(TIME_LIMIT_CHOICES[2]).unwrap();
    assert_eq!(updated.time_limit, 60);
    assert_eq!(store.get(SETTINGS_KEY).unwrap().as_deref(), Some(r#"{"timeLimit":60}"#));

    store.set(SETTINGS_KEY, "not json").unwrap();
    assert_eq!(settings.load().time_limit, DEFAULT_TIME_LIMIT_SECS);
}
