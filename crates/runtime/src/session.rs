//! Match session - the async loop that owns one engine.
//!
//! Pick intents and timer callbacks are funnelled through a single task, so the engine has
//! exactly one mutator and transitions apply in the order their triggers arrive.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::{BoardSnapshot, GameResult, MatchConfig, MatchEngine, MatchEvent, TimerToken};
use crate::scheduler::TokioScheduler;
use crate::store::HighScoreLedger;
use crate::types::{ActorIndex, TileId};

/// Requests a host can send to a running session
#[derive(Debug)]
pub enum Intent {
    Pick { actor: ActorIndex, tile: TileId },
    Restart,
    Snapshot(oneshot::Sender<BoardSnapshot>),
    Shutdown,
}

/// Cloneable front door to a running [`MatchSession`]
#[derive(Clone)]
pub struct SessionHandle {
    intents: mpsc::Sender<Intent>,
    events: broadcast::Sender<MatchEvent>,
}

impl SessionHandle {
    pub async fn pick(&self, actor: ActorIndex, tile: TileId) -> Result<()> {
        self.send(Intent::Pick { actor, tile }).await
    }

    pub async fn restart(&self) -> Result<()> {
        self.send(Intent::Restart).await
    }

    pub async fn snapshot(&self) -> Result<BoardSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Intent::Snapshot(tx)).await?;
        Ok(rx.await?)
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.send(Intent::Shutdown).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.events.subscribe()
    }

    async fn send(&self, intent: Intent) -> Result<()> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| anyhow::anyhow!("match session has stopped"))
    }
}

pub struct MatchSession {
    engine: MatchEngine<TokioScheduler>,
    timers: mpsc::UnboundedReceiver<TimerToken>,
    intents: mpsc::Receiver<Intent>,
    events: broadcast::Sender<MatchEvent>,
    ledger: Option<Arc<HighScoreLedger>>,
}

impl MatchSession {
    /// Build a session; nothing is scheduled until [`MatchSession::run`] starts the game
    pub fn new(
        config: MatchConfig,
        seed: u32,
        ledger: Option<Arc<HighScoreLedger>>,
    ) -> (Self, SessionHandle) {
        let (scheduler, timers) = TokioScheduler::new();
        let (intent_tx, intents) = mpsc::channel(32);
        let (events, _) = broadcast::channel(256);

        let session = Self {
            engine: MatchEngine::new(config, seed, scheduler),
            timers,
            intents,
            events: events.clone(),
            ledger,
        };
        let handle = SessionHandle {
            intents: intent_tx,
            events,
        };
        (session, handle)
    }

    /// Start the game and serve intents until shut down or every handle is dropped
    pub async fn run(mut self) {
        self.engine.start();
        self.flush().await;

        loop {
            tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(Intent::Pick { actor, tile }) => {
                        self.engine.pick(actor, tile);
                    }
                    Some(Intent::Restart) => self.engine.restart(),
                    Some(Intent::Snapshot(reply)) => {
                        let _ = reply.send(self.engine.snapshot());
                    }
                    Some(Intent::Shutdown) | None => break,
                },
                Some(token) = self.timers.recv() => {
                    self.engine.fire(token);
                }
            }
            self.flush().await;
        }
        log::debug!("[SESSION] stopped at generation {}", self.engine.generation());
    }

    /// Spawn [`MatchSession::run`] on the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn flush(&mut self) {
        for event in self.engine.drain_events() {
            if let MatchEvent::GameComplete(result) = &event {
                if let Some(ledger) = &self.ledger {
                    record_result(ledger.clone(), result.clone()).await;
                }
            }
            // No subscribers is fine; the host may only poll snapshots.
            let _ = self.events.send(event);
        }
    }
}

/// Offer a finished game to the ledger; the store may touch disk, so it runs on the blocking pool
async fn record_result(ledger: Arc<HighScoreLedger>, result: GameResult) {
    match tokio::task::spawn_blocking(move || ledger.submit(&result)).await {
        Ok(Ok(true)) => log::info!("[SESSION] new high score recorded"),
        Ok(Ok(false)) => {}
        Ok(Err(e)) => log::error!("[SESSION] could not record result: {:#}", e),
        Err(e) => log::error!("[SESSION] ledger task failed: {}", e),
    }
}

/// Periodically re-read the stored record so every view converges even without notifications
pub fn spawn_ledger_refresh(ledger: Arc<HighScoreLedger>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            ledger.reload();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeckFactory, SimpleRng};
    use crate::store::{
        save_json, HighScoreRecord, JsonFileStore, KeyValueStore, MemoryStore, RecordMode,
        HIGH_SCORE_KEY,
    };
    use crate::types::{Difficulty, Symbol};

    async fn next_matching(
        rx: &mut broadcast::Receiver<MatchEvent>,
        pred: impl Fn(&MatchEvent) -> bool,
    ) -> MatchEvent {
        loop {
            let ev = tokio::time::timeout(Duration::from_secs(30), rx.recv())
                .await
                .expect("timeout waiting for event")
                .expect("event channel closed");
            if pred(&ev) {
                return ev;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_duel_records_high_score() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ledger = Arc::new(HighScoreLedger::open(store));
        let seed = 4242;
        let (session, handle) =
            MatchSession::new(MatchConfig::duel("Thorfinn", "Thorkell"), seed, Some(ledger.clone()));
        let mut rx = handle.subscribe();
        let task = session.spawn();

        // The session deals from the same seed, so the layout is known up front.
        let deck = DeckFactory.build(&mut SimpleRng::new(seed));
        let mut done = vec![false; deck.len()];
        for i in 0..deck.len() {
            if done[i] {
                continue;
            }
            let j = (i + 1..deck.len())
                .find(|&j| deck.tiles()[j].symbol == deck.tiles()[i].symbol)
                .unwrap();
            done[i] = true;
            done[j] = true;

            handle.pick(0, deck.tiles()[i].id).await.unwrap();
            handle.pick(0, deck.tiles()[j].id).await.unwrap();
            let ev = next_matching(&mut rx, |e| matches!(e, MatchEvent::PairResolved { .. })).await;
            assert!(matches!(ev, MatchEvent::PairResolved { matched: true, actor: 0, .. }));
        }

        let ev = next_matching(&mut rx, |e| matches!(e, MatchEvent::GameComplete(_))).await;
        let MatchEvent::GameComplete(result) = ev else {
            unreachable!()
        };
        assert_eq!(result.total_matches, 8);
        assert_eq!(result.total_moves, 8);
        assert_eq!(result.winner_name.as_deref(), Some("Thorfinn"));

        let best = ledger.current().unwrap();
        assert_eq!(best.score, 8);
        assert_eq!(best.player_name, "Thorfinn");

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_game_written_to_disk_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Arc::new(HighScoreLedger::open(Arc::new(JsonFileStore::new(dir.path()))));
        let seed = 77;
        let (session, handle) =
            MatchSession::new(MatchConfig::untimed_solo("Askeladd"), seed, Some(ledger.clone()));
        let mut rx = handle.subscribe();
        session.spawn();

        let deck = DeckFactory.build(&mut SimpleRng::new(seed));
        for symbol in Symbol::board_set() {
            let mut pair = deck.tiles().iter().filter(|t| t.symbol == *symbol);
            for tile in [pair.next().unwrap(), pair.next().unwrap()] {
                handle.pick(0, tile.id).await.unwrap();
            }
            next_matching(&mut rx, |e| matches!(e, MatchEvent::PairResolved { .. })).await;
        }
        next_matching(&mut rx, |e| matches!(e, MatchEvent::GameComplete(_))).await;

        let reopened = HighScoreLedger::open(Arc::new(JsonFileStore::new(dir.path())));
        let best = reopened.current().unwrap();
        assert_eq!((best.score, best.moves), (8, 8));
        assert_eq!(best.mode, RecordMode::Single);
        assert_eq!(ledger.current(), Some(best));
    }

    #[tokio::test(start_paused = true)]
    async fn test_solo_countdown_expires() {
        let (session, handle) = MatchSession::new(MatchConfig::solo("Askeladd", 2), 1, None);
        let mut rx = handle.subscribe();
        session.spawn();

        let ev = next_matching(&mut rx, |e| matches!(e, MatchEvent::ClockTick { .. })).await;
        assert_eq!(ev, MatchEvent::ClockTick { remaining_secs: 1 });
        next_matching(&mut rx, |e| matches!(e, MatchEvent::TimeExpired)).await;

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.remaining_secs, Some(0));
        assert!(!snap.playable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ai_takes_its_turn_after_a_miss() {
        let seed = 99;
        let (session, handle) =
            MatchSession::new(MatchConfig::versus_ai("Askeladd", Difficulty::Novice), seed, None);
        let mut rx = handle.subscribe();
        session.spawn();

        let deck = DeckFactory.build(&mut SimpleRng::new(seed));
        let j = (1..deck.len())
            .find(|&j| deck.tiles()[j].symbol != deck.tiles()[0].symbol)
            .unwrap();
        handle.pick(0, deck.tiles()[0].id).await.unwrap();
        handle.pick(0, deck.tiles()[j].id).await.unwrap();

        next_matching(&mut rx, |e| *e == MatchEvent::TurnChanged { actor: 1 }).await;
        let ev = next_matching(&mut rx, |e| matches!(e, MatchEvent::TileRevealed { .. })).await;
        assert!(matches!(ev, MatchEvent::TileRevealed { actor: 1, completes_move: false, .. }));

        // Human picks during the AI's turn are ignored.
        handle.pick(0, deck.tiles()[0].id).await.unwrap();
        let ev = next_matching(&mut rx, |e| matches!(e, MatchEvent::TileRevealed { .. })).await;
        assert!(matches!(ev, MatchEvent::TileRevealed { actor: 1, completes_move: true, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_task_notices_external_writes() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ledger = Arc::new(HighScoreLedger::open(store.clone()));
        let mut rx = ledger.subscribe();
        let task = spawn_ledger_refresh(ledger.clone(), Duration::from_secs(1));

        let record = HighScoreRecord {
            score: 6,
            moves: 9,
            time: None,
            mode: RecordMode::Multiplayer,
            player_name: "Bjorn".to_string(),
            difficulty: None,
        };
        save_json(&*store, HIGH_SCORE_KEY, &record).unwrap();

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("refresh did not notice the write")
            .unwrap();
        assert_eq!(ledger.current().map(|r| r.score), Some(6));
        task.abort();
    }
}
