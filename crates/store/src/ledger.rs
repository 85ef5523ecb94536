//! High-score ledger - the single best result ever recorded
//!
//! Ordering: more matches wins; with equal matches, fewer moves wins. Elapsed time is shown to
//! players but never compared. The current record lives in a `watch` channel, so readers always
//! get a coherent clone and subscribers are woken once per replacement.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::core::GameResult;
use crate::kv::{load_json, save_json, KeyValueStore};
use crate::types::GameMode;

pub const HIGH_SCORE_KEY: &str = "askeladd-high-score";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordMode {
    Single,
    Multiplayer,
    Ai,
}

impl From<GameMode> for RecordMode {
    fn from(mode: GameMode) -> Self {
        match mode {
            GameMode::Solo => RecordMode::Single,
            GameMode::Duel => RecordMode::Multiplayer,
            GameMode::VersusAi => RecordMode::Ai,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreRecord {
    pub score: u32,
    pub moves: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    pub mode: RecordMode,
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl From<&GameResult> for HighScoreRecord {
    fn from(result: &GameResult) -> Self {
        Self {
            score: result.total_matches,
            moves: result.total_moves,
            time: result.elapsed_seconds,
            mode: result.mode.into(),
            player_name: result.credited_name().to_string(),
            difficulty: result.difficulty.map(|d| d.as_str().to_string()),
        }
    }
}

/// Whether `candidate` should replace `best`
pub fn outranks(candidate: &HighScoreRecord, best: Option<&HighScoreRecord>) -> bool {
    match best {
        None => true,
        Some(best) => {
            candidate.score > best.score
                || (candidate.score == best.score && candidate.moves < best.moves)
        }
    }
}

pub struct HighScoreLedger {
    store: Arc<dyn KeyValueStore>,
    current: watch::Sender<Option<HighScoreRecord>>,
}

impl HighScoreLedger {
    /// Load the stored record (a malformed blob counts as no record)
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let initial = load_json::<HighScoreRecord>(&*store, HIGH_SCORE_KEY);
        let (current, _) = watch::channel(initial);
        Self { store, current }
    }

    /// Coherent copy of the current best
    pub fn current(&self) -> Option<HighScoreRecord> {
        self.current.borrow().clone()
    }

    /// Receiver woken whenever the record changes
    pub fn subscribe(&self) -> watch::Receiver<Option<HighScoreRecord>> {
        self.current.subscribe()
    }

    /// Offer a result; returns whether it became the new record
    ///
    /// The candidate is compared against the stored record, not the cached one, so a better
    /// record written by another ledger is never overwritten. A failed write leaves the record
    /// untouched and is returned as `Err`.
    pub fn update(&self, candidate: HighScoreRecord) -> Result<bool> {
        let mut outcome = Ok(false);
        self.current.send_if_modified(|best| {
            let stored = load_json::<HighScoreRecord>(&*self.store, HIGH_SCORE_KEY);
            let refreshed = *best != stored;
            if refreshed {
                log::debug!("[LEDGER] adopting record written elsewhere");
                *best = stored;
            }
            if !outranks(&candidate, best.as_ref()) {
                return refreshed;
            }
            match save_json(&*self.store, HIGH_SCORE_KEY, &candidate) {
                Ok(()) => {
                    log::info!(
                        "[LEDGER] new record: {} matches in {} moves by {}",
                        candidate.score,
                        candidate.moves,
                        candidate.player_name
                    );
                    *best = Some(candidate.clone());
                    outcome = Ok(true);
                    true
                }
                Err(e) => {
                    log::error!("[LEDGER] failed to persist record: {:#}", e);
                    outcome = Err(e);
                    refreshed
                }
            }
        });
        outcome
    }

    pub fn submit(&self, result: &GameResult) -> Result<bool> {
        self.update(HighScoreRecord::from(result))
    }

    /// Re-read the store, notifying subscribers if another writer changed it
    pub fn reload(&self) -> Option<HighScoreRecord> {
        let fresh = load_json::<HighScoreRecord>(&*self.store, HIGH_SCORE_KEY);
        self.current.send_if_modified(|cur| {
            if *cur == fresh {
                return false;
            }
            *cur = fresh.clone();
            true
        });
        fresh
    }
}
