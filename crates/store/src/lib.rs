//! Persistence for the match engine: a string-keyed JSON port, the settings record and the
//! single best-score ledger.
//!
//! The engine itself never touches storage. Hosts open a [`KeyValueStore`] backend (in-memory
//! for tests, [`JsonFileStore`] on disk) and hand it to [`SettingsStore`] and
//! [`HighScoreLedger`].
//!
//! # Records
//!
//! | Key | Shape | Default |
//! |-----|-------|---------|
//! | `askeladd-settings` | `{"timeLimit": 10}` | `timeLimit = 10` when missing or unreadable |
//! | `askeladd-high-score` | `{"score", "moves", "time"?, "mode", "playerName", "difficulty"?}` | absent until a game completes |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use askeladd_store::{HighScoreLedger, HighScoreRecord, MemoryStore, RecordMode};
//!
//! let ledger = HighScoreLedger::open(Arc::new(MemoryStore::new()));
//! let record = HighScoreRecord {
//!     score: 8,
//!     moves: 12,
//!     time: Some(40),
//!     mode: RecordMode::Single,
//!     player_name: "Askeladd".to_string(),
//!     difficulty: None,
//! };
//! assert!(ledger.update(record.clone()).unwrap());
//! assert_eq!(ledger.current(), Some(record));
//! ```

pub mod kv;
pub mod ledger;
pub mod settings;

pub use askeladd_core as core;
pub use askeladd_types as types;

pub use kv::{load_json, save_json, JsonFileStore, KeyValueStore, MemoryStore};
pub use ledger::{outranks, HighScoreLedger, HighScoreRecord, RecordMode, HIGH_SCORE_KEY};
pub use settings::{Settings, SettingsStore, SETTINGS_KEY};
