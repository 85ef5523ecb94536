//! Core match logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the memory game and nothing else. It performs no I/O and
//! never sleeps or reads a clock, making it:
//!
//! - **Deterministic**: the same seed deals the same board and drives the same AI choices
//! - **Testable**: time is injected through the [`Scheduler`] port
//! - **Portable**: any host (terminal, GUI, headless simulation) can drive it
//!
//! # Module Structure
//!
//! - [`deck`]: tiles, decks and the shuffling factory
//! - [`engine`]: the turn/reveal/resolve state machine shared by every mode
//! - [`memory`]: the AI's bounded recollection of seen tiles
//! - [`ai`]: the AI driver that plans a pair of picks per turn
//! - [`score`]: per-participant match counts, move counter and final results
//! - [`schedule`]: scheduler port and a deterministic manual implementation
//! - [`rng`]: seedable random source
//! - [`snapshot`]: owned read model for rendering
//!
//! # Game Rules
//!
//! - 16 tiles, 8 symbols, each symbol exactly twice
//! - A turn reveals two tiles; both stay visible for a short pause before being compared
//! - A match resolves the pair for good and the same actor plays again
//! - A miss turns both tiles back and passes the turn (in two-seat modes)
//! - The game completes when every pair is resolved; solo games can also run out of time
//!
//! # Example
//!
//! ```
//! use askeladd_core::{ManualScheduler, MatchConfig, MatchEngine, MatchEvent, Phase};
//!
//! let mut game = MatchEngine::new(MatchConfig::duel("Thorfinn", "Thorkell"), 12345, ManualScheduler::new());
//! game.start();
//!
//! let first = game.deck().tiles()[0].id;
//! let second = game.deck().tiles()[1].id;
//! assert!(game.pick(0, first));
//! assert!(game.pick(0, second));
//! assert_eq!(game.phase(), Phase::Resolving);
//!
//! // Let the visible pause elapse.
//! game.advance_ms(1000);
//! assert!(game
//!     .drain_events()
//!     .iter()
//!     .any(|e| matches!(e, MatchEvent::PairResolved { .. })));
//! ```

pub mod ai;
pub mod deck;
pub mod engine;
pub mod event;
pub mod memory;
pub mod rng;
pub mod schedule;
pub mod score;
pub mod snapshot;

pub use askeladd_types as types;

// Re-export commonly used types for convenience
pub use ai::{AiDriver, PickPlan, PlanSource};
pub use deck::{Deck, DeckFactory, Tile};
pub use engine::{MatchConfig, MatchEngine, Pacing, Phase, TurnPolicy};
pub use event::MatchEvent;
pub use memory::{AiMemory, MemoryEntry};
pub use rng::{RandomSource, SimpleRng};
pub use schedule::{CancelHandle, ManualScheduler, Scheduler, TimerKind, TimerToken};
pub use score::{GameResult, Participant, ScoreKeeper};
pub use snapshot::{BoardSnapshot, TileView};
