//! Events emitted by the match engine, in the order transitions were applied.

use crate::score::GameResult;
use crate::types::{ActorIndex, Symbol, TileId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// A new game (or restarted game) began
    GameStarted { generation: u32 },
    /// A tile was turned face-up
    TileRevealed {
        actor: ActorIndex,
        tile: TileId,
        position: usize,
        symbol: Symbol,
        /// True for the second pick of a turn, which counts as one move
        completes_move: bool,
    },
    /// The two revealed tiles were compared
    PairResolved {
        actor: ActorIndex,
        first: TileId,
        second: TileId,
        matched: bool,
    },
    /// Pick entitlement moved to another participant
    TurnChanged { actor: ActorIndex },
    /// Solo countdown advanced
    ClockTick { remaining_secs: u32 },
    /// Solo countdown ran out before the board was cleared
    TimeExpired,
    /// Every pair is resolved; emitted exactly once per game
    GameComplete(GameResult),
}

impl MatchEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchEvent::GameComplete(_) | MatchEvent::TimeExpired)
    }
}
