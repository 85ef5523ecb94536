use crate::deck::Tile;
use crate::engine::Phase;
use crate::score::Participant;
use crate::types::{ActorIndex, Symbol, TileId};

/// How a tile looks to an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileView {
    pub id: TileId,
    /// Visible symbol; `None` while face-down
    pub face: Option<Symbol>,
    pub revealed: bool,
    pub resolved: bool,
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        Self {
            id: tile.id,
            face: (tile.revealed || tile.resolved).then_some(tile.symbol),
            revealed: tile.revealed,
            resolved: tile.resolved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub tiles: Vec<TileView>,
    pub phase: Phase,
    pub actor: ActorIndex,
    pub participants: Vec<Participant>,
    pub moves: u32,
    pub remaining_secs: Option<u32>,
    pub generation: u32,
}

impl BoardSnapshot {
    pub fn playable(&self) -> bool {
        self.phase.accepts_picks()
    }

    pub fn face_down_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.face.is_none()).count()
    }
}
