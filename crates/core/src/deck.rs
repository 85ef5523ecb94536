//! Deck module - paired tiles and the factory that shuffles them

use crate::rng::RandomSource;
use crate::types::{Symbol, TileId, DECK_SIZE, PAIR_COUNT};

/// One face-down/face-up card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub symbol: Symbol,
    pub revealed: bool,
    /// Once set, never cleared for the lifetime of the deck.
    pub resolved: bool,
}

impl Tile {
    pub fn new(id: TileId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            revealed: false,
            resolved: false,
        }
    }

    /// Whether the tile may still be picked
    pub fn is_pickable(&self) -> bool {
        !self.revealed && !self.resolved
    }
}

/// Ordered board of tiles, each symbol appearing exactly twice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    tiles: Vec<Tile>,
}

impl Deck {
    /// Lay out tiles in the given order, numbering ids by position
    ///
    /// # Panics
    ///
    /// Panics if the symbols are not made of exact pairs. That can only come from a bug in the
    /// caller, never from player input.
    pub fn from_symbols(symbols: &[Symbol]) -> Self {
        let tiles = symbols
            .iter()
            .enumerate()
            .map(|(i, &s)| Tile::new(TileId(i as u32), s))
            .collect();
        let deck = Self { tiles };
        deck.assert_paired();
        deck
    }

    fn assert_paired(&self) {
        assert!(
            !self.tiles.is_empty() && self.tiles.len() % 2 == 0,
            "deck must hold a positive even number of tiles, got {}",
            self.tiles.len()
        );
        for tile in &self.tiles {
            let count = self.tiles.iter().filter(|t| t.symbol == tile.symbol).count();
            assert_eq!(count, 2, "symbol {:?} appears {} times", tile.symbol, count);
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.tiles.len() / 2
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, position: usize) -> Option<&Tile> {
        self.tiles.get(position)
    }

    pub(crate) fn get_mut(&mut self, position: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(position)
    }

    /// Board position of the tile with the given id
    pub fn position_of(&self, id: TileId) -> Option<usize> {
        self.tiles.iter().position(|t| t.id == id)
    }

    /// Positions that are neither revealed nor resolved
    pub fn pickable_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_pickable())
            .map(|(i, _)| i)
    }

    pub fn resolved_pairs(&self) -> usize {
        self.tiles.iter().filter(|t| t.resolved).count() / 2
    }

    pub fn all_resolved(&self) -> bool {
        self.tiles.iter().all(|t| t.resolved)
    }
}

/// Builds a fresh shuffled board for every new game
#[derive(Debug, Clone, Copy, Default)]
pub struct DeckFactory;

impl DeckFactory {
    /// Take the first [`PAIR_COUNT`] symbols, duplicate them and shuffle
    ///
    /// Ids are assigned before the shuffle, so they are unique but carry no positional hint.
    pub fn build<R: RandomSource>(&self, rng: &mut R) -> Deck {
        let mut tiles: Vec<Tile> = Symbol::board_set()
            .iter()
            .chain(Symbol::board_set().iter())
            .enumerate()
            .map(|(i, &s)| Tile::new(TileId(i as u32), s))
            .collect();
        rng.shuffle(&mut tiles);

        let deck = Deck { tiles };
        debug_assert_eq!(deck.len(), DECK_SIZE);
        debug_assert_eq!(deck.pair_count(), PAIR_COUNT);
        deck.assert_paired();
        deck
    }
}
