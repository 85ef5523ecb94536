//! AI memory module - bounded recollection of tile positions
//!
//! The AI remembers `(symbol, position)` pairs it has seen face-up. How many it can hold is set
//! by the difficulty tier. When the capacity is exceeded the single oldest remembered position is
//! forgotten (global FIFO across all symbols), and a symbol with no positions left disappears.
//!
//! Resolved pairs are purged: they can never be picked again, so remembering them is useless.

use std::collections::VecDeque;

use crate::deck::Deck;
use crate::types::{Difficulty, Symbol};

/// What the AI remembers about one symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryEntry {
    pub symbol: Symbol,
    /// Known positions, oldest first (at most two)
    pub known_positions: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Recollection {
    symbol: Symbol,
    position: usize,
}

#[derive(Debug, Clone)]
pub struct AiMemory {
    capacity: usize,
    /// Remembered positions in insertion order
    recollections: VecDeque<Recollection>,
}

impl AiMemory {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_capacity(difficulty.memory_capacity())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            recollections: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total remembered positions across all symbols
    pub fn len(&self) -> usize {
        self.recollections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recollections.is_empty()
    }

    /// Record a face-up tile
    ///
    /// Seeing a position that is already remembered does not refresh its age. Returns the
    /// position that was forgotten to make room, if any.
    pub fn observe(&mut self, symbol: Symbol, position: usize) -> Option<usize> {
        if self.capacity == 0 {
            return None;
        }
        if self.recollections.iter().any(|r| r.position == position) {
            return None;
        }

        self.recollections.push_back(Recollection { symbol, position });

        if self.recollections.len() > self.capacity {
            let evicted = self.recollections.pop_front()?;
            log::trace!(
                "[AI] forgot {:?} at position {}",
                evicted.symbol,
                evicted.position
            );
            return Some(evicted.position);
        }
        None
    }

    /// Drop every recollection of a resolved symbol
    pub fn purge(&mut self, symbol: Symbol) {
        self.recollections.retain(|r| r.symbol != symbol);
    }

    pub fn clear(&mut self) {
        self.recollections.clear();
    }

    /// Whether the AI currently remembers this position
    pub fn recalls(&self, position: usize) -> bool {
        self.recollections.iter().any(|r| r.position == position)
    }

    /// Known positions for a symbol, oldest first
    pub fn positions_of(&self, symbol: Symbol) -> Vec<usize> {
        self.recollections
            .iter()
            .filter(|r| r.symbol == symbol)
            .map(|r| r.position)
            .collect()
    }

    /// Grouped view, one entry per remembered symbol in order of first sighting
    pub fn entries(&self) -> Vec<MemoryEntry> {
        let mut out: Vec<MemoryEntry> = Vec::new();
        for r in &self.recollections {
            match out.iter_mut().find(|e| e.symbol == r.symbol) {
                Some(entry) => entry.known_positions.push(r.position),
                None => out.push(MemoryEntry {
                    symbol: r.symbol,
                    known_positions: vec![r.position],
                }),
            }
        }
        out
    }

    /// First symbol whose two remembered positions are both still pickable
    pub fn known_pair(&self, deck: &Deck) -> Option<(usize, usize)> {
        self.entries().into_iter().find_map(|entry| {
            let mut available = entry
                .known_positions
                .iter()
                .copied()
                .filter(|&p| deck.get(p).map(|t| t.is_pickable()).unwrap_or(false));
            match (available.next(), available.next()) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_novice_never_remembers() {
        let mut memory = AiMemory::new(Difficulty::Novice);
        for (i, s) in Symbol::board_set().iter().enumerate() {
            memory.observe(*s, i);
        }
        assert_eq!(memory.len(), 0);
        assert!(memory.entries().is_empty());
    }

    #[test]
    fn test_adept_evicts_oldest_position() {
        let mut memory = AiMemory::new(Difficulty::Adept);
        let syms = Symbol::board_set();
        for i in 0..6 {
            assert_eq!(memory.observe(syms[i], i), None);
        }
        assert_eq!(memory.len(), 6);

        assert_eq!(memory.observe(syms[6], 6), Some(0));
        assert_eq!(memory.len(), 6);
        assert!(!memory.recalls(0));
        assert!(memory.recalls(6));
        // The emptied bucket disappears entirely.
        assert!(memory.entries().iter().all(|e| e.symbol != syms[0]));
    }

    #[test]
    fn test_eviction_is_global_fifo_not_per_bucket() {
        let mut memory = AiMemory::with_capacity(3);
        memory.observe(Symbol::Wolf, 0);
        memory.observe(Symbol::Bear, 1);
        memory.observe(Symbol::Wolf, 2);
        // Wolf's bucket is first in iteration order, but position 0 is also the oldest overall.
        assert_eq!(memory.observe(Symbol::Sun, 3), Some(0));
        assert_eq!(memory.positions_of(Symbol::Wolf), vec![2]);

        // Now the oldest is Bear@1 even though Wolf's bucket was seen first.
        assert_eq!(memory.observe(Symbol::Moon, 4), Some(1));
        assert!(memory.positions_of(Symbol::Bear).is_empty());
        assert_eq!(memory.positions_of(Symbol::Wolf), vec![2]);
    }

    #[test]
    fn test_reobserving_does_not_duplicate() {
        let mut memory = AiMemory::new(Difficulty::Master);
        memory.observe(Symbol::Axe, 3);
        memory.observe(Symbol::Axe, 3);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_master_retains_full_board() {
        let mut memory = AiMemory::new(Difficulty::Master);
        let deck = Deck::from_symbols(
            &Symbol::board_set()
                .iter()
                .chain(Symbol::board_set())
                .copied()
                .collect::<Vec<_>>(),
        );
        for (i, t) in deck.tiles().iter().enumerate() {
            assert_eq!(memory.observe(t.symbol, i), None);
        }
        assert_eq!(memory.len(), 16);
        for i in 0..16 {
            assert!(memory.recalls(i));
        }
    }

    #[test]
    fn test_purge_removes_symbol() {
        let mut memory = AiMemory::new(Difficulty::Master);
        memory.observe(Symbol::Fire, 0);
        memory.observe(Symbol::Frost, 1);
        memory.observe(Symbol::Fire, 2);
        memory.purge(Symbol::Fire);
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.entries()[0].symbol, Symbol::Frost);
    }

    #[test]
    fn test_known_pair_skips_unavailable_tiles() {
        let mut deck = Deck::from_symbols(&[Symbol::Axe, Symbol::Sun, Symbol::Axe, Symbol::Sun]);
        let mut memory = AiMemory::new(Difficulty::Master);
        memory.observe(Symbol::Axe, 0);
        memory.observe(Symbol::Sun, 1);
        memory.observe(Symbol::Axe, 2);
        memory.observe(Symbol::Sun, 3);

        assert_eq!(memory.known_pair(&deck), Some((0, 2)));

        deck.get_mut(0).unwrap().revealed = true;
        assert_eq!(memory.known_pair(&deck), Some((1, 3)));
    }

    #[test]
    fn test_known_pair_needs_two_positions() {
        let deck = Deck::from_symbols(&[Symbol::Axe, Symbol::Sun, Symbol::Axe, Symbol::Sun]);
        let mut memory = AiMemory::new(Difficulty::Adept);
        memory.observe(Symbol::Axe, 0);
        memory.observe(Symbol::Sun, 3);
        assert_eq!(memory.known_pair(&deck), None);
    }
}
