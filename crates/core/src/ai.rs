//! AI driver - chooses the computer opponent's two picks each turn

use crate::deck::Deck;
use crate::memory::AiMemory;
use crate::rng::RandomSource;
use crate::types::{ActorIndex, Difficulty, Symbol, AI_THINK_BASE_MS, AI_THINK_JITTER_MS};

/// How a planned pair was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// Both positions came from memory and are guaranteed to match
    Memory,
    /// Uniform random guess among pickable tiles
    Random,
}

/// Two positions the AI intends to flip this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickPlan {
    pub first: usize,
    pub second: usize,
    pub source: PlanSource,
}

/// AI participant attached to a match engine
#[derive(Debug, Clone)]
pub struct AiDriver {
    actor: ActorIndex,
    difficulty: Difficulty,
    memory: AiMemory,
    /// Second pick held between the two scheduled reveals
    pending_second: Option<usize>,
}

impl AiDriver {
    pub fn new(actor: ActorIndex, difficulty: Difficulty) -> Self {
        Self {
            actor,
            difficulty,
            memory: AiMemory::new(difficulty),
            pending_second: None,
        }
    }

    pub fn actor(&self) -> ActorIndex {
        self.actor
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn memory(&self) -> &AiMemory {
        &self.memory
    }

    /// Forget everything; called when a new game starts
    pub fn reset(&mut self) {
        self.memory.clear();
        self.pending_second = None;
    }

    /// A tile was turned face-up by either actor
    pub fn observe(&mut self, symbol: Symbol, position: usize) {
        self.memory.observe(symbol, position);
    }

    /// A pair was resolved by either actor
    pub fn forget_symbol(&mut self, symbol: Symbol) {
        self.memory.purge(symbol);
    }

    /// Thinking delay before the first pick, in milliseconds
    pub fn think_delay_ms<R: RandomSource>(&self, rng: &mut R) -> u32 {
        AI_THINK_BASE_MS + rng.next_range(AI_THINK_JITTER_MS + 1)
    }

    /// Decide both picks for this turn
    ///
    /// Novice never consults memory. Other tiers take the first remembered pair whose tiles are
    /// both still pickable, and otherwise guess two distinct pickable tiles uniformly.
    pub fn plan<R: RandomSource>(&self, deck: &Deck, rng: &mut R) -> Option<PickPlan> {
        if self.difficulty != Difficulty::Novice {
            if let Some((first, second)) = self.memory.known_pair(deck) {
                return Some(PickPlan {
                    first,
                    second,
                    source: PlanSource::Memory,
                });
            }
        }

        let mut available: Vec<usize> = deck.pickable_positions().collect();
        if available.len() < 2 {
            return None;
        }
        // Partial Fisher-Yates: only the first two slots need to be drawn.
        for i in 0..2 {
            let j = i + rng.next_range((available.len() - i) as u32) as usize;
            available.swap(i, j);
        }
        Some(PickPlan {
            first: available[0],
            second: available[1],
            source: PlanSource::Random,
        })
    }

    pub(crate) fn hold_second(&mut self, position: usize) {
        self.pending_second = Some(position);
    }

    pub(crate) fn take_second(&mut self) -> Option<usize> {
        self.pending_second.take()
    }
}
