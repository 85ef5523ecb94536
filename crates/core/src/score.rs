//! Scoring module - per-participant match counts and the shared move counter
//!
//! [`ScoreKeeper`] is driven purely by [`MatchEvent`]s: a second reveal counts one move, a
//! matched pair credits the acting participant.

use crate::event::MatchEvent;
use crate::types::{ActorIndex, Difficulty, GameMode};

/// Someone taking part in a game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant {
    pub id: ActorIndex,
    pub display_name: String,
    pub matches_won: u32,
}

impl Participant {
    pub fn new(id: ActorIndex, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            matches_won: 0,
        }
    }
}

/// Final outcome of a completed game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Match count of the leading participant
    pub total_matches: u32,
    pub total_moves: u32,
    /// Seconds played, for timed games only
    pub elapsed_seconds: Option<u32>,
    pub mode: GameMode,
    /// `None` when the lead is shared (a draw)
    pub winner_name: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Every participant's final count, in seating order
    pub standings: Vec<Participant>,
}

impl GameResult {
    pub fn is_draw(&self) -> bool {
        self.winner_name.is_none()
    }

    /// Name credited for the result; a draw credits the first participant holding the top count
    pub fn credited_name(&self) -> &str {
        if let Some(name) = &self.winner_name {
            return name;
        }
        self.standings
            .iter()
            .find(|p| p.matches_won == self.total_matches)
            .map(|p| p.display_name.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ScoreKeeper {
    participants: Vec<Participant>,
    moves: u32,
}

impl ScoreKeeper {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            moves: 0,
        }
    }

    /// Update counters from an engine event
    pub fn observe(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::TileRevealed {
                completes_move: true,
                ..
            } => {
                self.moves += 1;
            }
            MatchEvent::PairResolved {
                actor,
                matched: true,
                ..
            } => {
                if let Some(p) = self.participants.get_mut(*actor) {
                    p.matches_won += 1;
                }
            }
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        self.moves = 0;
        for p in &mut self.participants {
            p.matches_won = 0;
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matches_of(&self, actor: ActorIndex) -> u32 {
        self.participants
            .get(actor)
            .map(|p| p.matches_won)
            .unwrap_or(0)
    }

    /// Pairs resolved by anyone
    pub fn total_matches(&self) -> u32 {
        self.participants.iter().map(|p| p.matches_won).sum()
    }

    pub fn top_matches(&self) -> u32 {
        self.participants
            .iter()
            .map(|p| p.matches_won)
            .max()
            .unwrap_or(0)
    }

    /// The participant with the strictly greatest count, if there is one
    pub fn leader(&self) -> Option<ActorIndex> {
        let top = self.top_matches();
        let mut leaders = self
            .participants
            .iter()
            .enumerate()
            .filter(|(_, p)| p.matches_won == top);
        match (leaders.next(), leaders.next()) {
            (Some((i, _)), None) => Some(i),
            _ => None,
        }
    }

    pub fn result(
        &self,
        mode: GameMode,
        difficulty: Option<Difficulty>,
        elapsed_seconds: Option<u32>,
    ) -> GameResult {
        GameResult {
            total_matches: self.top_matches(),
            total_moves: self.moves,
            elapsed_seconds,
            mode,
            winner_name: self
                .leader()
                .map(|i| self.participants[i].display_name.clone()),
            difficulty,
            standings: self.participants.clone(),
        }
    }
}
