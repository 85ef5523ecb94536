//! Shared vocabulary for the match engine.
//!
//! Everything in here is plain data with no dependencies, so the same types can be used by the
//! core state machine, the persistence layer and whatever host renders the board.
//!
//! # Board
//!
//! A game is played on a fixed board of [`DECK_SIZE`] tiles: the first [`PAIR_COUNT`] runes of
//! [`Symbol::ALPHABET`], each appearing exactly twice.
//!
//! # Pacing
//!
//! Timing values are in milliseconds and only affect presentation, never outcomes:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `RESOLVE_PAUSE_MS` | 1000 | Both tiles stay visible before a solo/duel pair resolves |
//! | `AI_RESOLVE_PAUSE_MS` | 1200 | Same pause in AI mode |
//! | `AI_THINK_BASE_MS` | 800 | Minimum thinking delay before the AI's first pick |
//! | `AI_THINK_JITTER_MS` | 400 | Uniform jitter added on top of the base delay |
//! | `AI_SECOND_PICK_MS` | 600 | Delay between the AI's first and second pick |
//! | `CLOCK_TICK_MS` | 1000 | Solo countdown granularity |
//!
//! # Examples
//!
//! ```
//! use askeladd_types::{Difficulty, GameMode, Symbol, DECK_SIZE, PAIR_COUNT};
//!
//! assert_eq!(Symbol::from_str("wolf"), Some(Symbol::Wolf));
//! assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Adept));
//! assert_eq!(GameMode::Duel.as_str(), "multiplayer");
//! assert_eq!(DECK_SIZE, PAIR_COUNT * 2);
//! ```

/// Number of distinct symbols in play
pub const PAIR_COUNT: usize = 8;

/// Number of tiles on the board
pub const DECK_SIZE: usize = PAIR_COUNT * 2;

/// Visible pause before a pair resolves (solo and duel)
pub const RESOLVE_PAUSE_MS: u32 = 1000;

/// Visible pause before a pair resolves in AI mode
pub const AI_RESOLVE_PAUSE_MS: u32 = 1200;

/// Minimum AI thinking time before its first pick
pub const AI_THINK_BASE_MS: u32 = 800;

/// Maximum random jitter added to the AI thinking time
pub const AI_THINK_JITTER_MS: u32 = 400;

/// Delay between the AI's first and second pick
pub const AI_SECOND_PICK_MS: u32 = 600;

/// Solo countdown tick
pub const CLOCK_TICK_MS: u32 = 1000;

/// Default solo time limit in seconds
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 10;

/// Time limits a host offers in its settings screen
pub const TIME_LIMIT_CHOICES: [u32; 4] = [10, 30, 60, 120];


/// Rune carved on a tile face
///
/// The alphabet is fixed; a board uses its first [`PAIR_COUNT`] entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Swords,
    Shield,
    Axe,
    Lightning,
    Fire,
    Frost,
    Wave,
    Mountain,
    Eagle,
    Wolf,
    Bear,
    Stag,
    Star,
    Moon,
    Sun,
    Gem,
}

impl Symbol {
    /// The full symbol alphabet, in canonical order
    pub const ALPHABET: [Symbol; 16] = [
        Symbol::Swords,
        Symbol::Shield,
        Symbol::Axe,
        Symbol::Lightning,
        Symbol::Fire,
        Symbol::Frost,
        Symbol::Wave,
        Symbol::Mountain,
        Symbol::Eagle,
        Symbol::Wolf,
        Symbol::Bear,
        Symbol::Stag,
        Symbol::Star,
        Symbol::Moon,
        Symbol::Sun,
        Symbol::Gem,
    ];

    /// Symbols used on a standard board
    pub fn board_set() -> &'static [Symbol] {
        &Self::ALPHABET[..PAIR_COUNT]
    }

    /// Parse a symbol from its name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use askeladd_types::Symbol;
    ///
    /// assert_eq!(Symbol::from_str("Axe"), Some(Symbol::Axe));
    /// assert_eq!(Symbol::from_str("dragon"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALPHABET
            .iter()
            .copied()
            .find(|sym| sym.as_str() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Swords => "swords",
            Symbol::Shield => "shield",
            Symbol::Axe => "axe",
            Symbol::Lightning => "lightning",
            Symbol::Fire => "fire",
            Symbol::Frost => "frost",
            Symbol::Wave => "wave",
            Symbol::Mountain => "mountain",
            Symbol::Eagle => "eagle",
            Symbol::Wolf => "wolf",
            Symbol::Bear => "bear",
            Symbol::Stag => "stag",
            Symbol::Star => "star",
            Symbol::Moon => "moon",
            Symbol::Sun => "sun",
            Symbol::Gem => "gem",
        }
    }

    /// Glyph a host draws on the tile face
    pub fn glyph(&self) -> &'static str {
        match self {
            Symbol::Swords => "\u{2694}\u{fe0f}",
            Symbol::Shield => "\u{1f6e1}\u{fe0f}",
            Symbol::Axe => "\u{1fa93}",
            Symbol::Lightning => "\u{26a1}",
            Symbol::Fire => "\u{1f525}",
            Symbol::Frost => "\u{2744}\u{fe0f}",
            Symbol::Wave => "\u{1f30a}",
            Symbol::Mountain => "\u{1f3d4}\u{fe0f}",
            Symbol::Eagle => "\u{1f985}",
            Symbol::Wolf => "\u{1f43a}",
            Symbol::Bear => "\u{1f43b}",
            Symbol::Stag => "\u{1f98c}",
            Symbol::Star => "\u{2b50}",
            Symbol::Moon => "\u{1f319}",
            Symbol::Sun => "\u{2600}\u{fe0f}",
            Symbol::Gem => "\u{1f48e}",
        }
    }
}

/// Stable identity of a tile within one deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Index of a participant in the engine's participant list
pub type ActorIndex = usize;

/// The three ways a match can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Timed single-player
    Solo,
    /// Local two-player turn-taking
    Duel,
    /// One human against an AI persona
    VersusAi,
}

impl GameMode {
    /// Name used in the persisted high-score record
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Solo => "single",
            GameMode::Duel => "multiplayer",
            GameMode::VersusAi => "ai",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "solo" => Some(GameMode::Solo),
            "multiplayer" | "duel" => Some(GameMode::Duel),
            "ai" => Some(GameMode::VersusAi),
            _ => None,
        }
    }
}

/// AI opponent tier
///
/// The tier bounds how many tile positions the AI can remember:
/// - **Novice**: remembers nothing, every pick is random
/// - **Adept**: remembers up to 6 positions, forgetting the oldest
/// - **Master**: remembers the whole board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Novice,
    Adept,
    Master,
}

impl Difficulty {
    /// Maximum number of remembered tile positions
    pub fn memory_capacity(&self) -> usize {
        match self {
            Difficulty::Novice => 0,
            Difficulty::Adept => 6,
            Difficulty::Master => DECK_SIZE,
        }
    }

    /// Display name of the AI persona playing at this tier
    pub fn persona(&self) -> &'static str {
        match self {
            Difficulty::Novice => "Mortal Fool",
            Difficulty::Adept => "Cunning Warrior",
            Difficulty::Master => "Divine Intellect",
        }
    }

    /// Parse a tier (case-insensitive), accepting the easy/medium/hard aliases
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "novice" | "easy" => Some(Difficulty::Novice),
            "adept" | "medium" => Some(Difficulty::Adept),
            "master" | "hard" => Some(Difficulty::Master),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Novice => "novice",
            Difficulty::Adept => "adept",
            Difficulty::Master => "master",
        }
    }
}
