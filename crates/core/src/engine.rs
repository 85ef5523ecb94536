//! Match engine - the turn/reveal/resolve state machine shared by every mode
//!
//! ```text
//! Ready -> AwaitingFirstPick -> AwaitingSecondPick -> Resolving -+-> AwaitingFirstPick (same actor on match)
//!                 ^                                              +-> AwaitingFirstPick (next actor on miss)
//!                 +----------------------------------------------+-> Complete
//! ```
//!
//! The engine is the only mutator of the deck. Hosts feed it pick intents and scheduler
//! callbacks; it answers with [`MatchEvent`]s collected in an outbox. Illegal or stale intents
//! are ignored rather than reported, because the presentation layer is expected to have
//! disabled them already.

use std::time::Duration;

use arrayvec::ArrayVec;

use crate::ai::AiDriver;
use crate::deck::{Deck, DeckFactory};
use crate::event::MatchEvent;
use crate::rng::{RandomSource, SimpleRng};
use crate::schedule::{CancelHandle, ManualScheduler, Scheduler, TimerKind, TimerToken};
use crate::score::{GameResult, Participant, ScoreKeeper};
use crate::snapshot::{BoardSnapshot, TileView};
use crate::types::*;

/// Whose turn it is, and when it changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPolicy {
    pub actor_count: usize,
    pub keep_turn_on_match: bool,
}

impl TurnPolicy {
    /// Actor after `current` when the turn is handed off
    pub fn next_actor(&self, current: ActorIndex) -> ActorIndex {
        (current + 1) % self.actor_count.max(1)
    }
}

/// Presentation delays, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub resolve_pause_ms: u32,
    pub ai_second_pick_ms: u32,
    pub clock_tick_ms: u32,
}

impl Pacing {
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            resolve_pause_ms: match mode {
                GameMode::VersusAi => AI_RESOLVE_PAUSE_MS,
                GameMode::Solo | GameMode::Duel => RESOLVE_PAUSE_MS,
            },
            ai_second_pick_ms: AI_SECOND_PICK_MS,
            clock_tick_ms: CLOCK_TICK_MS,
        }
    }
}

/// Everything needed to set up one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub mode: GameMode,
    pub participants: Vec<String>,
    pub difficulty: Option<Difficulty>,
    /// Countdown length; solo only
    pub time_limit_secs: Option<u32>,
    pub pacing: Pacing,
}

impl MatchConfig {
    /// Timed single-player game
    pub fn solo(name: impl Into<String>, time_limit_secs: u32) -> Self {
        Self {
            mode: GameMode::Solo,
            participants: vec![name.into()],
            difficulty: None,
            time_limit_secs: Some(time_limit_secs),
            pacing: Pacing::for_mode(GameMode::Solo),
        }
    }

    /// Solo game without a countdown
    pub fn untimed_solo(name: impl Into<String>) -> Self {
        Self {
            time_limit_secs: None,
            ..Self::solo(name, 0)
        }
    }

    /// Two local players taking turns
    pub fn duel(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            mode: GameMode::Duel,
            participants: vec![first.into(), second.into()],
            difficulty: None,
            time_limit_secs: None,
            pacing: Pacing::for_mode(GameMode::Duel),
        }
    }

    /// Human (seat 0, moves first) against an AI persona (seat 1)
    pub fn versus_ai(name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            mode: GameMode::VersusAi,
            participants: vec![name.into(), difficulty.persona().to_string()],
            difficulty: Some(difficulty),
            time_limit_secs: None,
            pacing: Pacing::for_mode(GameMode::VersusAi),
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn turn_policy(&self) -> TurnPolicy {
        TurnPolicy {
            actor_count: self.participants.len(),
            keep_turn_on_match: true,
        }
    }

    /// Seat driven by the AI, if any
    pub fn ai_actor(&self) -> Option<ActorIndex> {
        match self.mode {
            GameMode::VersusAi => Some(1),
            GameMode::Solo | GameMode::Duel => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created but not started; picks are ignored
    Ready,
    AwaitingFirstPick,
    AwaitingSecondPick,
    /// Two tiles face-up, waiting for the visible pause to elapse
    Resolving,
    Complete,
    /// Solo countdown ran out
    TimeUp,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Complete | Phase::TimeUp)
    }

    pub fn accepts_picks(&self) -> bool {
        matches!(self, Phase::AwaitingFirstPick | Phase::AwaitingSecondPick)
    }
}

pub struct MatchEngine<S: Scheduler, R: RandomSource = SimpleRng> {
    config: MatchConfig,
    policy: TurnPolicy,
    factory: DeckFactory,
    rng: R,
    scheduler: S,
    deck: Deck,
    /// Positions face-up in the current turn
    reveal: ArrayVec<usize, 2>,
    phase: Phase,
    actor: ActorIndex,
    /// Bumped on every restart; timer tokens from older generations are dropped
    generation: u32,
    score: ScoreKeeper,
    ai: Option<AiDriver>,
    remaining_secs: Option<u32>,
    elapsed_secs: u32,
    result: Option<GameResult>,
    next_seq: u64,
    pending: Vec<(TimerToken, CancelHandle)>,
    events: Vec<MatchEvent>,
}

impl<S: Scheduler> MatchEngine<S, SimpleRng> {
    /// Create a game with a seeded RNG
    pub fn new(config: MatchConfig, seed: u32, scheduler: S) -> Self {
        Self::with_rng(config, SimpleRng::new(seed), scheduler)
    }
}

impl<S: Scheduler, R: RandomSource> MatchEngine<S, R> {
    pub fn with_rng(config: MatchConfig, mut rng: R, scheduler: S) -> Self {
        let deck = DeckFactory.build(&mut rng);
        Self::with_deck(config, deck, rng, scheduler)
    }

    /// Create a game on a hand-laid board
    ///
    /// Restarting still deals a standard board from the factory.
    ///
    /// # Panics
    ///
    /// Panics if `config` names no participants.
    pub fn with_deck(config: MatchConfig, deck: Deck, rng: R, scheduler: S) -> Self {
        assert!(
            !config.participants.is_empty(),
            "a match needs at least one participant"
        );
        let participants = config
            .participants
            .iter()
            .enumerate()
            .map(|(i, name)| Participant::new(i, name.clone()))
            .collect();
        let ai = config
            .ai_actor()
            .zip(config.difficulty)
            .map(|(seat, difficulty)| AiDriver::new(seat, difficulty));

        Self {
            policy: config.turn_policy(),
            remaining_secs: config.time_limit_secs,
            config,
            factory: DeckFactory,
            rng,
            scheduler,
            deck,
            reveal: ArrayVec::new(),
            phase: Phase::Ready,
            actor: 0,
            generation: 0,
            score: ScoreKeeper::new(participants),
            ai,
            elapsed_secs: 0,
            result: None,
            next_seq: 0,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Begin play; does nothing if already started
    pub fn start(&mut self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.phase = Phase::AwaitingFirstPick;
        log::debug!(
            "[ENGINE] game {} started ({:?}, {} tiles)",
            self.generation,
            self.config.mode,
            self.deck.len()
        );
        self.emit(MatchEvent::GameStarted {
            generation: self.generation,
        });

        if self.remaining_secs.is_some() {
            self.schedule(self.config.pacing.clock_tick_ms, TimerKind::ClockTick);
        }
        self.schedule_ai_turn_if_due();
    }

    /// Throw away the current game and deal a new one
    pub fn restart(&mut self) {
        self.cancel_all();
        self.generation = self.generation.wrapping_add(1);
        self.deck = self.factory.build(&mut self.rng);
        self.reveal.clear();
        self.score.reset();
        if let Some(ai) = self.ai.as_mut() {
            ai.reset();
        }
        self.actor = 0;
        self.remaining_secs = self.config.time_limit_secs;
        self.elapsed_secs = 0;
        self.result = None;
        self.phase = Phase::Ready;
        self.start();
    }

    /// Human pick intent
    ///
    /// Returns whether the pick was applied. Picks for the AI's seat, out-of-turn picks, unknown
    /// ids, already face-up or resolved tiles and a third pick in one turn are all ignored.
    pub fn pick(&mut self, actor: ActorIndex, tile: TileId) -> bool {
        if self.is_ai_actor(actor) {
            log::trace!("[ENGINE] ignored external pick for AI seat {}", actor);
            return false;
        }
        let Some(position) = self.deck.position_of(tile) else {
            log::trace!("[ENGINE] ignored pick of unknown tile {:?}", tile);
            return false;
        };
        self.reveal_tile(actor, position)
    }

    /// Deliver a scheduled transition
    ///
    /// Returns whether the token was current and applied.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if token.generation != self.generation {
            log::trace!("[ENGINE] dropped stale {:?} from game {}", token.kind, token.generation);
            return false;
        }
        let Some(idx) = self.pending.iter().position(|(t, _)| t.seq == token.seq) else {
            log::trace!("[ENGINE] dropped cancelled {:?}", token.kind);
            return false;
        };
        self.pending.swap_remove(idx);

        match token.kind {
            TimerKind::Resolve => self.resolve(),
            TimerKind::AiFirstPick => self.ai_first_pick(),
            TimerKind::AiSecondPick => self.ai_second_pick(),
            TimerKind::ClockTick => self.clock_tick(),
        }
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Participant currently entitled to pick
    pub fn actor(&self) -> ActorIndex {
        self.actor
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Positions face-up in the current turn (at most two)
    pub fn revealed(&self) -> &[usize] {
        &self.reveal
    }

    pub fn score(&self) -> &ScoreKeeper {
        &self.score
    }

    pub fn participants(&self) -> &[Participant] {
        self.score.participants()
    }

    pub fn moves(&self) -> u32 {
        self.score.moves()
    }

    pub fn remaining_secs(&self) -> Option<u32> {
        self.remaining_secs
    }

    /// Final result once the game is complete
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn ai(&self) -> Option<&AiDriver> {
        self.ai.as_ref()
    }

    pub fn is_ai_actor(&self, actor: ActorIndex) -> bool {
        self.ai.as_ref().map(|ai| ai.actor() == actor).unwrap_or(false)
    }

    pub fn is_ai_turn(&self) -> bool {
        self.is_ai_actor(self.actor)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Read model for rendering
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tiles: self.deck.tiles().iter().map(TileView::from).collect(),
            phase: self.phase,
            actor: self.actor,
            participants: self.score.participants().to_vec(),
            moves: self.score.moves(),
            remaining_secs: self.remaining_secs,
            generation: self.generation,
        }
    }

    fn check_pick(&self, actor: ActorIndex, position: usize) -> Result<(), &'static str> {
        if !self.phase.accepts_picks() {
            return Err("phase does not accept picks");
        }
        if actor != self.actor {
            return Err("not this actor's turn");
        }
        if self.reveal.is_full() {
            return Err("two tiles already face-up");
        }
        match self.deck.get(position) {
            None => Err("position out of range"),
            Some(t) if t.resolved => Err("tile already resolved"),
            Some(t) if t.revealed => Err("tile already face-up"),
            Some(_) => Ok(()),
        }
    }

    fn reveal_tile(&mut self, actor: ActorIndex, position: usize) -> bool {
        if let Err(reason) = self.check_pick(actor, position) {
            log::trace!(
                "[ENGINE] ignored pick at {} by actor {}: {}",
                position,
                actor,
                reason
            );
            return false;
        }

        let Some(tile) = self.deck.get_mut(position) else {
            return false;
        };
        tile.revealed = true;
        let (id, symbol) = (tile.id, tile.symbol);
        self.reveal.push(position);

        if let Some(ai) = self.ai.as_mut() {
            ai.observe(symbol, position);
        }

        let completes_move = self.reveal.is_full();
        self.emit(MatchEvent::TileRevealed {
            actor,
            tile: id,
            position,
            symbol,
            completes_move,
        });

        if completes_move {
            self.phase = Phase::Resolving;
            self.schedule(self.config.pacing.resolve_pause_ms, TimerKind::Resolve);
        } else {
            self.phase = Phase::AwaitingSecondPick;
        }
        true
    }

    fn resolve(&mut self) -> bool {
        if self.phase != Phase::Resolving || !self.reveal.is_full() {
            return false;
        }
        let (a, b) = (self.reveal[0], self.reveal[1]);
        self.reveal.clear();

        let (Some(first), Some(second)) = (self.deck.get(a).copied(), self.deck.get(b).copied())
        else {
            return false;
        };
        let matched = first.symbol == second.symbol;

        for position in [a, b] {
            if let Some(tile) = self.deck.get_mut(position) {
                if matched {
                    tile.resolved = true;
                } else {
                    tile.revealed = false;
                }
            }
        }

        let actor = self.actor;
        self.emit(MatchEvent::PairResolved {
            actor,
            first: first.id,
            second: second.id,
            matched,
        });

        if matched {
            if let Some(ai) = self.ai.as_mut() {
                ai.forget_symbol(first.symbol);
            }
            log::debug!(
                "[ENGINE] actor {} matched {:?} ({}/{})",
                actor,
                first.symbol,
                self.deck.resolved_pairs(),
                self.deck.pair_count()
            );
        }

        if self.deck.all_resolved() {
            self.complete();
            return true;
        }

        self.phase = Phase::AwaitingFirstPick;
        let hand_off = !matched || !self.policy.keep_turn_on_match;
        if hand_off && self.policy.actor_count > 1 {
            self.actor = self.policy.next_actor(actor);
            log::debug!("[ENGINE] turn handed to actor {}", self.actor);
            self.emit(MatchEvent::TurnChanged { actor: self.actor });
        }
        self.schedule_ai_turn_if_due();
        true
    }

    fn complete(&mut self) {
        self.phase = Phase::Complete;
        self.cancel_all();

        let elapsed = self.config.time_limit_secs.map(|_| self.elapsed_secs);
        let result = self
            .score
            .result(self.config.mode, self.config.difficulty, elapsed);
        debug_assert_eq!(self.score.total_matches() as usize, self.deck.pair_count());
        log::debug!(
            "[ENGINE] game {} complete: {} matches in {} moves, winner {:?}",
            self.generation,
            result.total_matches,
            result.total_moves,
            result.winner_name
        );
        self.result = Some(result.clone());
        self.emit(MatchEvent::GameComplete(result));
    }

    fn clock_tick(&mut self) -> bool {
        if self.phase.is_terminal() || self.phase == Phase::Ready {
            return false;
        }
        let Some(remaining) = self.remaining_secs else {
            return false;
        };
        let remaining = remaining.saturating_sub(1);
        self.remaining_secs = Some(remaining);
        self.elapsed_secs += 1;
        self.emit(MatchEvent::ClockTick {
            remaining_secs: remaining,
        });

        if remaining == 0 {
            self.phase = Phase::TimeUp;
            self.cancel_all();
            log::debug!("[ENGINE] game {} ran out of time", self.generation);
            self.emit(MatchEvent::TimeExpired);
        } else {
            self.schedule(self.config.pacing.clock_tick_ms, TimerKind::ClockTick);
        }
        true
    }

    fn schedule_ai_turn_if_due(&mut self) {
        if self.phase != Phase::AwaitingFirstPick || !self.is_ai_turn() {
            return;
        }
        let Some(ai) = self.ai.as_ref() else {
            return;
        };
        let delay = ai.think_delay_ms(&mut self.rng);
        self.schedule(delay, TimerKind::AiFirstPick);
    }

    fn ai_first_pick(&mut self) -> bool {
        if self.phase != Phase::AwaitingFirstPick || !self.is_ai_turn() {
            return false;
        }
        let plan = match self.ai.as_ref() {
            Some(ai) => ai.plan(&self.deck, &mut self.rng),
            None => return false,
        };
        let Some(plan) = plan else {
            return false;
        };
        log::debug!(
            "[AI] plans {} and {} ({:?})",
            plan.first,
            plan.second,
            plan.source
        );

        if !self.reveal_tile(self.actor, plan.first) {
            return false;
        }
        if let Some(ai) = self.ai.as_mut() {
            ai.hold_second(plan.second);
        }
        self.schedule(self.config.pacing.ai_second_pick_ms, TimerKind::AiSecondPick);
        true
    }

    fn ai_second_pick(&mut self) -> bool {
        if self.phase != Phase::AwaitingSecondPick || !self.is_ai_turn() {
            return false;
        }
        let planned = self.ai.as_mut().and_then(|ai| ai.take_second());
        let position = planned
            .filter(|&p| self.deck.get(p).map(|t| t.is_pickable()).unwrap_or(false))
            .or_else(|| {
                let available: Vec<usize> = self.deck.pickable_positions().collect();
                if available.is_empty() {
                    return None;
                }
                let i = self.rng.next_range(available.len() as u32) as usize;
                Some(available[i])
            });
        match position {
            Some(p) => self.reveal_tile(self.actor, p),
            None => false,
        }
    }

    fn schedule(&mut self, delay_ms: u32, kind: TimerKind) {
        self.next_seq += 1;
        let token = TimerToken {
            generation: self.generation,
            seq: self.next_seq,
            kind,
        };
        let handle = self
            .scheduler
            .schedule_after(Duration::from_millis(delay_ms as u64), token);
        self.pending.push((token, handle));
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain(..) {
            self.scheduler.cancel(handle);
        }
    }

    fn emit(&mut self, event: MatchEvent) {
        self.score.observe(&event);
        self.events.push(event);
    }
}

impl<R: RandomSource> MatchEngine<ManualScheduler, R> {
    /// Advance the virtual clock, firing every transition that falls due on the way
    ///
    /// Transitions scheduled while firing are honoured if they are due within the window.
    /// Returns the number of transitions applied.
    pub fn advance_ms(&mut self, ms: u64) -> usize {
        let deadline = self.scheduler.now_ms() + ms;
        let mut applied = 0;
        while let Some(token) = self.scheduler.pop_due(deadline) {
            if self.fire(token) {
                applied += 1;
            }
        }
        self.scheduler.set_now(deadline);
        applied
    }
}
