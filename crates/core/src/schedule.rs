//! Scheduler port - deferred transitions without blocking
//!
//! The engine never sleeps. Whenever it needs a pause (the visible resolve delay, AI thinking,
//! the solo countdown) it asks the host's [`Scheduler`] to hand a [`TimerToken`] back after a
//! delay and returns immediately. Each token carries the game generation it was issued for, so
//! a callback that outlives a restart is recognised and dropped.

use std::time::Duration;

/// What a scheduled transition does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Apply the match/no-match outcome of the two revealed tiles
    Resolve,
    /// AI reveals the first tile of its planned pair
    AiFirstPick,
    /// AI reveals the second tile of its planned pair
    AiSecondPick,
    /// Solo countdown advances by one second
    ClockTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    /// Game generation the transition belongs to
    pub generation: u32,
    /// Monotonic id within the engine, used to match cancellations
    pub seq: u64,
    pub kind: TimerKind,
}

/// Handle returned by the scheduler for cancelling a pending token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelHandle(pub u64);

/// Host-provided timer facility
pub trait Scheduler {
    /// Deliver `token` back to the engine after `delay`
    fn schedule_after(&mut self, delay: Duration, token: TimerToken) -> CancelHandle;

    /// Best-effort cancellation; the engine also discards stale tokens on its own
    fn cancel(&mut self, handle: CancelHandle);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule_after(&mut self, delay: Duration, token: TimerToken) -> CancelHandle {
        (**self).schedule_after(delay, token)
    }

    fn cancel(&mut self, handle: CancelHandle) {
        (**self).cancel(handle)
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due_ms: u64,
    handle: CancelHandle,
    token: TimerToken,
}

/// Deterministic scheduler driven by an explicit virtual clock
///
/// Tokens become due when the clock passes their deadline. Ties fire in scheduling order.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_handle: u64,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Kinds of all pending tokens, in firing order
    pub fn pending_kinds(&self) -> Vec<TimerKind> {
        let mut sorted = self.pending.clone();
        sorted.sort_by_key(|p| (p.due_ms, p.handle.0));
        sorted.into_iter().map(|p| p.token.kind).collect()
    }

    /// Pop the earliest token due at or before `deadline_ms`, moving the clock to its deadline
    pub fn pop_due(&mut self, deadline_ms: u64) -> Option<TimerToken> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= deadline_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.handle.0))
            .map(|(i, _)| i)?;
        let p = self.pending.remove(idx);
        self.now_ms = self.now_ms.max(p.due_ms);
        Some(p.token)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay: Duration, token: TimerToken) -> CancelHandle {
        self.next_handle += 1;
        let handle = CancelHandle(self.next_handle);
        self.pending.push(Pending {
            due_ms: self.now_ms + delay.as_millis() as u64,
            handle,
            token,
        });
        handle
    }

    fn cancel(&mut self, handle: CancelHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(seq: u64, kind: TimerKind) -> TimerToken {
        TimerToken {
            generation: 0,
            seq,
            kind,
        }
    }

    #[test]
    fn test_pop_due_respects_deadline_and_order() {
        let mut s = ManualScheduler::new();
        s.schedule_after(Duration::from_millis(600), token(1, TimerKind::AiSecondPick));
        s.schedule_after(Duration::from_millis(100), token(2, TimerKind::Resolve));
        s.schedule_after(Duration::from_millis(100), token(3, TimerKind::ClockTick));

        assert_eq!(s.pop_due(50), None);
        assert_eq!(s.pop_due(500).map(|t| t.seq), Some(2));
        assert_eq!(s.pop_due(500).map(|t| t.seq), Some(3));
        assert_eq!(s.now_ms(), 100);
        assert_eq!(s.pop_due(500), None);
        assert_eq!(s.pop_due(600).map(|t| t.seq), Some(1));
    }

    #[test]
    fn test_cancel_removes_pending() {
        let mut s = ManualScheduler::new();
        let h = s.schedule_after(Duration::from_millis(10), token(1, TimerKind::Resolve));
        assert_eq!(s.pending_len(), 1);
        s.cancel(h);
        assert_eq!(s.pending_len(), 0);
        assert_eq!(s.pop_due(1000), None);
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut s = ManualScheduler::new();
        s.set_now(1000);
        s.schedule_after(Duration::from_millis(200), token(1, TimerKind::Resolve));
        assert_eq!(s.pop_due(1100), None);
        assert!(s.pop_due(1200).is_some());
    }
}
