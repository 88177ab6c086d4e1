//! Trailing-edge debounce with caller-supplied time.
//!
//! A `Debouncer` holds at most one pending payload. Every `schedule` replaces
//! the payload and pushes the deadline out by the window, so a burst of
//! changes collapses into the last one. Nothing runs on its own: the owner
//! calls `take_due(now)` from its event loop and acts on whatever comes back.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    payload: T,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Change the window. Only affects later `schedule` calls.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Schedule `payload`, replacing any pending one.
    ///
    /// Returns true if a pending payload was superseded.
    pub fn schedule(&mut self, payload: T, now: Instant) -> bool {
        let superseded = self.pending.is_some();
        self.pending = Some(Pending {
            payload,
            deadline: now + self.window,
        });
        superseded
    }

    /// Drop the pending payload without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending payload if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.cancel(),
            _ => None,
        }
    }
}
