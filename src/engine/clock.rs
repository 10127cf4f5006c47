//! Playback time management.
//!
//! Handles auto-play timing with support for:
//! - Wall-clock time for terminal drivers
//! - Manually advanced time for tests and browser bridges
//! - Cancellable, generation-checked timer handles

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic time for the player.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced explicitly by its owner.
///
/// Clones share the same time source, so a test can keep one handle while
/// the player owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance time by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, now: Duration) {
        if now > self.now.get() {
            self.now.set(now);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Opaque token identifying one arming of a [`PlaybackTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    generation: u64,
}

impl TimerHandle {
    /// Rebuild a handle from a generation that crossed a host boundary.
    #[must_use]
    pub const fn from_generation(generation: u64) -> Self {
        Self { generation }
    }

    /// Generation this handle was issued for.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Single-shot auto-play timer.
///
/// Every call to [`arm`](Self::arm) issues a fresh handle and invalidates all
/// earlier ones. [`cancel`](Self::cancel) is synchronous and idempotent.
#[derive(Debug, Clone, Default)]
pub struct PlaybackTimer {
    generation: u64,
    deadline: Option<Duration>,
}

impl PlaybackTimer {
    /// Create a disarmed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            deadline: None,
        }
    }

    /// Arm the timer to expire `interval` after `now`.
    pub fn arm(&mut self, now: Duration, interval: Duration) -> TimerHandle {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = Some(now.saturating_add(interval));
        TimerHandle {
            generation: self.generation,
        }
    }

    /// Disarm the timer. Outstanding handles become stale.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the timer is currently armed.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the armed deadline has passed.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left until expiry, or `None` when disarmed.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }

    /// Whether `handle` belongs to the current arming.
    #[must_use]
    pub fn accepts(&self, handle: TimerHandle) -> bool {
        self.deadline.is_some() && handle.generation == self.generation
    }

    /// Handle for the current arming, if any.
    #[must_use]
    pub fn current(&self) -> Option<TimerHandle> {
        self.deadline.map(|_| TimerHandle {
            generation: self.generation,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Only the most recent handle is ever accepted.
        #[test]
        fn prop_only_latest_handle_accepted(arms in 1usize..50) {
            let mut timer = PlaybackTimer::new();
            let handles: Vec<TimerHandle> = (0..arms)
                .map(|i| timer.arm(Duration::from_millis(i as u64), Duration::from_millis(10)))
                .collect();

            let accepted = handles.iter().filter(|h| timer.accepts(**h)).count();
            prop_assert_eq!(accepted, 1);
            prop_assert!(timer.accepts(handles[arms - 1]));
        }

        /// A timer never fires before its interval elapses.
        #[test]
        fn prop_not_due_early(start in 0u64..10_000, interval in 1u64..10_000) {
            let mut timer = PlaybackTimer::new();
            let _ = timer.arm(Duration::from_millis(start), Duration::from_millis(interval));
            prop_assert!(!timer.is_due(Duration::from_millis(start + interval - 1)));
            prop_assert!(timer.is_due(Duration::from_millis(start + interval)));
        }
    }
}
