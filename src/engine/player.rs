//! Cursor-driven step player.
//!
//! The player owns one [`StepSequence`], a cursor in `[0, N-1]`, an auto-play
//! flag and a [`PlaybackTimer`]. Every cursor change rebuilds the derived
//! state by replay and pushes a full frame into the [`RenderSink`].
//!
//! Navigation never fails: moves past either end are silent no-ops.

use std::marker::PhantomData;
use std::time::Duration;

use crate::config::PlaybackConfig;
use crate::engine::clock::{Clock, PlaybackTimer, SystemClock, TimerHandle};
use crate::engine::{GreedyAlgorithm, Step, StepSequence};
use crate::renderers::{Control, NullSink, RenderSink};
use crate::replay::reconstruct;

/// Narration shown when there is nothing to step through.
pub const EMPTY_DESCRIPTION: &str = "No data. Generate a dataset to begin.";

/// Step-through player for one algorithm.
#[derive(Debug)]
pub struct StepPlayer<A: GreedyAlgorithm, R = NullSink, C = SystemClock> {
    sequence: StepSequence<A::Kind>,
    cursor: usize,
    playing: bool,
    interval: Duration,
    min_interval: Duration,
    max_interval: Duration,
    timer: PlaybackTimer,
    clock: C,
    sink: R,
    _algorithm: PhantomData<A>,
}

impl<A: GreedyAlgorithm> StepPlayer<A> {
    /// Player with no sink, wall-clock time and default playback settings.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(NullSink, SystemClock::new(), &PlaybackConfig::default())
    }
}

impl<A, R, C> StepPlayer<A, R, C>
where
    A: GreedyAlgorithm,
    R: RenderSink<A>,
    C: Clock,
{
    /// Create an idle player with an empty sequence.
    ///
    /// Nothing is rendered until a sequence is installed.
    #[must_use]
    pub fn new(sink: R, clock: C, playback: &PlaybackConfig) -> Self {
        Self {
            sequence: StepSequence::empty(),
            cursor: 0,
            playing: false,
            interval: playback.interval(),
            min_interval: playback.min_interval(),
            max_interval: playback.max_interval().max(playback.min_interval()),
            timer: PlaybackTimer::new(),
            clock,
            sink,
            _algorithm: PhantomData,
        }
    }

    // =========================================================================
    // Sequence management
    // =========================================================================

    /// Replace the sequence, rewind to 0, stop auto-play and render.
    pub fn set_sequence(&mut self, sequence: StepSequence<A::Kind>) {
        self.stop();
        self.sequence = sequence;
        self.cursor = 0;
        tracing::debug!(algorithm = %A::KIND, len = self.sequence.len(), "sequence installed");
        self.render();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Advance one step.
    ///
    /// Returns `false` when already at the last step; auto-play stops in that
    /// case and also as soon as the last step is reached.
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 >= self.sequence.len() {
            self.stop();
            return false;
        }
        self.cursor += 1;
        tracing::debug!(cursor = self.cursor, "next");
        self.render();
        if self.is_finished() {
            self.stop();
        }
        true
    }

    /// Step back one step. Returns `false` at index 0.
    pub fn prev(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        tracing::debug!(cursor = self.cursor, "prev");
        self.render();
        true
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn seek(&mut self, index: usize) -> bool {
        if index >= self.sequence.len() {
            tracing::trace!(index, len = self.sequence.len(), "seek out of range ignored");
            return false;
        }
        self.cursor = index;
        tracing::debug!(cursor = self.cursor, "seek");
        self.render();
        if self.is_finished() {
            self.stop();
        }
        true
    }

    /// Jump to the last step.
    pub fn seek_end(&mut self) -> bool {
        self.sequence
            .last_index()
            .is_some_and(|last| self.seek(last))
    }

    /// Stop auto-play, rewind to 0 and render.
    pub fn reset(&mut self) {
        self.stop();
        self.cursor = 0;
        tracing::debug!("reset");
        self.render();
    }

    // =========================================================================
    // Auto-play
    // =========================================================================

    /// Start or stop auto-play.
    ///
    /// Starting from the last step rewinds to 0 first. A sequence with fewer
    /// than two steps cannot play.
    pub fn toggle_play(&mut self) {
        if self.playing {
            self.stop();
            return;
        }
        if self.sequence.is_empty() {
            return;
        }
        if self.is_finished() {
            self.cursor = 0;
            self.render();
        }
        if self.is_finished() {
            return;
        }
        self.playing = true;
        let handle = self.timer.arm(self.clock.now(), self.interval);
        tracing::debug!(generation = handle.generation(), interval_ms = self.interval_ms(), "auto-play started");
        self.sink.playback_changed(true);
    }

    /// Stop auto-play and disarm the timer. Idempotent.
    pub fn stop(&mut self) {
        self.timer.cancel();
        if self.playing {
            self.playing = false;
            tracing::debug!(cursor = self.cursor, "auto-play stopped");
            self.sink.playback_changed(false);
        }
    }

    /// Poll the timer and advance if it is due.
    ///
    /// Returns whether a step fired.
    pub fn tick(&mut self) -> bool {
        if !self.playing || !self.timer.is_due(self.clock.now()) {
            return false;
        }
        self.on_timer();
        true
    }

    /// Deliver a timer expiry for `handle`. Stale handles are ignored.
    ///
    /// Returns whether a step fired.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if !self.playing || !self.timer.accepts(handle) {
            tracing::trace!(generation = handle.generation(), "stale timer handle ignored");
            return false;
        }
        self.on_timer();
        true
    }

    fn on_timer(&mut self) {
        self.timer.cancel();
        self.next();
        if self.playing {
            let handle = self.timer.arm(self.clock.now(), self.interval);
            tracing::trace!(generation = handle.generation(), "timer re-armed");
        }
    }

    /// Handle of the armed timer, for callback-driven hosts.
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.timer.current()
    }

    /// Time until the armed timer is due, `None` when idle.
    #[must_use]
    pub fn time_until_due(&self) -> Option<Duration> {
        self.timer.remaining(self.clock.now())
    }

    /// Set the auto-play interval, clamped to the configured bounds.
    ///
    /// Takes effect from the next arming.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.clamp(self.min_interval, self.max_interval);
        tracing::debug!(interval_ms = self.interval_ms(), "interval changed");
    }

    /// Map a speed slider value to an interval: higher is faster.
    ///
    /// `interval = max_interval - value`, clamped.
    pub fn set_speed_from_slider(&mut self, value: Duration) {
        self.set_interval(self.max_interval.saturating_sub(value));
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current cursor.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sequence length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Whether the cursor is on the last step.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.sequence.last_index() == Some(self.cursor)
    }

    /// Whether auto-play is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current auto-play interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    fn interval_ms(&self) -> u64 {
        u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX)
    }

    /// Step at the cursor.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step<A::Kind>> {
        self.sequence.get(self.cursor)
    }

    /// The installed sequence.
    #[must_use]
    pub const fn sequence(&self) -> &StepSequence<A::Kind> {
        &self.sequence
    }

    /// Derived state: replay of steps `[0, cursor)`.
    #[must_use]
    pub fn state(&self) -> A::State {
        reconstruct::<A>(&self.sequence, self.cursor)
    }

    /// Derived state including the step at the cursor.
    #[must_use]
    pub fn state_through_cursor(&self) -> A::State {
        reconstruct::<A>(&self.sequence, self.cursor + 1)
    }

    /// The render sink.
    #[must_use]
    pub const fn sink(&self) -> &R {
        &self.sink
    }

    /// Mutable access to the render sink.
    pub fn sink_mut(&mut self) -> &mut R {
        &mut self.sink
    }

    /// The clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Re-send the current frame to the sink.
    pub fn refresh(&mut self) {
        self.render();
    }

    fn render(&mut self) {
        let total = self.sequence.len();
        let Some(step) = self.sequence.get(self.cursor) else {
            self.sink.render_empty();
            self.sink.update_description(EMPTY_DESCRIPTION);
            self.sink.update_counter(0, 0);
            self.sink.highlight_source_line(None);
            self.sink.set_control_enabled(Control::Prev, false);
            self.sink.set_control_enabled(Control::Next, false);
            self.sink.set_control_enabled(Control::Auto, false);
            return;
        };

        let state = self.state_through_cursor();
        self.sink.render(step, &state);
        self.sink.update_description(&step.description);
        self.sink.update_counter(self.cursor + 1, total);
        self.sink.highlight_source_line(None);
        self.sink.highlight_source_line(step.source_line);
        self.sink.set_control_enabled(Control::Prev, self.cursor > 0);
        self.sink.set_control_enabled(Control::Next, self.cursor + 1 < total);
        self.sink.set_control_enabled(Control::Auto, total > 1);
    }
}
