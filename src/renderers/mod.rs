//! Render sinks consumed by the step player.
//!
//! The player never draws anything itself. On every cursor change it pushes
//! the current step, the freshly reconstructed state, the narration, the step
//! counter, the pseudocode highlight and the control states into a
//! [`RenderSink`].
//!
//! # Architecture
//!
//! ```text
//! StepPlayer (cursor + timer)
//!       ↓
//! ┌─────────────────────┐
//! │     RenderSink      │
//! │  (trait-based API)  │
//! └─────────────────────┘
//!    ↓        ↓        ↓
//!  Trace    JSON      TUI
//! ```

pub mod trace;
#[cfg(feature = "tui")]
pub mod tui;
pub mod wasm;

use serde::Serialize;

use crate::engine::{GreedyAlgorithm, Step};

pub use trace::{TraceFormat, TraceSink};
pub use wasm::{FrameBridge, JsonFrame};

/// Player controls whose enabled state is reported to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    /// Step backwards.
    Prev,
    /// Step forwards.
    Next,
    /// Start or stop auto-play.
    Auto,
}

/// Drawing surface driven by the player.
///
/// Every method has a no-op default, so a sink only implements the bindings
/// it actually has.
pub trait RenderSink<A: GreedyAlgorithm> {
    /// Draw the step at the cursor together with the state replayed through
    /// it, so the picture already shows the step's effect.
    fn render(&mut self, _step: &Step<A::Kind>, _state: &A::State) {}

    /// Draw the "no data" placeholder for an empty sequence.
    fn render_empty(&mut self) {}

    /// Replace the narration text.
    fn update_description(&mut self, _text: &str) {}

    /// Show `current / total` (1-based current, 0 / 0 when empty).
    fn update_counter(&mut self, _current: usize, _total: usize) {}

    /// Highlight one pseudocode line, or clear the highlight.
    fn highlight_source_line(&mut self, _label: Option<&'static str>) {}

    /// Enable or disable a control.
    fn set_control_enabled(&mut self, _control: Control, _enabled: bool) {}

    /// Auto-play started or stopped.
    fn playback_changed(&mut self, _playing: bool) {}
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSink;

impl<A: GreedyAlgorithm> RenderSink<A> for NullSink {}

impl<A: GreedyAlgorithm, S: RenderSink<A> + ?Sized> RenderSink<A> for &mut S {
    fn render(&mut self, step: &Step<A::Kind>, state: &A::State) {
        (**self).render(step, state);
    }

    fn render_empty(&mut self) {
        (**self).render_empty();
    }

    fn update_description(&mut self, text: &str) {
        (**self).update_description(text);
    }

    fn update_counter(&mut self, current: usize, total: usize) {
        (**self).update_counter(current, total);
    }

    fn highlight_source_line(&mut self, label: Option<&'static str>) {
        (**self).highlight_source_line(label);
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        (**self).set_control_enabled(control, enabled);
    }

    fn playback_changed(&mut self, playing: bool) {
        (**self).playback_changed(playing);
    }
}

/// Everything a sink was told during the most recent render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "A::Kind: Serialize, A::State: Serialize"))]
pub struct Frame<A: GreedyAlgorithm> {
    /// Step at the cursor, `None` for the empty placeholder.
    pub step: Option<Step<A::Kind>>,
    /// Replayed state handed to `render`, cursor step included.
    pub state: Option<A::State>,
    /// Narration text.
    pub description: String,
    /// 1-based cursor position.
    pub current: usize,
    /// Sequence length.
    pub total: usize,
    /// Highlighted pseudocode label.
    pub source_line: Option<&'static str>,
    /// Whether `Prev` is enabled.
    pub prev_enabled: bool,
    /// Whether `Next` is enabled.
    pub next_enabled: bool,
    /// Whether `Auto` is enabled.
    pub auto_enabled: bool,
    /// Whether auto-play is running.
    pub playing: bool,
}

impl<A: GreedyAlgorithm> Default for Frame<A> {
    fn default() -> Self {
        Self {
            step: None,
            state: None,
            description: String::new(),
            current: 0,
            total: 0,
            source_line: None,
            prev_enabled: false,
            next_enabled: false,
            auto_enabled: false,
            playing: false,
        }
    }
}

/// Sink that keeps the latest [`Frame`] and counts calls.
///
/// Used by tests, the terminal UI and the JSON bridge.
#[derive(Debug, Clone)]
pub struct SnapshotSink<A: GreedyAlgorithm> {
    frame: Frame<A>,
    renders: usize,
    empty_renders: usize,
    highlight_clears: usize,
}

impl<A: GreedyAlgorithm> Default for SnapshotSink<A> {
    fn default() -> Self {
        Self {
            frame: Frame::default(),
            renders: 0,
            empty_renders: 0,
            highlight_clears: 0,
        }
    }
}

impl<A: GreedyAlgorithm> SnapshotSink<A> {
    /// Create an empty snapshot sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest frame.
    #[must_use]
    pub const fn frame(&self) -> &Frame<A> {
        &self.frame
    }

    /// Number of `render` calls so far.
    #[must_use]
    pub const fn renders(&self) -> usize {
        self.renders
    }

    /// Number of `render_empty` calls so far.
    #[must_use]
    pub const fn empty_renders(&self) -> usize {
        self.empty_renders
    }

    /// Number of times the highlight was cleared.
    #[must_use]
    pub const fn highlight_clears(&self) -> usize {
        self.highlight_clears
    }
}

impl<A: GreedyAlgorithm> RenderSink<A> for SnapshotSink<A> {
    fn render(&mut self, step: &Step<A::Kind>, state: &A::State) {
        self.renders += 1;
        self.frame.step = Some(step.clone());
        self.frame.state = Some(state.clone());
    }

    fn render_empty(&mut self) {
        self.empty_renders += 1;
        self.frame.step = None;
        self.frame.state = None;
    }

    fn update_description(&mut self, text: &str) {
        text.clone_into(&mut self.frame.description);
    }

    fn update_counter(&mut self, current: usize, total: usize) {
        self.frame.current = current;
        self.frame.total = total;
    }

    fn highlight_source_line(&mut self, label: Option<&'static str>) {
        if label.is_none() {
            self.highlight_clears += 1;
        }
        self.frame.source_line = label;
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        match control {
            Control::Prev => self.frame.prev_enabled = enabled,
            Control::Next => self.frame.next_enabled = enabled,
            Control::Auto => self.frame.auto_enabled = enabled,
        }
    }

    fn playback_changed(&mut self, playing: bool) {
        self.frame.playing = playing;
    }
}
