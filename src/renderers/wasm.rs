//! JSON frame bridge for browser front ends.
//!
//! # Architecture
//!
//! wasm-bindgen cannot export generic types, so this module provides:
//! 1. [`JsonFrame`] - a serializable snapshot of everything a canvas needs
//! 2. [`FrameBridge`] - a non-generic driver over [`AnySession`] with a
//!    manually advanced clock, so the host's `setTimeout` owns real time
//! 3. `WasmStepPlayer` - the wasm-bindgen export (feature `wasm`)
//!
//! The host reads [`FrameBridge::pending_timer`] after every call, schedules a
//! callback for [`FrameBridge::interval_ms`] and passes the generation back to
//! [`FrameBridge::fire`]. Callbacks from cancelled or superseded timers are
//! ignored.

use serde::Serialize;
use std::time::Duration;

use crate::config::VizConfig;
use crate::demos::{AnySession, DatasetFile};
use crate::engine::{AlgorithmKind, Clock, GreedyAlgorithm, ManualClock, PseudoLine, Session, TimerHandle};
use crate::error::VizResult;
use crate::renderers::{Frame, SnapshotSink};

/// Serializable snapshot sent across the host boundary.
#[derive(Debug, Serialize)]
#[serde(bound(serialize = ""))]
pub struct JsonFrame<'a, A: GreedyAlgorithm> {
    /// Algorithm being shown.
    pub algorithm: AlgorithmKind,
    /// Seed the dataset was drawn from.
    pub seed: u64,
    /// Zero-based cursor.
    pub cursor: usize,
    /// Whether auto-play is running.
    pub playing: bool,
    /// Whether the last step is displayed.
    pub finished: bool,
    /// Current auto-play interval.
    pub interval_ms: u64,
    /// Pseudocode listing.
    pub pseudocode: &'static [PseudoLine],
    /// Latest render.
    pub frame: &'a Frame<A>,
    /// State including the step at the cursor, for drawing its effect.
    pub state_after: Option<A::State>,
}

impl<'a, A: GreedyAlgorithm> JsonFrame<'a, A> {
    /// Snapshot a session rendering into a [`SnapshotSink`].
    #[must_use]
    pub fn capture<C: Clock>(session: &'a Session<A, SnapshotSink<A>, C>) -> Self {
        let player = session.player();
        Self {
            algorithm: A::KIND,
            seed: session.config().seed(),
            cursor: player.cursor(),
            playing: player.is_playing(),
            finished: player.is_finished(),
            interval_ms: u64::try_from(player.interval().as_millis()).unwrap_or(u64::MAX),
            pseudocode: A::pseudocode(),
            frame: player.sink().frame(),
            state_after: (!player.is_empty()).then(|| player.state_through_cursor()),
        }
    }

    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> VizResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Non-generic player driver for hosts that own the event loop.
#[derive(Debug)]
pub struct FrameBridge {
    session: AnySession<ManualClock>,
    clock: ManualClock,
}

impl FrameBridge {
    /// Start a random session for `kind`.
    #[must_use]
    pub fn new(kind: AlgorithmKind, config: VizConfig) -> Self {
        let clock = ManualClock::new();
        Self {
            session: AnySession::new(kind, config, clock.clone()),
            clock,
        }
    }

    /// Start from a YAML dataset file.
    ///
    /// # Errors
    ///
    /// Returns error if the dataset cannot be parsed or is invalid.
    pub fn from_dataset_yaml(yaml: &str, config: VizConfig) -> VizResult<Self> {
        let file = DatasetFile::from_yaml(yaml)?;
        let clock = ManualClock::new();
        Ok(Self {
            session: AnySession::from_dataset(file, config, clock.clone())?,
            clock,
        })
    }

    /// The wrapped session.
    #[must_use]
    pub const fn session(&self) -> &AnySession<ManualClock> {
        &self.session
    }

    /// Mutable access to the wrapped session.
    pub fn session_mut(&mut self) -> &mut AnySession<ManualClock> {
        &mut self.session
    }

    /// Switch to another algorithm with a fresh dataset.
    pub fn switch(&mut self, kind: AlgorithmKind) {
        self.session.switch_to(kind);
    }

    /// Let `elapsed_ms` of host time pass and fire any due step.
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        self.clock.advance(Duration::from_millis(elapsed_ms));
        self.session.tick()
    }

    /// Deliver a host timer callback. Stale generations are ignored.
    pub fn fire(&mut self, generation: u64) -> bool {
        self.session.fire(TimerHandle::from_generation(generation))
    }

    /// Generation of the armed timer, if any.
    #[must_use]
    pub fn pending_timer(&self) -> Option<u64> {
        self.session.pending_timer().map(TimerHandle::generation)
    }

    /// Current auto-play interval in milliseconds.
    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        u64::try_from(self.session.interval().as_millis()).unwrap_or(u64::MAX)
    }

    /// Current frame as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn frame_json(&self) -> VizResult<String> {
        self.session.frame_json()
    }
}

#[cfg(feature = "wasm")]
mod bindings {
    use wasm_bindgen::prelude::*;

    use super::FrameBridge;
    use crate::config::VizConfig;
    use crate::engine::AlgorithmKind;

    fn js_error(err: &impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// Browser-facing step player.
    #[wasm_bindgen]
    pub struct WasmStepPlayer {
        bridge: FrameBridge,
    }

    #[wasm_bindgen]
    impl WasmStepPlayer {
        /// Create a player for `algorithm` (`activity`, `knapsack`, `prim`).
        ///
        /// # Errors
        ///
        /// Returns the error message if `algorithm` is not a known name.
        #[wasm_bindgen(constructor)]
        pub fn new(algorithm: &str, seed: u64) -> Result<WasmStepPlayer, JsValue> {
            let kind: AlgorithmKind = algorithm.parse().map_err(|e| js_error(&e))?;
            let config = VizConfig::builder().seed(seed).build();
            Ok(Self {
                bridge: FrameBridge::new(kind, config),
            })
        }

        /// Create a player from a YAML dataset file.
        ///
        /// # Errors
        ///
        /// Returns the error message if the dataset is invalid.
        pub fn from_dataset(yaml: &str, seed: u64) -> Result<WasmStepPlayer, JsValue> {
            let config = VizConfig::builder().seed(seed).build();
            FrameBridge::from_dataset_yaml(yaml, config)
                .map(|bridge| Self { bridge })
                .map_err(|e| js_error(&e))
        }

        /// Advance one step.
        pub fn next(&mut self) -> bool {
            self.bridge.session_mut().next()
        }

        /// Step back one step.
        pub fn prev(&mut self) -> bool {
            self.bridge.session_mut().prev()
        }

        /// Jump to `index`.
        pub fn seek(&mut self, index: usize) -> bool {
            self.bridge.session_mut().seek(index)
        }

        /// Start or stop auto-play.
        pub fn toggle_play(&mut self) {
            self.bridge.session_mut().toggle_play();
        }

        /// Stop and rewind.
        pub fn reset(&mut self) {
            self.bridge.session_mut().reset();
        }

        /// Draw a new random dataset.
        pub fn regenerate(&mut self) {
            self.bridge.session_mut().regenerate();
        }

        /// Map the speed slider to an interval.
        pub fn set_speed(&mut self, slider_ms: u64) {
            self.bridge
                .session_mut()
                .set_speed_from_slider(std::time::Duration::from_millis(slider_ms));
        }

        /// Deliver a `setTimeout` callback.
        pub fn fire(&mut self, generation: u64) -> bool {
            self.bridge.fire(generation)
        }

        /// Generation of the armed timer, or `undefined`.
        #[must_use]
        pub fn pending_timer(&self) -> Option<u64> {
            self.bridge.pending_timer()
        }

        /// Auto-play interval in milliseconds.
        #[must_use]
        pub fn interval_ms(&self) -> u64 {
            self.bridge.interval_ms()
        }

        /// Current frame as JSON.
        #[must_use]
        pub fn frame_json(&self) -> String {
            self.bridge
                .frame_json()
                .unwrap_or_else(|_| "{}".to_string())
        }
    }
}

#[cfg(feature = "wasm")]
pub use bindings::WasmStepPlayer;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn bridge(kind: AlgorithmKind) -> FrameBridge {
        FrameBridge::new(kind, VizConfig::builder().seed(42).build())
    }

    fn frame(bridge: &FrameBridge) -> Value {
        serde_json::from_str(&bridge.frame_json().unwrap()).unwrap()
    }

    #[test]
    fn test_frame_json_shape() {
        let b = bridge(AlgorithmKind::Knapsack);
        let json = frame(&b);
        assert_eq!(json["algorithm"], "knapsack");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["cursor"], 0);
        assert_eq!(json["frame"]["current"], 1);
        assert_eq!(json["frame"]["step"]["kind"]["type"], "show_input");
        assert!(json["pseudocode"].as_array().is_some_and(|p| !p.is_empty()));
        assert!(json["state_after"]["items"].as_array().is_some_and(|i| !i.is_empty()));
    }

    #[test]
    fn test_host_timer_flow() {
        let mut b = bridge(AlgorithmKind::Prim);
        assert_eq!(b.pending_timer(), None);

        b.session_mut().toggle_play();
        let generation = b.pending_timer().unwrap();
        assert_eq!(b.interval_ms(), 1000);

        assert!(b.fire(generation));
        assert_eq!(b.session().cursor(), 1);

        // Replayed callback from the consumed timer.
        assert!(!b.fire(generation));
        assert_eq!(b.session().cursor(), 1);

        let next = b.pending_timer().unwrap();
        assert_ne!(next, generation);
        assert!(b.fire(next));
        assert_eq!(b.session().cursor(), 2);
    }

    #[test]
    fn test_advance_drives_polling() {
        let mut b = bridge(AlgorithmKind::Activity);
        b.session_mut().toggle_play();
        assert!(!b.advance(999));
        assert!(b.advance(1));
        assert_eq!(b.session().cursor(), 1);
        assert_eq!(frame(&b)["playing"], true);
    }

    #[test]
    fn test_switch_algorithm() {
        let mut b = bridge(AlgorithmKind::Activity);
        b.switch(AlgorithmKind::Prim);
        assert_eq!(b.session().kind(), AlgorithmKind::Prim);
        assert_eq!(frame(&b)["algorithm"], "prim");
    }

    #[test]
    fn test_from_dataset_yaml() {
        let yaml = r"
algorithm: activity
activities:
  - { label: A, start: 1, end: 4 }
  - { label: B, start: 3, end: 5 }
";
        let b = FrameBridge::from_dataset_yaml(yaml, VizConfig::default()).unwrap();
        assert_eq!(b.session().len(), 5);
        assert!(FrameBridge::from_dataset_yaml("algorithm: nope", VizConfig::default()).is_err());
    }

    #[test]
    fn test_empty_dataset_frame() {
        let b = FrameBridge::from_dataset_yaml("algorithm: knapsack\ncapacity: 5\nitems: []\n", VizConfig::default())
            .unwrap();
        let json = frame(&b);
        assert_eq!(json["frame"]["total"], 0);
        assert!(json["frame"]["step"].is_null());
        assert!(json["state_after"].is_null());
    }
}
