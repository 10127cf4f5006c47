//! Runtime-selected session over the three algorithms.
//!
//! Front ends that let the user switch algorithms hold an [`AnySession`]; every
//! variant renders into a [`SnapshotSink`] so the latest frame can be drawn or
//! serialized at any time.

use std::time::Duration;

use crate::config::VizConfig;
use crate::demos::activity::ActivitySelection;
use crate::demos::dataset::DatasetFile;
use crate::demos::knapsack::FractionalKnapsack;
use crate::demos::prim::Prim;
use crate::engine::{AlgorithmKind, Clock, GreedyAlgorithm, PseudoLine, Session, SystemClock, TimerHandle};
use crate::error::VizResult;
use crate::renderers::{JsonFrame, SnapshotSink};

/// Session for one algorithm that renders into a [`SnapshotSink`].
pub type SnapshotSession<A, C> = Session<A, SnapshotSink<A>, C>;

/// One of the three algorithm sessions.
#[derive(Debug)]
pub enum AnySession<C = SystemClock> {
    /// Activity selection.
    Activity(SnapshotSession<ActivitySelection, C>),
    /// Fractional knapsack.
    Knapsack(SnapshotSession<FractionalKnapsack, C>),
    /// Prim's MST.
    Prim(SnapshotSession<Prim, C>),
}

macro_rules! dispatch {
    ($self:expr, $session:ident => $body:expr) => {
        match $self {
            AnySession::Activity($session) => $body,
            AnySession::Knapsack($session) => $body,
            AnySession::Prim($session) => $body,
        }
    };
}

impl<C: Clock + Clone> AnySession<C> {
    /// Start a random session for `kind`.
    #[must_use]
    pub fn new(kind: AlgorithmKind, config: VizConfig, clock: C) -> Self {
        match kind {
            AlgorithmKind::Activity => Self::Activity(Session::new(config, SnapshotSink::new(), clock)),
            AlgorithmKind::Knapsack => Self::Knapsack(Session::new(config, SnapshotSink::new(), clock)),
            AlgorithmKind::Prim => Self::Prim(Session::new(config, SnapshotSink::new(), clock)),
        }
    }

    /// Start from a fixed dataset; the algorithm follows the file's tag.
    ///
    /// # Errors
    ///
    /// Returns error if the dataset is invalid.
    pub fn from_dataset(file: DatasetFile, config: VizConfig, clock: C) -> VizResult<Self> {
        Ok(match file {
            DatasetFile::Activity(d) => {
                Self::Activity(Session::with_dataset(config, d, SnapshotSink::new(), clock)?)
            }
            DatasetFile::Knapsack(d) => {
                Self::Knapsack(Session::with_dataset(config, d, SnapshotSink::new(), clock)?)
            }
            DatasetFile::Prim(d) => {
                Self::Prim(Session::with_dataset(config, d, SnapshotSink::new(), clock)?)
            }
        })
    }

    /// Replace this session with a fresh one for `kind`, keeping config, clock
    /// and the current auto-play interval.
    pub fn switch_to(&mut self, kind: AlgorithmKind) {
        let config = self.config().clone();
        let interval = self.interval();
        let clock = dispatch!(self, s => s.player().clock().clone());
        dispatch!(self, s => s.player_mut().stop());
        tracing::info!(from = %self.kind(), to = %kind, "switching algorithm");
        *self = Self::new(kind, config, clock);
        self.set_interval(interval);
    }

    /// Which algorithm is active.
    #[must_use]
    pub const fn kind(&self) -> AlgorithmKind {
        match self {
            Self::Activity(_) => AlgorithmKind::Activity,
            Self::Knapsack(_) => AlgorithmKind::Knapsack,
            Self::Prim(_) => AlgorithmKind::Prim,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &VizConfig {
        dispatch!(self, s => s.config())
    }

    /// Current dataset as a dataset file.
    #[must_use]
    pub fn dataset_file(&self) -> DatasetFile {
        match self {
            Self::Activity(s) => DatasetFile::Activity(s.dataset().clone()),
            Self::Knapsack(s) => DatasetFile::Knapsack(s.dataset().clone()),
            Self::Prim(s) => DatasetFile::Prim(s.dataset().clone()),
        }
    }

    /// Pseudocode listing of the active algorithm.
    #[must_use]
    pub fn pseudocode(&self) -> &'static [PseudoLine] {
        match self {
            Self::Activity(_) => ActivitySelection::pseudocode(),
            Self::Knapsack(_) => FractionalKnapsack::pseudocode(),
            Self::Prim(_) => Prim::pseudocode(),
        }
    }

    // ===== Player operations =====

    /// Advance one step.
    pub fn next(&mut self) -> bool {
        dispatch!(self, s => s.player_mut().next())
    }

    /// Step back one step.
    pub fn prev(&mut self) -> bool {
        dispatch!(self, s => s.player_mut().prev())
    }

    /// Jump to `index`; out-of-range indices are ignored.
    pub fn seek(&mut self, index: usize) -> bool {
        dispatch!(self, s => s.player_mut().seek(index))
    }

    /// Jump to the last step.
    pub fn seek_end(&mut self) -> bool {
        dispatch!(self, s => s.player_mut().seek_end())
    }

    /// Stop auto-play and rewind.
    pub fn reset(&mut self) {
        dispatch!(self, s => s.player_mut().reset());
    }

    /// Start or stop auto-play.
    pub fn toggle_play(&mut self) {
        dispatch!(self, s => s.player_mut().toggle_play());
    }

    /// Stop auto-play.
    pub fn stop(&mut self) {
        dispatch!(self, s => s.player_mut().stop());
    }

    /// Poll the auto-play timer.
    pub fn tick(&mut self) -> bool {
        dispatch!(self, s => s.player_mut().tick())
    }

    /// Deliver a timer expiry.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        dispatch!(self, s => s.player_mut().fire(handle))
    }

    /// Draw a fresh random dataset.
    pub fn regenerate(&mut self) {
        dispatch!(self, s => s.regenerate());
    }

    /// Set the auto-play interval (clamped).
    pub fn set_interval(&mut self, interval: Duration) {
        dispatch!(self, s => s.player_mut().set_interval(interval));
    }

    /// Map a speed slider value to an interval.
    pub fn set_speed_from_slider(&mut self, value: Duration) {
        dispatch!(self, s => s.player_mut().set_speed_from_slider(value));
    }

    // ===== Queries =====

    /// Zero-based cursor.
    #[must_use]
    pub fn cursor(&self) -> usize {
        dispatch!(self, s => s.player().cursor())
    }

    /// Sequence length.
    #[must_use]
    pub fn len(&self) -> usize {
        dispatch!(self, s => s.player().len())
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        dispatch!(self, s => s.player().is_empty())
    }

    /// Whether auto-play is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        dispatch!(self, s => s.player().is_playing())
    }

    /// Whether the last step is displayed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        dispatch!(self, s => s.player().is_finished())
    }

    /// Current auto-play interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        dispatch!(self, s => s.player().interval())
    }

    /// Time until the next auto-play step, `None` when idle.
    #[must_use]
    pub fn time_until_due(&self) -> Option<Duration> {
        dispatch!(self, s => s.player().time_until_due())
    }

    /// Handle of the armed timer.
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        dispatch!(self, s => s.player().pending_timer())
    }

    /// Narration of the latest frame.
    #[must_use]
    pub fn description(&self) -> &str {
        dispatch!(self, s => s.player().sink().frame().description.as_str())
    }

    /// `(current, total)` of the latest frame.
    #[must_use]
    pub fn counter(&self) -> (usize, usize) {
        dispatch!(self, s => {
            let frame = s.player().sink().frame();
            (frame.current, frame.total)
        })
    }

    /// Highlighted pseudocode label of the latest frame.
    #[must_use]
    pub fn source_line(&self) -> Option<&'static str> {
        dispatch!(self, s => s.player().sink().frame().source_line)
    }

    /// `(prev, next)` enabled flags of the latest frame.
    #[must_use]
    pub fn controls(&self) -> (bool, bool) {
        dispatch!(self, s => {
            let frame = s.player().sink().frame();
            (frame.prev_enabled, frame.next_enabled)
        })
    }

    /// Reported total of the completion step, if the sequence has one.
    #[must_use]
    pub fn completion_total(&self) -> Option<f64> {
        match self {
            Self::Activity(s) => s.steps().last().and_then(|st| ActivitySelection::completion_total(&st.kind)),
            Self::Knapsack(s) => s.steps().last().and_then(|st| FractionalKnapsack::completion_total(&st.kind)),
            Self::Prim(s) => s.steps().last().and_then(|st| Prim::completion_total(&st.kind)),
        }
    }

    /// Latest frame as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn frame_json(&self) -> VizResult<String> {
        dispatch!(self, s => JsonFrame::capture(s).to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::knapsack::{Item, KnapsackDataset};
    use crate::engine::ManualClock;

    fn any(kind: AlgorithmKind) -> AnySession<ManualClock> {
        AnySession::new(kind, VizConfig::builder().seed(17).build(), ManualClock::new())
    }

    #[test]
    fn test_new_for_every_kind() {
        for kind in AlgorithmKind::ALL {
            let s = any(kind);
            assert_eq!(s.kind(), kind);
            assert!(!s.is_empty());
            assert_eq!(s.cursor(), 0);
            assert_eq!(s.counter(), (1, s.len()));
            assert_eq!(s.controls(), (false, true));
            assert!(s.source_line().is_some());
            assert!(!s.pseudocode().is_empty());
        }
    }

    #[test]
    fn test_navigation_updates_frame() {
        let mut s = any(AlgorithmKind::Activity);
        assert!(s.next());
        assert_eq!(s.counter().0, 2);
        assert!(s.seek_end());
        assert!(s.is_finished());
        assert!(s.description().starts_with("Done."));
        assert_eq!(s.controls(), (true, false));
        s.reset();
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_switch_keeps_seed() {
        let mut s = any(AlgorithmKind::Activity);
        s.toggle_play();
        s.switch_to(AlgorithmKind::Knapsack);
        assert_eq!(s.kind(), AlgorithmKind::Knapsack);
        assert_eq!(s.config().seed(), 17);
        assert!(!s.is_playing());
        assert_eq!(s.dataset_file(), any(AlgorithmKind::Knapsack).dataset_file());
    }

    #[test]
    fn test_switch_keeps_interval() {
        let mut s = any(AlgorithmKind::Activity);
        s.set_interval(Duration::from_millis(300));
        s.switch_to(AlgorithmKind::Prim);
        assert_eq!(s.interval(), Duration::from_millis(300));

        s.set_speed_from_slider(Duration::from_millis(1500));
        s.switch_to(AlgorithmKind::Knapsack);
        assert_eq!(s.interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_from_dataset_follows_tag() {
        let file = DatasetFile::Knapsack(KnapsackDataset::new(
            50,
            vec![Item::new("A", 60, 10), Item::new("B", 100, 20), Item::new("C", 120, 30)],
        ));
        let s = AnySession::from_dataset(file, VizConfig::default(), ManualClock::new()).unwrap();
        assert_eq!(s.kind(), AlgorithmKind::Knapsack);
        let total = s.completion_total().unwrap();
        assert!((total - 240.0).abs() < 1e-9);
    }

    #[test]
    fn test_regenerate_changes_dataset() {
        let mut s = any(AlgorithmKind::Prim);
        let before = s.dataset_file();
        s.seek(2);
        s.regenerate();
        assert_eq!(s.cursor(), 0);
        assert_ne!(s.dataset_file(), before);
    }

    #[test]
    fn test_speed_controls() {
        let mut s = any(AlgorithmKind::Knapsack);
        s.set_interval(Duration::from_millis(300));
        assert_eq!(s.interval(), Duration::from_millis(300));
        s.set_speed_from_slider(Duration::from_millis(1900));
        assert_eq!(s.interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_timer_queries() {
        let mut s = any(AlgorithmKind::Activity);
        assert_eq!(s.time_until_due(), None);
        s.toggle_play();
        assert_eq!(s.time_until_due(), Some(Duration::from_millis(1000)));
        let handle = s.pending_timer().unwrap();
        assert!(s.fire(handle));
        s.stop();
        assert!(!s.tick());
    }
}
