//! Core stepped-execution engine.
//!
//! Implements the central step-through loop with:
//! - Deterministic RNG (PCG with partitioned seeds)
//! - Immutable step sequences produced by per-algorithm generators
//! - A cursor-driven player with a cancellable auto-play timer
//! - Sessions binding one dataset to one player

pub mod clock;
pub mod player;
pub mod rng;
pub mod session;
pub mod step;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

pub use clock::{Clock, ManualClock, PlaybackTimer, SystemClock, TimerHandle};
pub use player::StepPlayer;
pub use rng::VizRng;
pub use session::{algorithm_rng, Session};
pub use step::{PseudoLine, Step, StepSequence};

use crate::config::DatasetsConfig;
use crate::error::{VizError, VizResult};

/// The greedy algorithms the visualizer can step through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// Interval scheduling by earliest finish time.
    #[default]
    Activity,
    /// Fractional knapsack by value density.
    Knapsack,
    /// Minimum spanning tree grown from vertex 0.
    Prim,
}

impl AlgorithmKind {
    /// Every algorithm, in menu order.
    pub const ALL: [Self; 3] = [Self::Activity, Self::Knapsack, Self::Prim];

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Activity => 0,
            Self::Knapsack => 1,
            Self::Prim => 2,
        }
    }

    /// Machine name used on the command line and in dataset files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Knapsack => "knapsack",
            Self::Prim => "prim",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Activity => "Activity Selection",
            Self::Knapsack => "Fractional Knapsack",
            Self::Prim => "Prim's Minimum Spanning Tree",
        }
    }

    /// Next algorithm in menu order, wrapping around.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Activity => Self::Knapsack,
            Self::Knapsack => Self::Prim,
            Self::Prim => Self::Activity,
        }
    }
}

impl FromStr for AlgorithmKind {
    type Err = VizError;

    fn from_str(name: &str) -> VizResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| {
                VizError::config(format!("unknown algorithm '{name}' (expected activity, knapsack or prim)"))
            })
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A greedy algorithm expressed as a step generator plus a pure state fold.
///
/// Implementors never keep state between calls: [`generate`](Self::generate)
/// runs the whole procedure once and records every decision, while
/// [`apply`](Self::apply) folds one recorded step into the derived state.
///
/// # Example
///
/// ```rust
/// use greedyviz::prelude::*;
///
/// let dataset = KnapsackDataset::new(50, vec![
///     Item::new("A", 60, 10),
///     Item::new("B", 100, 20),
///     Item::new("C", 120, 30),
/// ]);
/// let steps = FractionalKnapsack::generate(&dataset);
/// let total = steps.last().and_then(|s| FractionalKnapsack::completion_total(&s.kind));
/// assert_eq!(total, Some(240.0));
/// ```
pub trait GreedyAlgorithm: 'static {
    /// Input instance.
    type Dataset: Clone + Debug + PartialEq + Serialize;
    /// Per-algorithm step variant.
    type Kind: Clone + Debug + PartialEq + Serialize;
    /// Accumulated state rebuilt by replay.
    type State: Clone + Debug + Default + PartialEq + Serialize;

    /// Which algorithm this is.
    const KIND: AlgorithmKind;

    /// Static pseudocode listing referenced by step source lines.
    fn pseudocode() -> &'static [PseudoLine];

    /// Run the algorithm once and record every decision point.
    ///
    /// An empty dataset yields an empty sequence.
    fn generate(dataset: &Self::Dataset) -> StepSequence<Self::Kind>;

    /// Fold one step into `state`. Must be pure and deterministic.
    fn apply(state: &mut Self::State, kind: &Self::Kind);

    /// Draw a random instance within `ranges`.
    fn random_dataset(rng: &mut VizRng, ranges: &DatasetsConfig) -> Self::Dataset;

    /// Check instance invariants for externally supplied datasets.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Dataset`](crate::error::VizError::Dataset) naming the
    /// offending element.
    fn validate_dataset(dataset: &Self::Dataset) -> VizResult<()>;

    /// Reported total carried by a completion step, `None` for other kinds.
    fn completion_total(kind: &Self::Kind) -> Option<f64>;
}
