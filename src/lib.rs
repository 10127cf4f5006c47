//! # greedyviz
//!
//! Step-through visualizer core for greedy algorithms.
//!
//! Each algorithm runs once and records every decision as an immutable
//! [`Step`](engine::Step). A [`StepPlayer`](engine::StepPlayer) moves a cursor
//! over the recorded sequence, rebuilds the derived state by replaying from the
//! start and pushes every frame into a [`RenderSink`](renderers::RenderSink):
//!
//! - Activity selection (earliest finish first)
//! - Fractional knapsack (highest value density first)
//! - Prim's minimum spanning tree (cheapest crossing edge first)
//!
//! ## Example
//!
//! ```rust
//! use greedyviz::prelude::*;
//!
//! let dataset = ActivityDataset::new(vec![
//!     Activity::new("A", 1, 4),
//!     Activity::new("B", 3, 5),
//!     Activity::new("C", 5, 7),
//! ]);
//! let mut player = StepPlayer::<ActivitySelection>::headless();
//! player.set_sequence(ActivitySelection::generate(&dataset));
//! while player.next() {}
//! assert_eq!(player.state_through_cursor().selected, vec![0, 2]);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
)]

pub mod cli;
pub mod config;
pub mod demos;
pub mod engine;
pub mod error;
pub mod renderers;
pub mod replay;
#[cfg(feature = "tui")]
pub mod tui;
pub mod verification;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{VizConfig, VizConfigBuilder};
    pub use crate::demos::{
        Activity, ActivityDataset, ActivitySelection, AnySession, DatasetFile, Edge,
        FractionalKnapsack, GraphDataset, Item, KnapsackDataset, Prim, Vertex,
    };
    pub use crate::engine::{
        AlgorithmKind, Clock, GreedyAlgorithm, ManualClock, Session, Step, StepPlayer,
        StepSequence, SystemClock, VizRng,
    };
    pub use crate::error::{VizError, VizResult};
    pub use crate::renderers::{NullSink, RenderSink, SnapshotSink};
    pub use crate::replay::reconstruct;
}

/// Re-export for public API
pub use error::{VizError, VizResult};
