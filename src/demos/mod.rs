//! The greedy algorithms and their datasets.
//!
//! Each algorithm implements [`GreedyAlgorithm`](crate::engine::GreedyAlgorithm):
//! a generator that records every decision point once, plus a pure fold that
//! rebuilds derived state from those records.
//!
//! # Algorithms
//!
//! 1. [`activity`] - earliest-finish-first activity selection
//! 2. [`knapsack`] - fractional knapsack by value density
//! 3. [`prim`] - Prim's minimum spanning tree from vertex 0

pub mod activity;
pub mod any;
pub mod dataset;
pub mod knapsack;
pub mod prim;

// Re-exports for convenience
pub use activity::{Activity, ActivityDataset, ActivitySelection, ActivityState, ActivityStep};
pub use any::AnySession;
pub use dataset::{generate_random_dataset, DatasetFile};
pub use knapsack::{FractionalKnapsack, Item, KnapsackDataset, KnapsackState, KnapsackStep};
pub use prim::{Edge, GraphDataset, Prim, PrimState, PrimStep, Vertex};

/// Spreadsheet-style label for the element at `index`: `A`..`Z`, `AA`, `AB`, …
#[must_use]
pub fn label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        let offset = u8::try_from(n % 26).unwrap_or(0);
        letters.push(char::from(b'A' + offset));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Join labels with `", "`, or `"none"` when there are none.
pub(crate) fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let joined = labels.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}
