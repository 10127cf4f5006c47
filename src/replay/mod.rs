//! Deterministic state reconstruction.
//!
//! Derived state at cursor `i` is the fold of steps `[0, i)` over the empty
//! initial state. There is no incremental undo: every call replays from the
//! start, so stepping backwards is exactly as trustworthy as stepping forwards.

use crate::engine::{GreedyAlgorithm, StepSequence};

/// Rebuild the derived state after replaying steps `[0, upto)`.
///
/// `upto` is clamped to the sequence length.
///
/// # Example
///
/// ```rust
/// use greedyviz::prelude::*;
/// use greedyviz::replay::reconstruct;
///
/// let dataset = KnapsackDataset::new(50, vec![Item::new("A", 60, 10)]);
/// let steps = FractionalKnapsack::generate(&dataset);
/// let state = reconstruct::<FractionalKnapsack>(&steps, steps.len());
/// assert_eq!(state.taken.len(), 1);
/// ```
#[must_use]
pub fn reconstruct<A: GreedyAlgorithm>(sequence: &StepSequence<A::Kind>, upto: usize) -> A::State {
    let mut state = A::State::default();
    for step in sequence.iter().take(upto) {
        A::apply(&mut state, &step.kind);
    }
    state
}

/// Iterator over every intermediate state, from the empty state through the
/// state after the final step (`len() + 1` items).
#[derive(Debug)]
pub struct Replay<'a, A: GreedyAlgorithm> {
    sequence: &'a StepSequence<A::Kind>,
    state: Option<A::State>,
    next_index: usize,
}

impl<'a, A: GreedyAlgorithm> Replay<'a, A> {
    /// Start a replay over `sequence`.
    #[must_use]
    pub fn new(sequence: &'a StepSequence<A::Kind>) -> Self {
        Self {
            sequence,
            state: None,
            next_index: 0,
        }
    }
}

impl<A: GreedyAlgorithm> Iterator for Replay<'_, A> {
    type Item = A::State;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state.as_mut() {
            None => {
                let initial = A::State::default();
                self.state = Some(initial.clone());
                Some(initial)
            }
            Some(state) => {
                let step = self.sequence.get(self.next_index)?;
                A::apply(state, &step.kind);
                self.next_index += 1;
                Some(state.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::knapsack::{FractionalKnapsack, Item, KnapsackDataset};

    fn classic() -> StepSequence<<FractionalKnapsack as GreedyAlgorithm>::Kind> {
        FractionalKnapsack::generate(&KnapsackDataset::new(
            50,
            vec![
                Item::new("A", 60, 10),
                Item::new("B", 100, 20),
                Item::new("C", 120, 30),
            ],
        ))
    }

    #[test]
    fn test_reconstruct_zero_is_default() {
        let seq = classic();
        let state = reconstruct::<FractionalKnapsack>(&seq, 0);
        assert_eq!(state, Default::default());
    }

    #[test]
    fn test_reconstruct_clamps_past_end() {
        let seq = classic();
        let full = reconstruct::<FractionalKnapsack>(&seq, seq.len());
        let beyond = reconstruct::<FractionalKnapsack>(&seq, seq.len() + 100);
        assert_eq!(full, beyond);
    }

    #[test]
    fn test_reconstruct_idempotent() {
        let seq = classic();
        for k in 0..=seq.len() {
            let a = reconstruct::<FractionalKnapsack>(&seq, k);
            let b = reconstruct::<FractionalKnapsack>(&seq, k);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_replay_iterator_matches_reconstruct() {
        let seq = classic();
        let states: Vec<_> = Replay::<FractionalKnapsack>::new(&seq).collect();
        assert_eq!(states.len(), seq.len() + 1);
        for (k, state) in states.iter().enumerate() {
            assert_eq!(*state, reconstruct::<FractionalKnapsack>(&seq, k));
        }
    }

    #[test]
    fn test_replay_empty_sequence() {
        let seq = StepSequence::empty();
        let states: Vec<_> = Replay::<FractionalKnapsack>::new(&seq).collect();
        assert_eq!(states.len(), 1);
    }
}
