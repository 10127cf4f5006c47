//! Fractional knapsack: take items by value density until the sack is full.
//!
//! Every item's value/weight ratio is computed in input order, items are
//! sorted by ratio descending (stable), then taken whole while they fit. The
//! first item that does not fit is taken fractionally and the scan stops.

use serde::{Deserialize, Serialize};

use crate::config::DatasetsConfig;
use crate::demos::{join_labels, label};
use crate::engine::step::StepRecorder;
use crate::engine::{AlgorithmKind, GreedyAlgorithm, PseudoLine, StepSequence, VizRng};
use crate::error::{VizError, VizResult};

/// A divisible item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    /// Display label.
    pub label: String,
    /// Value of the whole item.
    pub value: u32,
    /// Weight of the whole item. Must be positive.
    pub weight: u32,
}

impl Item {
    /// Create an item.
    #[must_use]
    pub fn new(label: impl Into<String>, value: u32, weight: u32) -> Self {
        Self {
            label: label.into(),
            value,
            weight,
        }
    }

    /// Value per unit of weight.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        f64::from(self.value) / f64::from(self.weight)
    }
}

/// Fractional knapsack instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnapsackDataset {
    /// Weight limit.
    pub capacity: u32,
    /// Items in input order.
    pub items: Vec<Item>,
}

impl KnapsackDataset {
    /// Create a dataset.
    #[must_use]
    pub const fn new(capacity: u32, items: Vec<Item>) -> Self {
        Self { capacity, items }
    }
}

/// Recorded decision points. Indices refer to input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KnapsackStep {
    /// Present the items and capacity.
    ShowInput {
        /// Copy of the items.
        items: Vec<Item>,
        /// Weight limit.
        capacity: u32,
    },
    /// Compute one item's value density.
    CalculateRatio {
        /// Input index.
        index: usize,
        /// `value / weight`.
        ratio: f64,
    },
    /// Sort by ratio descending.
    Sort {
        /// Input indices in sorted order.
        order: Vec<usize>,
    },
    /// Take an entire item.
    TakeWhole {
        /// Input index.
        index: usize,
        /// Weight added.
        weight: f64,
        /// Value added.
        value: f64,
    },
    /// Take part of an item, filling the sack.
    TakeFraction {
        /// Input index.
        index: usize,
        /// Portion taken, in `(0, 1)`.
        fraction: f64,
        /// Weight added.
        weight: f64,
        /// Value added.
        value: f64,
    },
    /// Summary.
    Complete {
        /// Total value carried.
        total_value: f64,
        /// Total weight carried.
        total_weight: f64,
    },
}

/// One entry of the knapsack contents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Taken {
    /// Input index.
    pub index: usize,
    /// Portion taken, `1.0` for whole items.
    pub fraction: f64,
}

/// State accumulated by replaying knapsack steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KnapsackState {
    /// Items shown so far.
    pub items: Vec<Item>,
    /// Weight limit.
    pub capacity: u32,
    /// Ratios computed so far, by input index.
    pub ratios: Vec<Option<f64>>,
    /// Sorted order, empty until the sort step.
    pub order: Vec<usize>,
    /// Contents in the order they were taken.
    pub taken: Vec<Taken>,
    /// Weight carried.
    pub total_weight: f64,
    /// Value carried.
    pub total_value: f64,
}

impl KnapsackState {
    /// Capacity left.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (f64::from(self.capacity) - self.total_weight).max(0.0)
    }

    /// Portion of the item at input index `index` in the sack.
    #[must_use]
    pub fn fraction_of(&self, index: usize) -> f64 {
        self.taken
            .iter()
            .find(|t| t.index == index)
            .map_or(0.0, |t| t.fraction)
    }
}

const PSEUDOCODE: &[PseudoLine] = &[
    PseudoLine::new("input", "items, W ← input"),
    PseudoLine::new("ratio", "for i in items: r[i] ← v[i] / w[i]"),
    PseudoLine::new("sort", "sort items by r descending"),
    PseudoLine::new("loop", "for i in items while W > 0:"),
    PseudoLine::new("whole", "  if w[i] ≤ W: take all of i; W ← W - w[i]"),
    PseudoLine::new("fraction", "  else: take W / w[i] of i; W ← 0"),
    PseudoLine::new("done", "return total value"),
];

/// Greedy fractional knapsack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FractionalKnapsack;

impl GreedyAlgorithm for FractionalKnapsack {
    type Dataset = KnapsackDataset;
    type Kind = KnapsackStep;
    type State = KnapsackState;

    const KIND: AlgorithmKind = AlgorithmKind::Knapsack;

    fn pseudocode() -> &'static [PseudoLine] {
        PSEUDOCODE
    }

    fn generate(dataset: &KnapsackDataset) -> StepSequence<KnapsackStep> {
        let items = &dataset.items;
        if items.is_empty() {
            return StepSequence::empty();
        }
        let capacity = f64::from(dataset.capacity);

        let mut steps = StepRecorder::new();
        steps.push(
            KnapsackStep::ShowInput {
                items: items.clone(),
                capacity: dataset.capacity,
            },
            format!("Here are {} items. Capacity: {}.", items.len(), dataset.capacity),
            "input",
        );

        let ratios: Vec<f64> = items.iter().map(Item::ratio).collect();
        for (index, (item, &ratio)) in items.iter().zip(&ratios).enumerate() {
            steps.push(
                KnapsackStep::CalculateRatio { index, ratio },
                format!(
                    "Item {}: value {}, weight {}, ratio {ratio:.2}.",
                    item.label, item.value, item.weight
                ),
                "ratio",
            );
        }

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| ratios[b].total_cmp(&ratios[a]));
        steps.push(
            KnapsackStep::Sort {
                order: order.clone(),
            },
            format!(
                "Sort by ratio, highest first: {}.",
                join_labels(order.iter().map(|&i| items[i].label.as_str()))
            ),
            "sort",
        );

        let mut total_weight = 0.0;
        let mut total_value = 0.0;
        for &index in &order {
            let remaining = capacity - total_weight;
            if remaining <= 0.0 {
                break;
            }
            let item = &items[index];
            let weight = f64::from(item.weight);
            if weight <= remaining {
                let value = f64::from(item.value);
                total_weight += weight;
                total_value += value;
                steps.push(
                    KnapsackStep::TakeWhole {
                        index,
                        weight,
                        value,
                    },
                    format!(
                        "Take all of {} (value {}, weight {}). Remaining capacity: {}.",
                        item.label,
                        item.value,
                        item.weight,
                        capacity - total_weight
                    ),
                    "whole",
                );
            } else {
                let fraction = remaining / weight;
                let value = f64::from(item.value) * fraction;
                total_weight = capacity;
                total_value += value;
                steps.push(
                    KnapsackStep::TakeFraction {
                        index,
                        fraction,
                        weight: remaining,
                        value,
                    },
                    format!(
                        "Take {:.1}% of {} (value {value:.2}, weight {remaining:.2}). The knapsack is full.",
                        fraction * 100.0,
                        item.label
                    ),
                    "fraction",
                );
                break;
            }
        }

        steps.push(
            KnapsackStep::Complete {
                total_value,
                total_weight,
            },
            format!(
                "Done. Total value {total_value:.2}, weight used {total_weight:.2} / {}.",
                dataset.capacity
            ),
            "done",
        );
        steps.finish()
    }

    fn apply(state: &mut KnapsackState, kind: &KnapsackStep) {
        match kind {
            KnapsackStep::ShowInput { items, capacity } => {
                state.items.clone_from(items);
                state.capacity = *capacity;
                state.ratios = vec![None; items.len()];
            }
            KnapsackStep::CalculateRatio { index, ratio } => {
                if let Some(slot) = state.ratios.get_mut(*index) {
                    *slot = Some(*ratio);
                }
            }
            KnapsackStep::Sort { order } => state.order.clone_from(order),
            KnapsackStep::TakeWhole {
                index,
                weight,
                value,
            } => {
                state.taken.push(Taken {
                    index: *index,
                    fraction: 1.0,
                });
                state.total_weight += weight;
                state.total_value += value;
            }
            KnapsackStep::TakeFraction {
                index,
                fraction,
                weight,
                value,
            } => {
                state.taken.push(Taken {
                    index: *index,
                    fraction: *fraction,
                });
                state.total_weight += weight;
                state.total_value += value;
            }
            KnapsackStep::Complete { .. } => {}
        }
    }

    fn random_dataset(rng: &mut VizRng, ranges: &DatasetsConfig) -> KnapsackDataset {
        let ranges = &ranges.knapsack;
        let count = rng.draw(ranges.items) as usize;
        let capacity = rng.draw(ranges.capacity);
        let items = (0..count)
            .map(|i| {
                let value = rng.draw(ranges.value);
                let weight = rng.draw(ranges.weight).max(1);
                Item::new(label(i), value, weight)
            })
            .collect();
        KnapsackDataset::new(capacity, items)
    }

    fn validate_dataset(dataset: &KnapsackDataset) -> VizResult<()> {
        if let Some(item) = dataset.items.iter().find(|item| item.weight == 0) {
            return Err(VizError::dataset(format!(
                "item {} has zero weight",
                item.label
            )));
        }
        Ok(())
    }

    fn completion_total(kind: &KnapsackStep) -> Option<f64> {
        match kind {
            KnapsackStep::Complete { total_value, .. } => Some(*total_value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::reconstruct;

    const EPS: f64 = 1e-9;

    fn classic() -> KnapsackDataset {
        KnapsackDataset::new(
            50,
            vec![
                Item::new("A", 60, 10),
                Item::new("B", 100, 20),
                Item::new("C", 120, 30),
            ],
        )
    }

    #[test]
    fn test_classic_instance() {
        let seq = FractionalKnapsack::generate(&classic());

        let ratios: Vec<f64> = seq
            .iter()
            .filter_map(|s| match s.kind {
                KnapsackStep::CalculateRatio { ratio, .. } => Some(ratio),
                _ => None,
            })
            .collect();
        assert_eq!(ratios, vec![6.0, 5.0, 4.0]);

        let takes: Vec<&KnapsackStep> = seq
            .iter()
            .map(|s| &s.kind)
            .filter(|k| matches!(k, KnapsackStep::TakeWhole { .. } | KnapsackStep::TakeFraction { .. }))
            .collect();
        assert_eq!(takes.len(), 3);
        assert!(matches!(takes[0], KnapsackStep::TakeWhole { index: 0, .. }));
        assert!(matches!(takes[1], KnapsackStep::TakeWhole { index: 1, .. }));
        match takes[2] {
            KnapsackStep::TakeFraction {
                index,
                fraction,
                weight,
                value,
            } => {
                assert_eq!(*index, 2);
                assert!((fraction - 2.0 / 3.0).abs() < EPS);
                assert!((weight - 20.0).abs() < EPS);
                assert!((value - 80.0).abs() < EPS);
            }
            other => panic!("expected a fractional take, got {other:?}"),
        }

        match seq.last().map(|s| &s.kind) {
            Some(KnapsackStep::Complete {
                total_value,
                total_weight,
            }) => {
                assert!((total_value - 240.0).abs() < EPS);
                assert!((total_weight - 50.0).abs() < EPS);
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_step_layout() {
        let seq = FractionalKnapsack::generate(&classic());
        // show + 3 ratios + sort + 3 takes + complete
        assert_eq!(seq.len(), 9);
        assert_eq!(seq.get(4).and_then(|s| s.source_line), Some("sort"));
    }

    #[test]
    fn test_stops_when_exactly_full() {
        let dataset = KnapsackDataset::new(
            30,
            vec![Item::new("A", 60, 10), Item::new("B", 100, 20), Item::new("C", 10, 5)],
        );
        let seq = FractionalKnapsack::generate(&dataset);
        let takes = seq
            .iter()
            .filter(|s| matches!(s.kind, KnapsackStep::TakeWhole { .. } | KnapsackStep::TakeFraction { .. }))
            .count();
        assert_eq!(takes, 2);
        let state = reconstruct::<FractionalKnapsack>(&seq, seq.len());
        assert!((state.total_weight - 30.0).abs() < EPS);
        assert!(state.remaining() < EPS);
    }

    #[test]
    fn test_everything_fits() {
        let dataset = KnapsackDataset::new(100, vec![Item::new("A", 5, 10), Item::new("B", 9, 3)]);
        let seq = FractionalKnapsack::generate(&dataset);
        assert!(seq.iter().all(|s| !matches!(s.kind, KnapsackStep::TakeFraction { .. })));
        assert_eq!(
            seq.last().and_then(|s| FractionalKnapsack::completion_total(&s.kind)),
            Some(14.0)
        );
    }

    #[test]
    fn test_zero_capacity_takes_nothing() {
        let dataset = KnapsackDataset::new(0, vec![Item::new("A", 5, 10)]);
        let seq = FractionalKnapsack::generate(&dataset);
        assert!(seq
            .iter()
            .all(|s| !matches!(s.kind, KnapsackStep::TakeWhole { .. } | KnapsackStep::TakeFraction { .. })));
        assert_eq!(
            seq.last().and_then(|s| FractionalKnapsack::completion_total(&s.kind)),
            Some(0.0)
        );
    }

    #[test]
    fn test_ratio_ties_keep_input_order() {
        let dataset = KnapsackDataset::new(10, vec![Item::new("A", 10, 5), Item::new("B", 4, 2)]);
        let seq = FractionalKnapsack::generate(&dataset);
        assert!(seq
            .iter()
            .any(|s| s.kind == KnapsackStep::Sort { order: vec![0, 1] }));
    }

    #[test]
    fn test_replayed_state() {
        let seq = FractionalKnapsack::generate(&classic());

        let after_ratios = reconstruct::<FractionalKnapsack>(&seq, 4);
        assert_eq!(after_ratios.ratios, vec![Some(6.0), Some(5.0), Some(4.0)]);
        assert!(after_ratios.order.is_empty());

        let done = reconstruct::<FractionalKnapsack>(&seq, seq.len());
        assert_eq!(done.order, vec![0, 1, 2]);
        assert!((done.fraction_of(0) - 1.0).abs() < EPS);
        assert!((done.fraction_of(2) - 2.0 / 3.0).abs() < EPS);
        assert!((done.total_value - 240.0).abs() < EPS);
        assert_eq!(done, reconstruct::<FractionalKnapsack>(&seq, seq.len() - 1));
    }

    #[test]
    fn test_empty_dataset_yields_empty_sequence() {
        assert!(FractionalKnapsack::generate(&KnapsackDataset::new(50, vec![])).is_empty());
    }

    #[test]
    fn test_random_dataset_respects_ranges() {
        let config = DatasetsConfig::default();
        let mut rng = VizRng::new(9);
        for _ in 0..50 {
            let dataset = FractionalKnapsack::random_dataset(&mut rng, &config);
            assert!((4..=9).contains(&dataset.items.len()));
            assert!((30..=109).contains(&dataset.capacity));
            for item in &dataset.items {
                assert!((20..=169).contains(&item.value));
                assert!((5..=44).contains(&item.weight));
            }
        }
    }

    #[test]
    fn test_validate_rejects_zero_weight() {
        let dataset = KnapsackDataset::new(10, vec![Item::new("Z", 3, 0)]);
        assert!(matches!(
            FractionalKnapsack::validate_dataset(&dataset),
            Err(VizError::Dataset { .. })
        ));
        assert!(FractionalKnapsack::validate_dataset(&classic()).is_ok());
    }
}
