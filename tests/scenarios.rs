//! Worked scenarios walked end to end through the public API.

use greedyviz::demos::activity::ActivityStep;
use greedyviz::demos::knapsack::KnapsackStep;
use greedyviz::demos::prim::PrimStep;
use greedyviz::prelude::*;
use greedyviz::verification::{activity_optimum, knapsack_optimum, spanning_tree_truth};

fn lecture_activities() -> ActivityDataset {
    ActivityDataset::new(vec![
        Activity::new("A", 1, 4),
        Activity::new("B", 3, 5),
        Activity::new("C", 0, 6),
        Activity::new("D", 5, 7),
        Activity::new("E", 3, 9),
        Activity::new("F", 5, 9),
        Activity::new("G", 6, 10),
        Activity::new("H", 8, 11),
    ])
}

fn classic_knapsack() -> KnapsackDataset {
    KnapsackDataset::new(
        50,
        vec![Item::new("A", 60, 10), Item::new("B", 100, 20), Item::new("C", 120, 30)],
    )
}

fn square_graph() -> GraphDataset {
    GraphDataset::new(
        (0..4).map(|i| Vertex::new(greedyviz::demos::label(i), 0.0, 0.0)).collect(),
        vec![
            Edge::new(0, 1, 2),
            Edge::new(0, 2, 3),
            Edge::new(1, 2, 1),
            Edge::new(1, 3, 4),
            Edge::new(2, 3, 5),
        ],
    )
}

// Activity: one Select/Skip per activity in end-time order, result A, D, H.
#[test]
fn activity_lecture_scenario() {
    let steps = ActivitySelection::generate(&lecture_activities());
    assert_eq!(steps.len(), 11);

    let decisions: Vec<(bool, usize)> = steps
        .iter()
        .filter_map(|s| match s.kind {
            ActivityStep::Select { index, .. } => Some((true, index)),
            ActivityStep::Skip { index, .. } => Some((false, index)),
            _ => None,
        })
        .collect();
    assert_eq!(decisions.len(), 8);
    assert_eq!(
        decisions.iter().map(|&(_, i)| i).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4, 5, 6, 7]
    );
    let selected: Vec<usize> = decisions.iter().filter(|d| d.0).map(|d| d.1).collect();
    assert_eq!(selected, vec![0, 3, 7]);

    let state = reconstruct::<ActivitySelection>(&steps, steps.len());
    assert_eq!(state.selected, vec![0, 3, 7]);
    assert_eq!(state.last_finish, Some(11));
    assert_eq!(activity_optimum(&lecture_activities()), 3);
}

// Knapsack: ratios 6, 5, 4; A and B whole, 2/3 of C; weight 50, value 240.
#[test]
fn knapsack_classic_scenario() {
    let steps = FractionalKnapsack::generate(&classic_knapsack());
    assert_eq!(steps.len(), 9);

    let ratios: Vec<f64> = steps
        .iter()
        .filter_map(|s| match s.kind {
            KnapsackStep::CalculateRatio { ratio, .. } => Some(ratio),
            _ => None,
        })
        .collect();
    assert_eq!(ratios, vec![6.0, 5.0, 4.0]);

    match steps.last().map(|s| &s.kind) {
        Some(KnapsackStep::Complete {
            total_value,
            total_weight,
        }) => {
            assert!((total_value - 240.0).abs() < 1e-9);
            assert!((total_weight - 50.0).abs() < 1e-9);
        }
        other => panic!("expected completion, got {other:?}"),
    }

    let state = reconstruct::<FractionalKnapsack>(&steps, steps.len());
    assert!((state.fraction_of(2) - 2.0 / 3.0).abs() < 1e-9);
    assert!((knapsack_optimum(&classic_knapsack()) - 240.0).abs() < 1e-9);
}

// Prim: total weight 7, matching Kruskal.
#[test]
fn prim_square_scenario() {
    let graph = square_graph();
    let steps = Prim::generate(&graph);
    assert_eq!(steps.len(), 14);

    let added: Vec<(usize, usize, u32)> = steps
        .iter()
        .filter_map(|s| match s.kind {
            PrimStep::AddEdge { from, to, weight } => Some((from, to, weight)),
            _ => None,
        })
        .collect();
    assert_eq!(added, vec![(0, 1, 2), (1, 2, 1), (1, 3, 4)]);

    match steps.last().map(|s| &s.kind) {
        Some(PrimStep::Complete {
            total_weight,
            spanning,
            ..
        }) => {
            assert_eq!(*total_weight, 7);
            assert!(*spanning);
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(spanning_tree_truth(&graph).weight, 7);
}

// Every step names a line of its algorithm's pseudocode.
#[test]
fn source_lines_reference_pseudocode() {
    fn check<A: GreedyAlgorithm>(steps: &StepSequence<A::Kind>) {
        for step in steps {
            let label = step.source_line.unwrap();
            assert!(A::pseudocode().iter().any(|l| l.label == label), "unknown label {label}");
        }
    }
    check::<ActivitySelection>(&ActivitySelection::generate(&lecture_activities()));
    check::<FractionalKnapsack>(&FractionalKnapsack::generate(&classic_knapsack()));
    check::<Prim>(&Prim::generate(&square_graph()));
}

// Empty inputs produce empty sequences and a "no data" frame.
#[test]
fn empty_inputs_render_placeholder() {
    assert!(ActivitySelection::generate(&ActivityDataset::default()).is_empty());
    assert!(FractionalKnapsack::generate(&KnapsackDataset::new(10, Vec::new())).is_empty());
    assert!(Prim::generate(&GraphDataset::default()).is_empty());

    let mut player: StepPlayer<Prim, SnapshotSink<Prim>, ManualClock> = StepPlayer::new(
        SnapshotSink::new(),
        ManualClock::new(),
        &VizConfig::default().playback,
    );
    player.set_sequence(Prim::generate(&GraphDataset::default()));
    assert_eq!(player.sink().empty_renders(), 1);
    assert_eq!((player.sink().frame().current, player.sink().frame().total), (0, 0));
    assert!(!player.next());
    assert!(!player.prev());
    assert!(!player.seek(0));
}

// The same seed reproduces the same datasets; different seeds differ.
#[test]
fn seeds_reproduce_datasets() {
    for kind in AlgorithmKind::ALL {
        let a = AnySession::new(kind, VizConfig::builder().seed(42).build(), ManualClock::new());
        let b = AnySession::new(kind, VizConfig::builder().seed(42).build(), ManualClock::new());
        let c = AnySession::new(kind, VizConfig::builder().seed(43).build(), ManualClock::new());
        assert_eq!(a.dataset_file(), b.dataset_file());
        assert_ne!(a.dataset_file(), c.dataset_file());
    }
}
