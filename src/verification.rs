//! Independent verification of generated step sequences.
//!
//! Every algorithm's reported total is checked against a ground truth computed
//! by a different method:
//!
//! | Algorithm | Ground truth |
//! |-----------|--------------|
//! | Activity selection | weighted-interval DP over `(end, start)` order |
//! | Fractional knapsack | water-filling over ratio levels |
//! | Prim | Kruskal with union-find, restricted to vertex 0's component |
//!
//! Sequences are also checked for replay equivalence: walking a player forward
//! must show exactly the state a from-scratch reconstruction produces.

use serde::{Deserialize, Serialize};

use crate::config::VizConfig;
use crate::demos::activity::{ActivityDataset, ActivitySelection};
use crate::demos::knapsack::{FractionalKnapsack, KnapsackDataset};
use crate::demos::prim::{GraphDataset, Prim, PrimStep};
use crate::engine::{algorithm_rng, AlgorithmKind, GreedyAlgorithm, StepPlayer, StepSequence};
use crate::replay::{reconstruct, Replay};

/// Tolerance for fractional totals.
pub const TOTAL_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Results
// =============================================================================

/// How much a failed check matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The visualization is wrong if this fails.
    #[default]
    Critical,
    /// Indicates a problem in a secondary field.
    Major,
    /// Informational.
    Minor,
}

/// Outcome of one check on one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check identifier, e.g. `total-matches-ground-truth`.
    pub id: String,
    /// Algorithm checked.
    pub algorithm: AlgorithmKind,
    /// Seed the dataset came from, if any.
    pub seed: Option<u64>,
    /// Whether the check passed.
    pub passed: bool,
    /// Observed value.
    pub actual: f64,
    /// Expected value.
    pub expected: f64,
    /// Human-readable explanation.
    pub message: String,
    /// Severity.
    pub severity: Severity,
}

impl CheckResult {
    fn new(id: &str, algorithm: AlgorithmKind, actual: f64, expected: f64, passed: bool) -> Self {
        Self {
            id: id.to_string(),
            algorithm,
            seed: None,
            passed,
            actual,
            expected,
            message: String::new(),
            severity: Severity::Critical,
        }
    }

    #[must_use]
    fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    const fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Collected results over many datasets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Every check that ran.
    pub results: Vec<CheckResult>,
}

impl VerificationReport {
    /// Number of checks that ran.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of passed checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Failed checks.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Whether every critical check passed.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Critical)
            .all(|r| r.passed)
    }
}

// =============================================================================
// Ground truths
// =============================================================================

/// Maximum number of mutually compatible activities.
///
/// Activities are compatible when one ends at or before the other starts.
#[must_use]
pub fn activity_optimum(dataset: &ActivityDataset) -> usize {
    let mut sorted: Vec<(u32, u32)> = dataset.activities.iter().map(|a| (a.end, a.start)).collect();
    sorted.sort_unstable();

    // best[j] = optimum over the first j activities in sorted order
    let mut best = vec![0usize; sorted.len() + 1];
    for j in 1..=sorted.len() {
        let (_, start) = sorted[j - 1];
        let compatible = sorted[..j - 1].partition_point(|&(end, _)| end <= start);
        best[j] = best[j - 1].max(best[compatible] + 1);
    }
    best[sorted.len()]
}

/// Optimal fractional knapsack value.
///
/// Items sharing a value density form one level; levels are poured in
/// descending density until the capacity runs out.
#[must_use]
pub fn knapsack_optimum(dataset: &KnapsackDataset) -> f64 {
    let mut levels: Vec<(f64, f64, f64)> = Vec::new();
    for item in dataset.items.iter().filter(|i| i.weight > 0) {
        let ratio = item.ratio();
        let weight = f64::from(item.weight);
        let value = f64::from(item.value);
        match levels.iter_mut().find(|(r, _, _)| (*r - ratio).abs() < f64::EPSILON * ratio.max(1.0)) {
            Some(level) => {
                level.1 += weight;
                level.2 += value;
            }
            None => levels.push((ratio, weight, value)),
        }
    }
    levels.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut remaining = f64::from(dataset.capacity);
    let mut total = 0.0;
    for (_, weight, value) in levels {
        if remaining <= 0.0 {
            break;
        }
        let poured = weight.min(remaining);
        total += value * poured / weight;
        remaining -= poured;
    }
    total
}

/// Minimum spanning tree of the component containing vertex 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanningTruth {
    /// Total weight of the tree.
    pub weight: u64,
    /// Whether the tree reaches every vertex.
    pub spanning: bool,
}

/// Kruskal's algorithm restricted to vertex 0's component.
#[must_use]
pub fn spanning_tree_truth(graph: &GraphDataset) -> SpanningTruth {
    let n = graph.vertices.len();
    if n == 0 {
        return SpanningTruth {
            weight: 0,
            spanning: true,
        };
    }

    let mut sets = DisjointSets::new(n);
    let mut edges: Vec<_> = graph.edges.iter().filter(|e| e.from < n && e.to < n).collect();
    edges.sort_by_key(|e| e.weight);

    let mut forest = Vec::new();
    for edge in edges {
        if sets.union(edge.from, edge.to) {
            forest.push(edge);
        }
    }

    let root = sets.find(0);
    let weight = forest
        .iter()
        .filter(|e| sets.find(e.from) == root)
        .map(|e| u64::from(e.weight))
        .sum();
    let spanning = (0..n).all(|v| sets.find(v) == root);
    SpanningTruth { weight, spanning }
}

/// Union-find with path halving and union by size.
#[derive(Debug)]
struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        true
    }
}

// =============================================================================
// Checks
// =============================================================================

/// Algorithm with an independently computed expected total.
pub trait GroundTruth: GreedyAlgorithm {
    /// Expected value of the completion total.
    fn ground_truth(dataset: &Self::Dataset) -> f64;

    /// Algorithm-specific checks beyond the total.
    fn extra_checks(_dataset: &Self::Dataset, _sequence: &StepSequence<Self::Kind>) -> Vec<CheckResult> {
        Vec::new()
    }
}

impl GroundTruth for ActivitySelection {
    fn ground_truth(dataset: &ActivityDataset) -> f64 {
        activity_optimum(dataset) as f64
    }
}

impl GroundTruth for FractionalKnapsack {
    fn ground_truth(dataset: &KnapsackDataset) -> f64 {
        knapsack_optimum(dataset)
    }
}

impl GroundTruth for Prim {
    fn ground_truth(dataset: &GraphDataset) -> f64 {
        spanning_tree_truth(dataset).weight as f64
    }

    fn extra_checks(dataset: &GraphDataset, sequence: &StepSequence<PrimStep>) -> Vec<CheckResult> {
        let Some(PrimStep::Complete { spanning, .. }) = sequence.last().map(|s| &s.kind) else {
            return Vec::new();
        };
        let expected = spanning_tree_truth(dataset).spanning;
        vec![CheckResult::new(
            "spanning-flag",
            Self::KIND,
            f64::from(u8::from(*spanning)),
            f64::from(u8::from(expected)),
            *spanning == expected,
        )
        .message(format!("reported spanning={spanning}, Kruskal says {expected}"))
        .severity(Severity::Major)]
    }
}

/// The completion total equals the ground truth.
#[must_use]
pub fn check_total<A: GroundTruth>(dataset: &A::Dataset, sequence: &StepSequence<A::Kind>) -> CheckResult {
    let expected = A::ground_truth(dataset);
    match sequence.last().and_then(|s| A::completion_total(&s.kind)) {
        Some(actual) => {
            let passed = (actual - expected).abs() <= TOTAL_TOLERANCE * expected.abs().max(1.0);
            CheckResult::new("total-matches-ground-truth", A::KIND, actual, expected, passed)
                .message(format!("reported {actual}, ground truth {expected}"))
        }
        None if sequence.is_empty() => {
            CheckResult::new("total-matches-ground-truth", A::KIND, 0.0, expected, expected == 0.0)
                .message("empty sequence")
        }
        None => CheckResult::new("total-matches-ground-truth", A::KIND, f64::NAN, expected, false)
            .message("sequence does not end with a completion step"),
    }
}

/// Exactly one completion step, at the end, and it leaves the state unchanged.
#[must_use]
pub fn check_completion<A: GreedyAlgorithm>(sequence: &StepSequence<A::Kind>) -> CheckResult {
    let completions = sequence
        .iter()
        .filter(|s| A::completion_total(&s.kind).is_some())
        .count();
    let last_is_complete = sequence.last().is_some_and(|s| A::completion_total(&s.kind).is_some());
    let n = sequence.len();
    let inert = n == 0 || reconstruct::<A>(sequence, n - 1) == reconstruct::<A>(sequence, n);

    let expected = usize::from(n > 0);
    let passed = completions == expected && (n == 0 || last_is_complete) && inert;
    CheckResult::new("single-inert-completion", A::KIND, completions as f64, expected as f64, passed).message(
        format!("{completions} completion step(s), last is completion: {last_is_complete}, inert: {inert}"),
    )
}

/// Walking a player forward shows exactly the reconstructed states.
#[must_use]
pub fn check_replay<A: GreedyAlgorithm>(sequence: &StepSequence<A::Kind>) -> CheckResult {
    let mut player = StepPlayer::<A>::headless();
    player.set_sequence(sequence.clone());

    let incremental: Vec<A::State> = Replay::<A>::new(sequence).collect();
    let mut mismatches = 0usize;
    for k in 0..sequence.len() {
        if k > 0 {
            let _ = player.next();
        }
        let shown = player.state_through_cursor();
        let rebuilt = reconstruct::<A>(sequence, k + 1);
        if shown != rebuilt || incremental.get(k + 1) != Some(&rebuilt) || player.state() != incremental[k] {
            mismatches += 1;
        }
    }
    if reconstruct::<A>(sequence, sequence.len()) != reconstruct::<A>(sequence, sequence.len()) {
        mismatches += 1;
    }

    CheckResult::new("replay-equivalence", A::KIND, mismatches as f64, 0.0, mismatches == 0)
        .message(format!("{mismatches} of {} cursor positions diverged", sequence.len()))
}

/// Run every check for one dataset.
#[must_use]
pub fn verify_dataset<A: GroundTruth>(dataset: &A::Dataset) -> Vec<CheckResult> {
    let sequence = A::generate(dataset);
    let mut results = vec![
        check_total::<A>(dataset, &sequence),
        check_completion::<A>(&sequence),
        check_replay::<A>(&sequence),
    ];
    results.extend(A::extra_checks(dataset, &sequence));
    results
}

fn verify_random<A: GroundTruth>(seed: u64, config: &VizConfig) -> Vec<CheckResult> {
    let mut rng = algorithm_rng(seed, A::KIND);
    let dataset = A::random_dataset(&mut rng, &config.datasets);
    let mut results = verify_dataset::<A>(&dataset);
    for result in &mut results {
        result.seed = Some(seed);
        if !result.passed {
            tracing::warn!(seed, algorithm = %A::KIND, check = %result.id, "{}", result.message);
        }
    }
    results
}

/// Verify the random dataset every algorithm draws for `seed`.
#[must_use]
pub fn verify_seed(seed: u64, config: &VizConfig) -> Vec<CheckResult> {
    AlgorithmKind::ALL
        .into_iter()
        .flat_map(|kind| match kind {
            AlgorithmKind::Activity => verify_random::<ActivitySelection>(seed, config),
            AlgorithmKind::Knapsack => verify_random::<FractionalKnapsack>(seed, config),
            AlgorithmKind::Prim => verify_random::<Prim>(seed, config),
        })
        .collect()
}

/// Verify `count` consecutive seeds starting at `first_seed`.
#[must_use]
pub fn verify_seeds(first_seed: u64, count: u64, config: &VizConfig) -> VerificationReport {
    let results: Vec<CheckResult> = (0..count)
        .flat_map(|i| verify_seed(first_seed.wrapping_add(i), config))
        .collect();
    let report = VerificationReport { results };
    tracing::info!(
        seeds = count,
        checks = report.total(),
        passed = report.passed(),
        "verification finished"
    );
    report
}
