//! Prim's minimum spanning tree, grown from vertex 0.
//!
//! Keys start at +∞ (`None`). Each round adds the not-yet-included vertex with
//! the smallest finite key (linear scan, first found wins ties), records the
//! edge to its parent, then relaxes incident edges in edge-list order. Growth
//! stops when every vertex is in the tree or no remaining vertex is reachable.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::config::{DatasetsConfig, LayoutConfig};
use crate::demos::label;
use crate::engine::step::StepRecorder;
use crate::engine::{AlgorithmKind, GreedyAlgorithm, PseudoLine, StepSequence, VizRng};
use crate::error::{VizError, VizResult};

/// A labelled vertex with layout coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vertex {
    /// Display label.
    pub label: String,
    /// Layout x.
    #[serde(default)]
    pub x: f64,
    /// Layout y.
    #[serde(default)]
    pub y: f64,
}

impl Vertex {
    /// Create a vertex.
    #[must_use]
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }
}

/// An undirected weighted edge between vertex indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Edge {
    /// One endpoint.
    pub from: usize,
    /// Other endpoint.
    pub to: usize,
    /// Edge weight.
    pub weight: u32,
}

impl Edge {
    /// Create an edge.
    #[must_use]
    pub const fn new(from: usize, to: usize, weight: u32) -> Self {
        Self { from, to, weight }
    }

    /// The endpoint opposite `vertex`, if the edge touches it.
    #[must_use]
    pub const fn other(&self, vertex: usize) -> Option<usize> {
        if self.from == vertex {
            Some(self.to)
        } else if self.to == vertex {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Weighted undirected graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDataset {
    /// Vertices; index 0 is the start vertex.
    pub vertices: Vec<Vertex>,
    /// Edges in relaxation order.
    pub edges: Vec<Edge>,
}

impl GraphDataset {
    /// Create a dataset.
    #[must_use]
    pub const fn new(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    /// `count` vertices labelled `A`, `B`, … placed on `layout`'s circle.
    #[must_use]
    pub fn circular(count: usize, edges: Vec<Edge>, layout: &LayoutConfig) -> Self {
        let mut graph = Self::new(
            (0..count).map(|i| Vertex::new(label(i), 0.0, 0.0)).collect(),
            edges,
        );
        graph.apply_layout(layout);
        graph
    }

    /// Place the vertices evenly on `layout`'s circle, in index order.
    #[allow(clippy::cast_precision_loss)]
    pub fn apply_layout(&mut self, layout: &LayoutConfig) {
        let n = self.vertices.len().max(1) as f64;
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let angle = TAU * i as f64 / n;
            vertex.x = layout.radius.mul_add(angle.cos(), layout.center_x);
            vertex.y = layout.radius.mul_add(angle.sin(), layout.center_y);
        }
    }

    /// Whether every vertex sits at the origin (no layout supplied).
    #[must_use]
    pub fn lacks_layout(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.x.abs() < f64::EPSILON && v.y.abs() < f64::EPSILON)
    }

    fn label_of(&self, index: usize) -> &str {
        self.vertices.get(index).map_or("?", |v| v.label.as_str())
    }
}

/// Recorded decision points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimStep {
    /// All keys +∞, no parents.
    Init {
        /// Copy of the vertices.
        vertices: Vec<Vertex>,
        /// Copy of the edges.
        edges: Vec<Edge>,
    },
    /// Vertex 0 gets key 0.
    StartVertex {
        /// Start vertex.
        vertex: usize,
    },
    /// Move the minimum-key vertex into the tree.
    AddVertex {
        /// Vertex added.
        vertex: usize,
        /// Its key at the time.
        key: u32,
    },
    /// Record the edge joining the new vertex to its parent.
    AddEdge {
        /// Parent, already in the tree.
        from: usize,
        /// Vertex just added.
        to: usize,
        /// Edge weight.
        weight: u32,
    },
    /// Lower a neighbour's key through the new vertex.
    UpdateKey {
        /// Neighbour updated.
        vertex: usize,
        /// New key.
        key: u32,
        /// New parent.
        parent: usize,
        /// Key before the update, `None` for +∞.
        previous: Option<u32>,
    },
    /// Summary.
    Complete {
        /// Sum of tree edge weights.
        total_weight: u64,
        /// Number of tree edges.
        tree_edges: usize,
        /// Whether every vertex was reached.
        spanning: bool,
    },
}

/// State accumulated by replaying Prim steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrimState {
    /// Vertices shown so far.
    pub vertices: Vec<Vertex>,
    /// Edges shown so far.
    pub edges: Vec<Edge>,
    /// Key per vertex, `None` for +∞.
    pub keys: Vec<Option<u32>>,
    /// Parent per vertex.
    pub parents: Vec<Option<usize>>,
    /// Vertices in the tree, in the order they were added.
    pub in_tree: Vec<usize>,
    /// Tree edges in the order they were added.
    pub tree_edges: Vec<Edge>,
    /// Sum of tree edge weights.
    pub total_weight: u64,
}

impl PrimState {
    /// Whether `vertex` is in the tree.
    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        self.in_tree.contains(&vertex)
    }

    /// Whether `edge` is a tree edge (either orientation).
    #[must_use]
    pub fn is_tree_edge(&self, edge: &Edge) -> bool {
        self.tree_edges.iter().any(|t| {
            (t.from == edge.from && t.to == edge.to) || (t.from == edge.to && t.to == edge.from)
        })
    }
}

const PSEUDOCODE: &[PseudoLine] = &[
    PseudoLine::new("init", "for v in V: key[v] ← ∞; parent[v] ← none"),
    PseudoLine::new("start", "key[start] ← 0"),
    PseudoLine::new("extract", "while some v ∉ T has finite key: u ← argmin key; T ← T ∪ {u}"),
    PseudoLine::new("edge", "  if parent[u]: add edge (parent[u], u)"),
    PseudoLine::new("relax", "  for (u, v, w) in E, v ∉ T, w < key[v]: key[v] ← w; parent[v] ← u"),
    PseudoLine::new("done", "return tree"),
];

/// Prim's algorithm with a linear-scan minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prim;

impl GreedyAlgorithm for Prim {
    type Dataset = GraphDataset;
    type Kind = PrimStep;
    type State = PrimState;

    const KIND: AlgorithmKind = AlgorithmKind::Prim;

    fn pseudocode() -> &'static [PseudoLine] {
        PSEUDOCODE
    }

    fn generate(graph: &GraphDataset) -> StepSequence<PrimStep> {
        let n = graph.vertices.len();
        if n == 0 {
            return StepSequence::empty();
        }

        let mut keys: Vec<Option<u32>> = vec![None; n];
        let mut parents: Vec<Option<usize>> = vec![None; n];
        let mut included = vec![false; n];
        let mut total_weight: u64 = 0;
        let mut tree_edges = 0;

        let mut steps = StepRecorder::new();
        steps.push(
            PrimStep::Init {
                vertices: graph.vertices.clone(),
                edges: graph.edges.clone(),
            },
            "Set every key to ∞ and every parent to none.",
            "init",
        );

        keys[0] = Some(0);
        steps.push(
            PrimStep::StartVertex { vertex: 0 },
            format!("Start from vertex {} with key 0.", graph.label_of(0)),
            "start",
        );

        while let Some((u, key)) = min_key_vertex(&keys, &included) {
            included[u] = true;
            steps.push(
                PrimStep::AddVertex { vertex: u, key },
                format!(
                    "Add vertex {} to the tree (minimum key {key}).",
                    graph.label_of(u)
                ),
                "extract",
            );

            if let Some(parent) = parents[u] {
                total_weight += u64::from(key);
                tree_edges += 1;
                steps.push(
                    PrimStep::AddEdge {
                        from: parent,
                        to: u,
                        weight: key,
                    },
                    format!(
                        "Add edge {}-{} (weight {key}) to the tree.",
                        graph.label_of(parent),
                        graph.label_of(u)
                    ),
                    "edge",
                );
            }

            for edge in &graph.edges {
                let Some(v) = edge.other(u) else { continue };
                if v >= n || included[v] {
                    continue;
                }
                let previous = keys[v];
                if previous.is_some_and(|k| edge.weight >= k) {
                    continue;
                }
                keys[v] = Some(edge.weight);
                parents[v] = Some(u);
                steps.push(
                    PrimStep::UpdateKey {
                        vertex: v,
                        key: edge.weight,
                        parent: u,
                        previous,
                    },
                    format!(
                        "Update key of {} from {} to {} (parent {}).",
                        graph.label_of(v),
                        previous.map_or_else(|| "∞".to_string(), |k| k.to_string()),
                        edge.weight,
                        graph.label_of(u)
                    ),
                    "relax",
                );
            }
        }

        let reached = tree_edges + 1;
        let spanning = reached == n;
        let description = if spanning {
            format!("Done. Minimum spanning tree weight: {total_weight}.")
        } else {
            format!(
                "Done. Only {reached} of {n} vertices are reachable from {}; tree weight: {total_weight}.",
                graph.label_of(0)
            )
        };
        steps.push(
            PrimStep::Complete {
                total_weight,
                tree_edges,
                spanning,
            },
            description,
            "done",
        );
        steps.finish()
    }

    fn apply(state: &mut PrimState, kind: &PrimStep) {
        match kind {
            PrimStep::Init { vertices, edges } => {
                state.vertices.clone_from(vertices);
                state.edges.clone_from(edges);
                state.keys = vec![None; vertices.len()];
                state.parents = vec![None; vertices.len()];
            }
            PrimStep::StartVertex { vertex } => {
                if let Some(key) = state.keys.get_mut(*vertex) {
                    *key = Some(0);
                }
            }
            PrimStep::AddVertex { vertex, .. } => state.in_tree.push(*vertex),
            PrimStep::AddEdge { from, to, weight } => {
                state.tree_edges.push(Edge::new(*from, *to, *weight));
                state.total_weight += u64::from(*weight);
            }
            PrimStep::UpdateKey {
                vertex,
                key,
                parent,
                ..
            } => {
                if let Some(slot) = state.keys.get_mut(*vertex) {
                    *slot = Some(*key);
                }
                if let Some(slot) = state.parents.get_mut(*vertex) {
                    *slot = Some(*parent);
                }
            }
            PrimStep::Complete { .. } => {}
        }
    }

    fn random_dataset(rng: &mut VizRng, ranges: &DatasetsConfig) -> GraphDataset {
        let ranges = &ranges.graph;
        let n = rng.draw(ranges.vertices) as usize;
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.gen_bool(ranges.edge_probability) {
                    let weight = rng.draw(ranges.weight);
                    edges.push(Edge::new(i, j, weight));
                }
            }
        }
        GraphDataset::circular(n, edges, &ranges.layout)
    }

    fn validate_dataset(graph: &GraphDataset) -> VizResult<()> {
        let n = graph.vertices.len();
        for edge in &graph.edges {
            if edge.from >= n || edge.to >= n {
                return Err(VizError::dataset(format!(
                    "edge {}-{} references a vertex outside 0..{n}",
                    edge.from, edge.to
                )));
            }
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn completion_total(kind: &PrimStep) -> Option<f64> {
        match kind {
            PrimStep::Complete { total_weight, .. } => Some(*total_weight as f64),
            _ => None,
        }
    }
}

/// Not-included vertex with the smallest finite key; the first one wins ties.
fn min_key_vertex(keys: &[Option<u32>], included: &[bool]) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (v, (key, &done)) in keys.iter().zip(included).enumerate() {
        if done {
            continue;
        }
        if let Some(k) = *key {
            if best.is_none_or(|(_, b)| k < b) {
                best = Some((v, k));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::reconstruct;

    fn square() -> GraphDataset {
        GraphDataset::circular(
            4,
            vec![
                Edge::new(0, 1, 2),
                Edge::new(0, 2, 3),
                Edge::new(1, 2, 1),
                Edge::new(1, 3, 4),
                Edge::new(2, 3, 5),
            ],
            &LayoutConfig::default(),
        )
    }

    #[test]
    fn test_square_mst() {
        let seq = Prim::generate(&square());
        assert_eq!(seq.len(), 14);
        assert_eq!(
            seq.last().map(|s| &s.kind),
            Some(&PrimStep::Complete {
                total_weight: 7,
                tree_edges: 3,
                spanning: true
            })
        );

        let added: Vec<usize> = seq
            .iter()
            .filter_map(|s| match s.kind {
                PrimStep::AddVertex { vertex, .. } => Some(vertex),
                _ => None,
            })
            .collect();
        assert_eq!(added, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_update_key_is_strict() {
        let seq = Prim::generate(&square());
        // 2-3 (5) never beats 1-3 (4).
        assert!(!seq.iter().any(|s| matches!(
            s.kind,
            PrimStep::UpdateKey { vertex: 3, parent: 2, .. }
        )));
        assert!(seq.iter().any(|s| s.kind
            == PrimStep::UpdateKey {
                vertex: 2,
                key: 1,
                parent: 1,
                previous: Some(3)
            }));
    }

    #[test]
    fn test_first_found_wins_ties() {
        let graph = GraphDataset::circular(
            3,
            vec![Edge::new(0, 2, 4), Edge::new(0, 1, 4)],
            &LayoutConfig::default(),
        );
        let seq = Prim::generate(&graph);
        let second = seq.iter().filter_map(|s| match s.kind {
            PrimStep::AddVertex { vertex, .. } => Some(vertex),
            _ => None,
        });
        assert_eq!(second.collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_disconnected_graph_stops_early() {
        let graph = GraphDataset::circular(
            4,
            vec![Edge::new(0, 1, 3), Edge::new(2, 3, 1)],
            &LayoutConfig::default(),
        );
        let seq = Prim::generate(&graph);
        assert_eq!(
            seq.last().map(|s| &s.kind),
            Some(&PrimStep::Complete {
                total_weight: 3,
                tree_edges: 1,
                spanning: false
            })
        );
        let state = reconstruct::<Prim>(&seq, seq.len());
        assert_eq!(state.in_tree, vec![0, 1]);
        assert_eq!(state.keys[2], None);
    }

    #[test]
    fn test_single_vertex() {
        let graph = GraphDataset::circular(1, vec![], &LayoutConfig::default());
        let seq = Prim::generate(&graph);
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.last().and_then(|s| Prim::completion_total(&s.kind)), Some(0.0));
    }

    #[test]
    fn test_replayed_state() {
        let seq = Prim::generate(&square());

        let initial = reconstruct::<Prim>(&seq, 1);
        assert_eq!(initial.keys, vec![None; 4]);
        assert_eq!(initial.parents, vec![None; 4]);

        let started = reconstruct::<Prim>(&seq, 2);
        assert_eq!(started.keys[0], Some(0));

        let done = reconstruct::<Prim>(&seq, seq.len());
        assert_eq!(done.total_weight, 7);
        assert_eq!(done.tree_edges.len(), 3);
        assert_eq!(done.parents, vec![None, Some(0), Some(1), Some(1)]);
        assert!(done.is_tree_edge(&Edge::new(2, 1, 1)));
        assert!(!done.is_tree_edge(&Edge::new(2, 3, 5)));
        assert!((0..4).all(|v| done.contains(v)));
    }

    #[test]
    fn test_empty_graph_yields_empty_sequence() {
        assert!(Prim::generate(&GraphDataset::default()).is_empty());
    }

    #[test]
    fn test_circular_layout() {
        let graph = GraphDataset::circular(4, vec![], &LayoutConfig::default());
        assert!((graph.vertices[0].x - 650.0).abs() < 1e-9);
        assert!((graph.vertices[0].y - 300.0).abs() < 1e-9);
        assert!((graph.vertices[1].y - 500.0).abs() < 1e-9);
        assert!(!graph.lacks_layout());
        assert_eq!(graph.vertices[3].label, "D");
    }

    #[test]
    fn test_random_dataset_respects_ranges() {
        let config = DatasetsConfig::default();
        let mut rng = VizRng::new(5);
        for _ in 0..50 {
            let graph = Prim::random_dataset(&mut rng, &config);
            assert!((5..=9).contains(&graph.vertices.len()));
            for edge in &graph.edges {
                assert!(edge.from < edge.to);
                assert!((1..=20).contains(&edge.weight));
            }
            assert!(Prim::validate_dataset(&graph).is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_dangling_edge() {
        let graph = GraphDataset::circular(2, vec![Edge::new(0, 5, 1)], &LayoutConfig::default());
        assert!(matches!(
            Prim::validate_dataset(&graph),
            Err(VizError::Dataset { .. })
        ));
    }

    #[test]
    fn test_min_key_vertex() {
        assert_eq!(min_key_vertex(&[None, Some(3), Some(3)], &[false; 3]), Some((1, 3)));
        assert_eq!(min_key_vertex(&[Some(0), None], &[true, false]), None);
    }
}
