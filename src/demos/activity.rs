//! Activity selection: earliest-finish-first interval scheduling.
//!
//! Activities are sorted by end time (stable, ties keep input order) and
//! scanned once. An activity is selected when it starts at or after the
//! finish of the last selected activity; otherwise it is skipped.

use serde::{Deserialize, Serialize};

use crate::config::DatasetsConfig;
use crate::demos::{join_labels, label};
use crate::engine::step::StepRecorder;
use crate::engine::{AlgorithmKind, GreedyAlgorithm, PseudoLine, StepSequence, VizRng};
use crate::error::{VizError, VizResult};

/// A task occupying the half-open interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Activity {
    /// Display label.
    pub label: String,
    /// Start time.
    pub start: u32,
    /// End time.
    pub end: u32,
}

impl Activity {
    /// Create an activity.
    #[must_use]
    pub fn new(label: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    fn span(&self) -> String {
        format!("{} ({}-{})", self.label, self.start, self.end)
    }
}

/// Activity selection instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityDataset {
    /// Activities in input order.
    pub activities: Vec<Activity>,
}

impl ActivityDataset {
    /// Create a dataset.
    #[must_use]
    pub const fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }
}

/// Recorded decision points. Indices refer to input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityStep {
    /// Present the unsorted input.
    ShowInput {
        /// Copy of the input.
        activities: Vec<Activity>,
    },
    /// Sort by end time.
    Sort {
        /// Input indices in sorted order.
        order: Vec<usize>,
    },
    /// Accept an activity.
    Select {
        /// Input index.
        index: usize,
        /// New last finish time.
        finish: u32,
    },
    /// Reject an activity that overlaps the last selection.
    Skip {
        /// Input index.
        index: usize,
        /// Finish time it conflicts with.
        last_finish: u32,
    },
    /// Summary.
    Complete {
        /// Selected input indices in selection order.
        selected: Vec<usize>,
    },
}

/// State accumulated by replaying activity steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityState {
    /// Input shown so far.
    pub activities: Vec<Activity>,
    /// Sorted order, empty until the sort step.
    pub order: Vec<usize>,
    /// Selected input indices.
    pub selected: Vec<usize>,
    /// Skipped input indices.
    pub skipped: Vec<usize>,
    /// Finish of the last selection, `None` before any selection.
    pub last_finish: Option<u32>,
}

impl ActivityState {
    /// Whether the activity at input index `index` has been decided.
    #[must_use]
    pub fn is_decided(&self, index: usize) -> bool {
        self.selected.contains(&index) || self.skipped.contains(&index)
    }
}

const PSEUDOCODE: &[PseudoLine] = &[
    PseudoLine::new("input", "activities ← input"),
    PseudoLine::new("sort", "sort activities by end time"),
    PseudoLine::new("init", "last_finish ← -∞"),
    PseudoLine::new("loop", "for a in activities:"),
    PseudoLine::new("select", "  if a.start ≥ last_finish: select a; last_finish ← a.end"),
    PseudoLine::new("skip", "  else: skip a"),
    PseudoLine::new("done", "return selected"),
];

/// Earliest-finish-first activity selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivitySelection;

impl GreedyAlgorithm for ActivitySelection {
    type Dataset = ActivityDataset;
    type Kind = ActivityStep;
    type State = ActivityState;

    const KIND: AlgorithmKind = AlgorithmKind::Activity;

    fn pseudocode() -> &'static [PseudoLine] {
        PSEUDOCODE
    }

    fn generate(dataset: &ActivityDataset) -> StepSequence<ActivityStep> {
        let activities = &dataset.activities;
        if activities.is_empty() {
            return StepSequence::empty();
        }

        let mut steps = StepRecorder::new();
        steps.push(
            ActivityStep::ShowInput {
                activities: activities.clone(),
            },
            format!(
                "Here are {} activities, each with a start and an end time.",
                activities.len()
            ),
            "input",
        );

        let mut order: Vec<usize> = (0..activities.len()).collect();
        order.sort_by_key(|&i| activities[i].end);
        steps.push(
            ActivityStep::Sort {
                order: order.clone(),
            },
            format!(
                "Sort by end time, earliest first: {}.",
                join_labels(order.iter().map(|&i| activities[i].label.as_str()))
            ),
            "sort",
        );

        let mut last_finish: Option<u32> = None;
        let mut selected = Vec::new();
        for &index in &order {
            let activity = &activities[index];
            match last_finish {
                Some(finish) if activity.start < finish => steps.push(
                    ActivityStep::Skip {
                        index,
                        last_finish: finish,
                    },
                    format!(
                        "Skip {}: it starts before the last selection finishes at {finish}.",
                        activity.span()
                    ),
                    "skip",
                ),
                _ => {
                    let reason = last_finish.map_or_else(
                        || "it finishes first".to_string(),
                        |finish| format!("it starts at or after {finish}"),
                    );
                    steps.push(
                        ActivityStep::Select {
                            index,
                            finish: activity.end,
                        },
                        format!("Select {}: {reason}.", activity.span()),
                        "select",
                    );
                    last_finish = Some(activity.end);
                    selected.push(index);
                }
            }
        }

        let labels = join_labels(selected.iter().map(|&i| activities[i].label.as_str()));
        let count = selected.len();
        steps.push(
            ActivityStep::Complete { selected },
            format!("Done. Selected {count} activities: {labels}."),
            "done",
        );
        steps.finish()
    }

    fn apply(state: &mut ActivityState, kind: &ActivityStep) {
        match kind {
            ActivityStep::ShowInput { activities } => state.activities.clone_from(activities),
            ActivityStep::Sort { order } => state.order.clone_from(order),
            ActivityStep::Select { index, finish } => {
                state.selected.push(*index);
                state.last_finish = Some(*finish);
            }
            ActivityStep::Skip { index, .. } => state.skipped.push(*index),
            ActivityStep::Complete { .. } => {}
        }
    }

    fn random_dataset(rng: &mut VizRng, ranges: &DatasetsConfig) -> ActivityDataset {
        let ranges = &ranges.activity;
        let count = rng.draw(ranges.count) as usize;
        let activities = (0..count)
            .map(|i| {
                let start = rng.draw(ranges.start);
                let duration = rng.draw(ranges.duration);
                let end = start.saturating_add(duration).min(ranges.horizon).max(start);
                Activity::new(label(i), start, end)
            })
            .collect();
        ActivityDataset::new(activities)
    }

    fn validate_dataset(dataset: &ActivityDataset) -> VizResult<()> {
        for activity in &dataset.activities {
            if activity.end <= activity.start {
                return Err(VizError::dataset(format!(
                    "activity {} must end after it starts (start {}, end {})",
                    activity.label, activity.start, activity.end
                )));
            }
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn completion_total(kind: &ActivityStep) -> Option<f64> {
        match kind {
            ActivityStep::Complete { selected } => Some(selected.len() as f64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::reconstruct;

    fn lecture_halls() -> ActivityDataset {
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

    fn selected_labels(dataset: &ActivityDataset, seq: &StepSequence<ActivityStep>) -> Vec<String> {
        seq.iter()
            .filter_map(|s| match s.kind {
                ActivityStep::Select { index, .. } => Some(dataset.activities[index].label.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_classic_selection() {
        let dataset = lecture_halls();
        let seq = ActivitySelection::generate(&dataset);

        assert_eq!(seq.len(), 11);
        assert!(matches!(seq.get(0).map(|s| &s.kind), Some(ActivityStep::ShowInput { .. })));
        assert_eq!(selected_labels(&dataset, &seq), vec!["A", "D", "H"]);
        assert_eq!(
            seq.last().map(|s| s.description.as_str()),
            Some("Done. Selected 3 activities: A, D, H.")
        );
        assert_eq!(
            seq.last().and_then(|s| ActivitySelection::completion_total(&s.kind)),
            Some(3.0)
        );
    }

    #[test]
    fn test_one_decision_per_activity_in_end_order() {
        let dataset = lecture_halls();
        let seq = ActivitySelection::generate(&dataset);

        let decided: Vec<usize> = seq
            .iter()
            .filter_map(|s| match s.kind {
                ActivityStep::Select { index, .. } | ActivityStep::Skip { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(decided, vec![0, 1, 2, 3, 4, 5, 6, 7]);

        let ends: Vec<u32> = decided.iter().map(|&i| dataset.activities[i].end).collect();
        assert!(ends.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sort_is_stable() {
        let dataset = ActivityDataset::new(vec![
            Activity::new("A", 2, 9),
            Activity::new("B", 0, 5),
            Activity::new("C", 1, 5),
        ]);
        let seq = ActivitySelection::generate(&dataset);
        assert_eq!(
            seq.get(1).map(|s| &s.kind),
            Some(&ActivityStep::Sort {
                order: vec![1, 2, 0]
            })
        );
    }

    #[test]
    fn test_touching_intervals_are_compatible() {
        let dataset = ActivityDataset::new(vec![Activity::new("A", 0, 3), Activity::new("B", 3, 6)]);
        let seq = ActivitySelection::generate(&dataset);
        assert_eq!(selected_labels(&dataset, &seq), vec!["A", "B"]);
    }

    #[test]
    fn test_skip_records_conflict() {
        let dataset = lecture_halls();
        let seq = ActivitySelection::generate(&dataset);
        let skip = seq.iter().find(|s| matches!(s.kind, ActivityStep::Skip { .. }));
        assert_eq!(
            skip.map(|s| &s.kind),
            Some(&ActivityStep::Skip {
                index: 1,
                last_finish: 4
            })
        );
        assert_eq!(skip.and_then(|s| s.source_line), Some("skip"));
    }

    #[test]
    fn test_empty_dataset_yields_empty_sequence() {
        let seq = ActivitySelection::generate(&ActivityDataset::default());
        assert!(seq.is_empty());
    }

    #[test]
    fn test_replayed_state() {
        let dataset = lecture_halls();
        let seq = ActivitySelection::generate(&dataset);

        let after_sort = reconstruct::<ActivitySelection>(&seq, 2);
        assert_eq!(after_sort.activities.len(), 8);
        assert_eq!(after_sort.order.len(), 8);
        assert!(after_sort.selected.is_empty());
        assert_eq!(after_sort.last_finish, None);

        let done = reconstruct::<ActivitySelection>(&seq, seq.len());
        assert_eq!(done.selected, vec![0, 3, 7]);
        assert_eq!(done.skipped.len(), 5);
        assert_eq!(done.last_finish, Some(11));
        assert!((0..8).all(|i| done.is_decided(i)));

        // The summary step does not change the state.
        assert_eq!(done, reconstruct::<ActivitySelection>(&seq, seq.len() - 1));
    }

    #[test]
    fn test_source_lines_exist_in_pseudocode() {
        let seq = ActivitySelection::generate(&lecture_halls());
        let labels: Vec<&str> = ActivitySelection::pseudocode().iter().map(|l| l.label).collect();
        for step in &seq {
            assert!(step.source_line.is_some_and(|l| labels.contains(&l)));
        }
    }

    #[test]
    fn test_random_dataset_respects_ranges() {
        let config = DatasetsConfig::default();
        let mut rng = VizRng::new(42);
        for _ in 0..50 {
            let dataset = ActivitySelection::random_dataset(&mut rng, &config);
            assert!((5..=12).contains(&dataset.activities.len()));
            for a in &dataset.activities {
                assert!(a.start <= 26);
                assert!(a.end >= a.start + 2);
                assert!(a.end <= 30);
            }
            assert!(ActivitySelection::validate_dataset(&dataset).is_ok());
        }
    }

    #[test]
    fn test_validate_rejects_reversed_interval() {
        let dataset = ActivityDataset::new(vec![Activity::new("Q", 9, 2)]);
        let err = ActivitySelection::validate_dataset(&dataset);
        assert!(matches!(err, Err(VizError::Dataset { ref message }) if message.contains('Q')));
    }

    #[test]
    fn test_validate_rejects_zero_length() {
        let dataset = ActivityDataset::new(vec![Activity::new("X", 5, 5), Activity::new("Y", 3, 5)]);
        let err = ActivitySelection::validate_dataset(&dataset);
        assert!(matches!(err, Err(VizError::Dataset { ref message }) if message.contains('X')));
    }
}
