//! Immutable step records and the sequences built from them.
//!
//! A [`StepSequence`] is produced in one pass by a generator and never mutated
//! afterwards. Regenerating a dataset discards the whole sequence.

use serde::Serialize;

/// One line of an algorithm's pseudocode listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PseudoLine {
    /// Opaque label referenced by [`Step::source_line`].
    pub label: &'static str,
    /// Display text.
    pub text: &'static str,
}

impl PseudoLine {
    /// Create a pseudocode line.
    #[must_use]
    pub const fn new(label: &'static str, text: &'static str) -> Self {
        Self { label, text }
    }
}

/// A single recorded decision point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step<K> {
    /// Algorithm-specific variant with its payload.
    pub kind: K,
    /// Human-readable narration.
    pub description: String,
    /// Pseudocode label to highlight, if any.
    pub source_line: Option<&'static str>,
}

impl<K> Step<K> {
    /// Create a step.
    #[must_use]
    pub fn new(kind: K, description: impl Into<String>, source_line: Option<&'static str>) -> Self {
        Self {
            kind,
            description: description.into(),
            source_line,
        }
    }
}

/// Ordered, immutable list of steps indexed `0..len()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepSequence<K> {
    steps: Vec<Step<K>>,
}

impl<K> Default for StepSequence<K> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<K> From<Vec<Step<K>>> for StepSequence<K> {
    fn from(steps: Vec<Step<K>>) -> Self {
        Self { steps }
    }
}

impl<K> StepSequence<K> {
    /// Empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step<K>> {
        self.steps.get(index)
    }

    /// Last valid index, `None` when empty.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// Final step, normally the completion summary.
    #[must_use]
    pub fn last(&self) -> Option<&Step<K>> {
        self.steps.last()
    }

    /// All steps as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Step<K>] {
        &self.steps
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step<K>> {
        self.steps.iter()
    }
}

impl<'a, K> IntoIterator for &'a StepSequence<K> {
    type Item = &'a Step<K>;
    type IntoIter = std::slice::Iter<'a, Step<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Collects steps during generation.
#[derive(Debug)]
pub(crate) struct StepRecorder<K> {
    steps: Vec<Step<K>>,
}

impl<K> StepRecorder<K> {
    pub(crate) const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub(crate) fn push(&mut self, kind: K, description: impl Into<String>, line: &'static str) {
        self.steps.push(Step::new(kind, description, Some(line)));
    }

    pub(crate) fn finish(self) -> StepSequence<K> {
        StepSequence::from(self.steps)
    }
}
