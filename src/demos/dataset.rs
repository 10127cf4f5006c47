//! Dataset files.
//!
//! YAML-first instances: a dataset can be dumped with `greedyviz generate`,
//! edited by hand and replayed with `greedyviz run --dataset`.
//!
//! # Example YAML
//!
//! ```yaml
//! algorithm: knapsack
//! capacity: 50
//! items:
//!   - { label: A, value: 60, weight: 10 }
//!   - { label: B, value: 100, weight: 20 }
//!   - { label: C, value: 120, weight: 30 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{DatasetsConfig, LayoutConfig};
use crate::demos::activity::{ActivityDataset, ActivitySelection};
use crate::demos::knapsack::{FractionalKnapsack, KnapsackDataset};
use crate::demos::prim::{GraphDataset, Prim};
use crate::engine::{AlgorithmKind, GreedyAlgorithm, VizRng};
use crate::error::VizResult;

/// A fixed instance for one algorithm, tagged by `algorithm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum DatasetFile {
    /// Activity selection instance.
    Activity(ActivityDataset),
    /// Fractional knapsack instance.
    Knapsack(KnapsackDataset),
    /// Graph for Prim.
    Prim(GraphDataset),
}

impl DatasetFile {
    /// Parse and validate a dataset from YAML.
    ///
    /// Graph vertices given without coordinates are placed on the default
    /// circular layout.
    ///
    /// # Errors
    ///
    /// Returns error if parsing fails or the instance is invalid.
    pub fn from_yaml(yaml: &str) -> VizResult<Self> {
        let mut file: Self = serde_yaml::from_str(yaml)?;
        file.validate()?;
        if let Self::Prim(graph) = &mut file {
            if graph.lacks_layout() {
                graph.apply_layout(&LayoutConfig::default());
            }
        }
        Ok(file)
    }

    /// Load a dataset file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), algorithm = %file.kind(), "loaded dataset");
        Ok(file)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> VizResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Which algorithm the instance is for.
    #[must_use]
    pub const fn kind(&self) -> AlgorithmKind {
        match self {
            Self::Activity(_) => AlgorithmKind::Activity,
            Self::Knapsack(_) => AlgorithmKind::Knapsack,
            Self::Prim(_) => AlgorithmKind::Prim,
        }
    }

    /// Check instance invariants.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Dataset`](crate::error::VizError::Dataset) naming
    /// the offending element.
    pub fn validate(&self) -> VizResult<()> {
        match self {
            Self::Activity(d) => ActivitySelection::validate_dataset(d),
            Self::Knapsack(d) => FractionalKnapsack::validate_dataset(d),
            Self::Prim(d) => Prim::validate_dataset(d),
        }
    }
}

/// Draw a random instance of `kind` within `ranges`.
#[must_use]
pub fn generate_random_dataset(
    kind: AlgorithmKind,
    rng: &mut VizRng,
    ranges: &DatasetsConfig,
) -> DatasetFile {
    match kind {
        AlgorithmKind::Activity => {
            DatasetFile::Activity(ActivitySelection::random_dataset(rng, ranges))
        }
        AlgorithmKind::Knapsack => {
            DatasetFile::Knapsack(FractionalKnapsack::random_dataset(rng, ranges))
        }
        AlgorithmKind::Prim => DatasetFile::Prim(Prim::random_dataset(rng, ranges)),
    }
}
