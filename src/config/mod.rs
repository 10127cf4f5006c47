//! Configuration system with YAML schema and validation.
//!
//! Bad input is rejected at load time through:
//! - Type-safe configuration structs
//! - Schema validation via `validator` derive rules
//! - Runtime semantic validation (ordered ranges, playback bounds)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::error::{VizError, VizResult};

/// Top-level visualizer configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VizConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Reproducibility settings.
    #[validate(nested)]
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Auto-play timing.
    #[validate(nested)]
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Random dataset generation ranges.
    #[validate(nested)]
    #[serde(default)]
    pub datasets: DatasetsConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl VizConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(path = %path.display(), seed = config.reproducibility.seed, "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> VizResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;

        // Schema rules first, then cross-field rules
        config.validate()?;

        config.validate_semantic()?;

        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> VizResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> VizConfigBuilder {
        VizConfigBuilder::default()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> VizResult<()> {
        self.playback.validate_semantic()?;
        self.datasets.validate_semantic()
    }

    /// Master seed for dataset generation.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.reproducibility.seed
    }
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            reproducibility: ReproducibilityConfig::default(),
            playback: PlaybackConfig::default(),
            datasets: DatasetsConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct VizConfigBuilder {
    seed: Option<u64>,
    interval_ms: Option<u64>,
    datasets: Option<DatasetsConfig>,
}

impl VizConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the auto-play interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    /// Set dataset generation ranges.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // DatasetsConfig doesn't impl Copy
    pub fn datasets(mut self, datasets: DatasetsConfig) -> Self {
        self.datasets = Some(datasets);
        self
    }

    /// Build the configuration.
    ///
    /// The interval is clamped into the configured playback bounds.
    #[must_use]
    pub fn build(self) -> VizConfig {
        let mut config = VizConfig::default();

        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }

        if let Some(interval_ms) = self.interval_ms {
            config.playback.interval_ms = config.playback.clamp_ms(interval_ms);
        }

        if let Some(datasets) = self.datasets {
            config.datasets = datasets;
        }

        config
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReproducibilityConfig {
    /// Master seed for all dataset RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

const fn default_seed() -> u64 {
    42
}

impl Default for ReproducibilityConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

// =============================================================================
// Playback
// =============================================================================

/// Auto-play timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Delay between automatic steps in milliseconds.
    #[validate(range(min = 1))]
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Fastest allowed interval in milliseconds.
    #[validate(range(min = 1))]
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Slowest allowed interval in milliseconds.
    #[validate(range(min = 1))]
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
}

const fn default_interval_ms() -> u64 {
    1000
}

const fn default_min_interval_ms() -> u64 {
    100
}

const fn default_max_interval_ms() -> u64 {
    2000
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            min_interval_ms: default_min_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
        }
    }
}

impl PlaybackConfig {
    /// Configured interval as a [`Duration`].
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Fastest allowed interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Slowest allowed interval.
    #[must_use]
    pub const fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    /// Clamp a millisecond value into `[min_interval_ms, max_interval_ms]`.
    #[must_use]
    pub fn clamp_ms(&self, ms: u64) -> u64 {
        ms.clamp(self.min_interval_ms, self.max_interval_ms.max(self.min_interval_ms))
    }

    fn validate_semantic(&self) -> VizResult<()> {
        if self.min_interval_ms > self.max_interval_ms {
            return Err(VizError::config(format!(
                "playback.min_interval_ms ({}) exceeds playback.max_interval_ms ({})",
                self.min_interval_ms, self.max_interval_ms
            )));
        }
        if !(self.min_interval_ms..=self.max_interval_ms).contains(&self.interval_ms) {
            return Err(VizError::config(format!(
                "playback.interval_ms ({}) outside [{}, {}]",
                self.interval_ms, self.min_interval_ms, self.max_interval_ms
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Dataset ranges
// =============================================================================

/// Inclusive integer range used by the random dataset generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RangeConfig {
    /// Smallest value (inclusive).
    pub min: u32,
    /// Largest value (inclusive).
    pub max: u32,
}

impl RangeConfig {
    /// Create a range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn check(&self, name: &str) -> VizResult<()> {
        if self.min > self.max {
            return Err(VizError::config(format!(
                "{name}: min ({}) exceeds max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Ranges for all three generators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DatasetsConfig {
    /// Activity selection instances.
    #[validate(nested)]
    #[serde(default)]
    pub activity: ActivityRanges,
    /// Fractional knapsack instances.
    #[validate(nested)]
    #[serde(default)]
    pub knapsack: KnapsackRanges,
    /// Weighted graphs for Prim.
    #[validate(nested)]
    #[serde(default)]
    pub graph: GraphRanges,
}

impl DatasetsConfig {
    fn validate_semantic(&self) -> VizResult<()> {
        self.activity.validate_semantic()?;
        self.knapsack.validate_semantic()?;
        self.graph.validate_semantic()
    }
}

/// Activity generation ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ActivityRanges {
    /// Number of activities.
    pub count: RangeConfig,
    /// Start times.
    pub start: RangeConfig,
    /// Durations added to the start time.
    pub duration: RangeConfig,
    /// Latest allowed end time; longer activities are truncated.
    #[validate(range(min = 1))]
    pub horizon: u32,
}

impl Default for ActivityRanges {
    fn default() -> Self {
        Self {
            count: RangeConfig::new(5, 12),
            start: RangeConfig::new(0, 26),
            duration: RangeConfig::new(2, 11),
            horizon: 30,
        }
    }
}

impl ActivityRanges {
    fn validate_semantic(&self) -> VizResult<()> {
        self.count.check("datasets.activity.count")?;
        self.start.check("datasets.activity.start")?;
        self.duration.check("datasets.activity.duration")?;
        if self.duration.min == 0 {
            return Err(VizError::config("datasets.activity.duration.min must be positive"));
        }
        if self.start.max >= self.horizon {
            return Err(VizError::config(format!(
                "datasets.activity.start.max ({}) must be below horizon ({})",
                self.start.max, self.horizon
            )));
        }
        Ok(())
    }
}

/// Knapsack generation ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct KnapsackRanges {
    /// Number of items.
    pub items: RangeConfig,
    /// Knapsack capacity.
    pub capacity: RangeConfig,
    /// Item values.
    pub value: RangeConfig,
    /// Item weights.
    pub weight: RangeConfig,
}

impl Default for KnapsackRanges {
    fn default() -> Self {
        Self {
            items: RangeConfig::new(4, 9),
            capacity: RangeConfig::new(30, 109),
            value: RangeConfig::new(20, 169),
            weight: RangeConfig::new(5, 44),
        }
    }
}

impl KnapsackRanges {
    fn validate_semantic(&self) -> VizResult<()> {
        self.items.check("datasets.knapsack.items")?;
        self.capacity.check("datasets.knapsack.capacity")?;
        self.value.check("datasets.knapsack.value")?;
        self.weight.check("datasets.knapsack.weight")?;
        if self.weight.min == 0 {
            return Err(VizError::config("datasets.knapsack.weight.min must be positive"));
        }
        Ok(())
    }
}

/// Graph generation ranges and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GraphRanges {
    /// Number of vertices.
    pub vertices: RangeConfig,
    /// Probability that any vertex pair is connected.
    #[validate(range(min = 0.0, max = 1.0))]
    pub edge_probability: f64,
    /// Edge weights.
    pub weight: RangeConfig,
    /// Circular layout used for vertex coordinates.
    #[validate(nested)]
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Default for GraphRanges {
    fn default() -> Self {
        Self {
            vertices: RangeConfig::new(5, 9),
            edge_probability: 0.5,
            weight: RangeConfig::new(1, 20),
            layout: LayoutConfig::default(),
        }
    }
}

impl GraphRanges {
    fn validate_semantic(&self) -> VizResult<()> {
        self.vertices.check("datasets.graph.vertices")?;
        self.weight.check("datasets.graph.weight")?;
        if !(0.0..=1.0).contains(&self.edge_probability) {
            return Err(VizError::config(format!(
                "datasets.graph.edge_probability ({}) outside [0, 1]",
                self.edge_probability
            )));
        }
        Ok(())
    }
}

/// Circle on which generated vertices are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Circle center x.
    pub center_x: f64,
    /// Circle center y.
    pub center_y: f64,
    /// Circle radius.
    #[validate(range(min = 0.0))]
    pub radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: 450.0,
            center_y: 300.0,
            radius: 200.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = VizConfig::default();

        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.seed(), 42);
        assert_eq!(config.playback.interval(), Duration::from_millis(1000));
        assert_eq!(config.playback.min_interval(), Duration::from_millis(100));
        assert_eq!(config.playback.max_interval(), Duration::from_millis(2000));
        assert_eq!(config.datasets.knapsack.capacity, RangeConfig::new(30, 109));
    }

    #[test]
    fn test_config_builder() {
        let config = VizConfig::builder().seed(12345).interval_ms(500).build();

        assert_eq!(config.seed(), 12345);
        assert_eq!(config.playback.interval_ms, 500);
    }

    #[test]
    fn test_config_builder_clamps_interval() {
        let config = VizConfig::builder().interval_ms(5).build();
        assert_eq!(config.playback.interval_ms, 100);

        let config = VizConfig::builder().interval_ms(60_000).build();
        assert_eq!(config.playback.interval_ms, 2000);
    }

    #[test]
    fn test_config_builder_datasets() {
        let mut datasets = DatasetsConfig::default();
        datasets.graph.edge_probability = 1.0;
        let config = VizConfig::builder().datasets(datasets).build();
        assert!((config.datasets.graph.edge_probability - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
reproducibility:
  seed: 7
playback:
  interval_ms: 400
";
        let config = VizConfig::from_yaml(yaml);
        assert!(config.is_ok());

        let config = config.ok();
        assert_eq!(config.as_ref().map(VizConfig::seed), Some(7));
        assert_eq!(config.map(|c| c.playback.interval_ms), Some(400));
    }

    #[test]
    fn test_config_empty_yaml_uses_defaults() {
        let config = VizConfig::from_yaml("{}");
        assert_eq!(config.ok(), Some(VizConfig::default()));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let yaml = r"
reproducibility:
  seed: 1
  ieee_strict: true
";
        assert!(VizConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_config_rejects_interval_outside_bounds() {
        let yaml = r"
playback:
  interval_ms: 5000
";
        let err = VizConfig::from_yaml(yaml);
        assert!(matches!(err, Err(VizError::Config { .. })));
    }

    #[test]
    fn test_config_rejects_inverted_playback_bounds() {
        let yaml = r"
playback:
  interval_ms: 500
  min_interval_ms: 900
  max_interval_ms: 300
";
        assert!(VizConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_config_rejects_zero_interval() {
        let yaml = r"
playback:
  interval_ms: 0
  min_interval_ms: 0
";
        assert!(matches!(
            VizConfig::from_yaml(yaml),
            Err(VizError::Validation(_))
        ));
    }

    #[test]
    fn test_config_rejects_inverted_range() {
        let yaml = r"
datasets:
  activity:
    count: { min: 9, max: 3 }
    start: { min: 0, max: 26 }
    duration: { min: 2, max: 11 }
    horizon: 30
";
        let err = VizConfig::from_yaml(yaml);
        assert!(matches!(err, Err(VizError::Config { .. })));
    }

    #[test]
    fn test_config_rejects_start_beyond_horizon() {
        let yaml = r"
datasets:
  activity:
    count: { min: 3, max: 5 }
    start: { min: 0, max: 40 }
    duration: { min: 2, max: 11 }
    horizon: 30
";
        assert!(VizConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_config_rejects_zero_duration() {
        let yaml = r"
datasets:
  activity:
    count: { min: 3, max: 5 }
    start: { min: 0, max: 26 }
    duration: { min: 0, max: 3 }
    horizon: 30
";
        let err = VizConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("duration.min"));
    }

    #[test]
    fn test_config_rejects_zero_weight() {
        let mut config = VizConfig::default();
        config.datasets.knapsack.weight = RangeConfig::new(0, 10);
        assert!(config.validate_semantic().is_err());
    }

    #[test]
    fn test_config_rejects_bad_probability() {
        let yaml = r"
datasets:
  graph:
    vertices: { min: 5, max: 9 }
    edge_probability: 1.5
    weight: { min: 1, max: 20 }
";
        assert!(matches!(
            VizConfig::from_yaml(yaml),
            Err(VizError::Validation(_))
        ));
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = VizConfig::builder().seed(99).build();
        let yaml = config.to_yaml();
        assert!(yaml.is_ok());
        let parsed = yaml.ok().map(|y| VizConfig::from_yaml(&y));
        assert!(matches!(parsed, Some(Ok(ref c)) if *c == config));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = VizConfig::load("/nonexistent/greedyviz.yaml");
        assert!(matches!(err, Err(VizError::Io(_))));
    }

    #[test]
    fn test_playback_clamp() {
        let playback = PlaybackConfig::default();
        assert_eq!(playback.clamp_ms(0), 100);
        assert_eq!(playback.clamp_ms(750), 750);
        assert_eq!(playback.clamp_ms(9_999), 2000);
    }
}
