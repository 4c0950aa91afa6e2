//! Configuration system for ExamForge.
//!
//! Load planner configuration from TOML or YAML files to control semester
//! bands, day slicing, partition concurrency and evaluation weights without
//! code changes. A `PlannerConfig` is a plain value: construct it once and
//! pass it to each component.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use examforge_config::{DaySlicing, PlannerConfig, ThreadCount};
//! use std::time::Duration;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     [[bands]]
//!     name = "first_year"
//!     semesters = [1, 2]
//!
//!     [[bands]]
//!     name = "later_years"
//!     semesters = [3, 4, 5, 6, 7]
//!
//!     [day_slicing]
//!     mode = "overlapping"
//!     overlap_days = 1
//!
//!     [orchestrator]
//!     thread_count = { count = 2 }
//!     partition_timeout_secs = 30
//! "#).unwrap();
//!
//! assert_eq!(config.bands.len(), 2);
//! assert_eq!(config.day_slicing, DaySlicing::Overlapping { overlap_days: 1 });
//! assert_eq!(config.orchestrator.thread_count, ThreadCount::Count(2));
//! assert_eq!(config.orchestrator.partition_timeout(), Some(Duration::from_secs(30)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use examforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! assert_eq!(config.bands.len(), 3);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Semester bands, in day order. Each band receives one contiguous slice of days.
    #[serde(default = "default_bands")]
    pub bands: Vec<BandConfig>,

    /// How band day slices relate to each other.
    #[serde(default)]
    pub day_slicing: DaySlicing,

    /// Partition solving configuration.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Reference engine limits.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Evaluation weights and report limits.
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Naive-vs-decomposed comparison configuration.
    #[serde(default)]
    pub comparison: ComparisonConfig,
}

impl PlannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML or YAML file.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, anything else as
    /// TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, fails to parse, or fails
    /// [`PlannerConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::from_yaml_file(path)
            }
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the semester bands.
    pub fn with_bands(mut self, bands: Vec<BandConfig>) -> Self {
        self.bands = bands;
        self
    }

    /// Sets the day slicing mode.
    pub fn with_day_slicing(mut self, day_slicing: DaySlicing) -> Self {
        self.day_slicing = day_slicing;
        self
    }

    /// Sets the partition worker count.
    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.orchestrator.thread_count = thread_count;
        self
    }

    /// Sets the per-partition timeout.
    pub fn with_partition_timeout_secs(mut self, seconds: u64) -> Self {
        self.orchestrator.partition_timeout_secs = Some(seconds);
        self
    }

    /// Sets the comparison size steps.
    pub fn with_size_steps(mut self, size_steps: Vec<usize>) -> Self {
        self.comparison.size_steps = size_steps;
        self
    }

    /// Checks cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when there are no bands, a band has no
    /// semesters, a semester is zero or appears in two bands, an explicit
    /// thread count is zero, or the partition timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bands.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one semester band is required".to_string(),
            ));
        }

        let mut owners: HashMap<u32, &str> = HashMap::new();
        for band in &self.bands {
            if band.semesters.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "band '{}' lists no semesters",
                    band.name
                )));
            }
            for &semester in &band.semesters {
                if semester == 0 {
                    return Err(ConfigError::Invalid(format!(
                        "band '{}' lists semester 0",
                        band.name
                    )));
                }
                if let Some(other) = owners.insert(semester, &band.name) {
                    return Err(ConfigError::Invalid(format!(
                        "semester {} appears in bands '{}' and '{}'",
                        semester, other, band.name
                    )));
                }
            }
        }

        if self.orchestrator.thread_count == ThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "thread_count must be at least 1".to_string(),
            ));
        }

        if self.orchestrator.partition_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "partition_timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_bands() -> Vec<BandConfig> {
    vec![
        BandConfig::new("lower_semesters", vec![1, 2]),
        BandConfig::new("middle_semesters", vec![3, 4]),
        BandConfig::new("upper_semesters", vec![5, 6, 7]),
    ]
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            day_slicing: DaySlicing::default(),
            orchestrator: OrchestratorConfig::default(),
            engine: EngineConfig::default(),
            evaluation: EvaluationConfig::default(),
            comparison: ComparisonConfig::default(),
        }
    }
}

/// A named group of semesters solved together.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BandConfig {
    /// Band name, used as the partition group name.
    pub name: String,

    /// Semesters that belong to this band.
    pub semesters: Vec<u32>,
}

impl BandConfig {
    pub fn new(name: impl Into<String>, semesters: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            semesters,
        }
    }

    /// Returns true if `semester` belongs to this band.
    pub fn contains(&self, semester: u32) -> bool {
        self.semesters.contains(&semester)
    }
}

/// How band day slices are laid out over the ordered day sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DaySlicing {
    /// Bands receive pairwise disjoint, contiguous day slices.
    #[default]
    Disjoint,

    /// Each band after the first also receives the last `overlap_days` days
    /// of the preceding band's slice as a shared buffer.
    Overlapping { overlap_days: usize },
}

impl fmt::Display for DaySlicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaySlicing::Disjoint => write!(f, "disjoint"),
            DaySlicing::Overlapping { overlap_days } => write!(f, "overlapping({overlap_days})"),
        }
    }
}

/// Worker count configuration for partition solving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// Available CPU cores, capped at the partition count.
    #[default]
    Auto,

    /// All available CPU cores.
    Unlimited,

    /// A specific number of workers, capped at the partition count.
    Count(usize),
}

impl ThreadCount {
    /// Resolves the worker count for `partition_count` partitions.
    ///
    /// Always returns at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use examforge_config::ThreadCount;
    ///
    /// assert_eq!(ThreadCount::Count(4).resolve(10), 4);
    /// assert_eq!(ThreadCount::Count(10).resolve(3), 3);
    /// assert!(ThreadCount::Auto.resolve(100) >= 1);
    /// ```
    pub fn resolve(&self, partition_count: usize) -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1);
        let resolved = match self {
            ThreadCount::Auto => cpus.min(partition_count),
            ThreadCount::Unlimited => cpus,
            ThreadCount::Count(n) => (*n).min(partition_count),
        };
        resolved.max(1)
    }
}

impl fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadCount::Auto => write!(f, "Auto"),
            ThreadCount::Unlimited => write!(f, "Unlimited"),
            ThreadCount::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Partition orchestration configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OrchestratorConfig {
    /// Number of partitions solved concurrently.
    #[serde(default)]
    pub thread_count: ThreadCount,

    /// Maximum seconds one partition may spend in the engine.
    pub partition_timeout_secs: Option<u64>,
}

impl OrchestratorConfig {
    /// Returns the per-partition timeout as a Duration, if any.
    pub fn partition_timeout(&self) -> Option<Duration> {
        self.partition_timeout_secs.map(Duration::from_secs)
    }
}

/// Limits for the reference first-fit engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Maximum number of search nodes (None = unlimited).
    #[serde(default = "default_node_limit")]
    pub node_limit: Option<u64>,

    /// Maximum seconds to spend in one solve.
    pub seconds_spent_limit: Option<u64>,
}

fn default_node_limit() -> Option<u64> {
    Some(200_000)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_limit: default_node_limit(),
            seconds_spent_limit: None,
        }
    }
}

impl EngineConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.seconds_spent_limit.map(Duration::from_secs)
    }
}

/// Evaluation weights and report limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluationConfig {
    /// Number of soft violations kept in the report detail.
    #[serde(default = "default_soft_detail_limit")]
    pub soft_violation_detail_limit: usize,

    /// Accuracy points lost per hard violation.
    #[serde(default = "default_hard_weight")]
    pub hard_weight: u32,

    /// Accuracy points lost per soft violation.
    #[serde(default = "default_soft_weight")]
    pub soft_weight: u32,
}

fn default_soft_detail_limit() -> usize {
    10
}

fn default_hard_weight() -> u32 {
    10
}

fn default_soft_weight() -> u32 {
    1
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            soft_violation_detail_limit: default_soft_detail_limit(),
            hard_weight: default_hard_weight(),
            soft_weight: default_soft_weight(),
        }
    }
}

/// Naive-vs-decomposed comparison configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ComparisonConfig {
    /// Increasing catalog prefix sizes to compare at.
    #[serde(default = "default_size_steps")]
    pub size_steps: Vec<usize>,
}

fn default_size_steps() -> Vec<usize> {
    vec![5, 20, 40, 60, 80, 96]
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            size_steps: default_size_steps(),
        }
    }
}
