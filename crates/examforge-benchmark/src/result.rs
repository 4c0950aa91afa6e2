//! Comparison result types.

use std::fmt;

use examforge_core::SolveStatus;
use examforge_scoring::EvaluationReport;
use examforge_solver::{ExcludedModule, PartitionFailure, PartitionResult};
use serde::{Deserialize, Serialize};

/// How a comparison run solved its modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One engine call over every module and every day.
    Naive,
    /// Semester-band partitions solved independently and merged.
    Intelligent,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Naive => write!(f, "naive"),
            Strategy::Intelligent => write!(f, "intelligent"),
        }
    }
}

/// Metrics of one strategy at one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: Strategy,
    pub status: SolveStatus,
    /// Wall-clock solving time, evaluation excluded.
    pub runtime_ms: f64,
    /// Modules handed to the engine after filtering.
    pub modules: usize,
    /// Modules left out, with reasons.
    pub excluded: Vec<ExcludedModule>,
    pub halls: usize,
    pub evaluation: EvaluationReport,
    /// Per-partition breakdown, intelligent runs only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<PartitionResult>,
    /// Engine failure of a naive run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<PartitionFailure>,
}

impl StrategyRun {
    pub fn is_solved(&self) -> bool {
        self.status.is_solved()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    /// Partitions that produced a solution.
    pub fn solved_groups(&self) -> usize {
        self.groups.iter().filter(|g| g.status.is_solved()).count()
    }
}

/// Both strategies at one catalog prefix size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeComparison {
    /// Requested prefix size.
    pub size: usize,
    pub naive: StrategyRun,
    pub intelligent: StrategyRun,
}

impl SizeComparison {
    /// True when only the decomposed strategy found a timetable.
    pub fn decomposition_wins(&self) -> bool {
        self.intelligent.is_solved() && !self.naive.is_solved()
    }
}

/// Aggregate view of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_modules: usize,
    pub halls: usize,
    pub days: usize,
    pub slots_per_day: u32,
    pub scenarios: usize,
    /// Sizes where the decomposed strategy succeeded and the naive one did not.
    pub decomposition_wins: Vec<usize>,
}

/// Full naive-versus-decomposed comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub summary: ComparisonSummary,
    pub sizes: Vec<SizeComparison>,
}

impl ComparisonReport {
    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a report produced by [`ComparisonReport::to_json`].
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// The comparison at `size`, if it was run.
    pub fn size(&self, size: usize) -> Option<&SizeComparison> {
        self.sizes.iter().find(|s| s.size == size)
    }
}
