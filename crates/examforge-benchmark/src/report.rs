//! Markdown rendering of comparison reports.

use std::fmt;
use std::io::{self, Write};

use crate::result::{ComparisonReport, StrategyRun};

/// Markdown view of a [`ComparisonReport`].
///
/// Renders the summary, one table row per size and the sizes where only the
/// decomposed strategy succeeded.
///
/// # Example
///
/// ```
/// use examforge_benchmark::{ComparisonReport, ComparisonSummary, MarkdownReport};
///
/// let report = ComparisonReport {
///     summary: ComparisonSummary {
///         total_modules: 0,
///         halls: 1,
///         days: 5,
///         slots_per_day: 2,
///         scenarios: 0,
///         decomposition_wins: vec![],
///     },
///     sizes: vec![],
/// };
///
/// let md = MarkdownReport::new(&report).to_string();
/// assert!(md.starts_with("# Exam Scheduling Comparison"));
/// assert!(md.contains("*No scenarios run.*"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarkdownReport<'a> {
    report: &'a ComparisonReport,
}

impl<'a> MarkdownReport<'a> {
    pub fn new(report: &'a ComparisonReport) -> Self {
        Self { report }
    }

    /// Writes the Markdown report to a writer.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

fn cell(run: &StrategyRun) -> String {
    format!(
        "{} | {:.2} | {} | {}",
        run.status, run.runtime_ms, run.evaluation.hard_violation_count, run.evaluation.accuracy_score
    )
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.report.summary;

        writeln!(f, "# Exam Scheduling Comparison")?;
        writeln!(f)?;
        writeln!(f, "- **Modules**: {}", summary.total_modules)?;
        writeln!(f, "- **Halls**: {}", summary.halls)?;
        writeln!(
            f,
            "- **Grid**: {} days x {} slots",
            summary.days, summary.slots_per_day
        )?;
        writeln!(f, "- **Scenarios**: {}", summary.scenarios)?;
        writeln!(f)?;

        writeln!(f, "## Results")?;
        writeln!(f)?;
        if self.report.sizes.is_empty() {
            writeln!(f, "*No scenarios run.*")?;
        } else {
            writeln!(
                f,
                "| Size | Naive | Time (ms) | Hard | Accuracy | Intelligent | Time (ms) | Hard | Accuracy | Groups Solved |"
            )?;
            writeln!(
                f,
                "|------|-------|-----------|------|----------|-------------|-----------|------|----------|---------------|"
            )?;
            for size in &self.report.sizes {
                writeln!(
                    f,
                    "| {} | {} | {} | {}/{} |",
                    size.size,
                    cell(&size.naive),
                    cell(&size.intelligent),
                    size.intelligent.solved_groups(),
                    size.intelligent.groups.len(),
                )?;
            }
        }
        writeln!(f)?;

        writeln!(f, "## Decomposition Wins")?;
        writeln!(f)?;
        if summary.decomposition_wins.is_empty() {
            writeln!(f, "*None.*")?;
        } else {
            for size in &summary.decomposition_wins {
                writeln!(
                    f,
                    "- {size} modules: intelligent solved, naive INFEASIBLE"
                )?;
            }
        }
        Ok(())
    }
}
