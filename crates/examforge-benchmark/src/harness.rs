//! Naive versus decomposed comparison runner.

use std::sync::Arc;
use std::time::Instant;

use examforge_config::PlannerConfig;
use examforge_core::{Catalog, CatalogError};
use examforge_scoring::Evaluator;
use examforge_solver::{
    DecomposedSolverOrchestrator, ExcludedModule, ExclusionReason, FilterOutcome,
    PartitionStrategy, PreconditionFilter, SemesterBandPartitioner, SolverEngine, SubProblem,
};
use tracing::{info, warn};

use crate::result::{ComparisonReport, ComparisonSummary, SizeComparison, Strategy, StrategyRun};

/// Runs both strategies over growing catalog prefixes.
///
/// Sizes run sequentially so that each strategy's wall-clock time is its
/// own. A failed or infeasible strategy degrades to an infeasible data point;
/// the comparison always continues with the next size.
#[derive(Debug, Clone)]
pub struct ComparisonHarness {
    partitioner: Arc<dyn PartitionStrategy>,
    orchestrator: DecomposedSolverOrchestrator,
    evaluator: Evaluator,
    filter: PreconditionFilter,
}

impl ComparisonHarness {
    /// Creates a harness solving with `engine` and partitioning by the
    /// configured semester bands.
    pub fn new(engine: Arc<dyn SolverEngine>, config: &PlannerConfig) -> Self {
        Self {
            partitioner: Arc::new(SemesterBandPartitioner::from_config(config)),
            orchestrator: DecomposedSolverOrchestrator::new(engine, config.orchestrator.clone()),
            evaluator: Evaluator::new(&config.evaluation),
            filter: PreconditionFilter::new(),
        }
    }

    /// Replaces the partition strategy of the intelligent runs.
    pub fn with_partitioner(mut self, partitioner: Arc<dyn PartitionStrategy>) -> Self {
        self.partitioner = partitioner;
        self
    }

    /// Compares both strategies for each prefix size of `catalog`, in order.
    ///
    /// A size beyond the catalog keeps every module.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] only if a filtered sub-catalog fails
    /// validation, which a valid `catalog` never does.
    pub fn run(
        &self,
        catalog: &Catalog,
        sizes: &[usize],
    ) -> Result<ComparisonReport, CatalogError> {
        info!(
            event = "comparison_start",
            engine = self.orchestrator.engine().name(),
            partitioner = self.partitioner.name(),
            modules = catalog.modules().len(),
            scenarios = sizes.len(),
        );

        let comparisons = sizes
            .iter()
            .map(|&size| self.compare_size(catalog, size))
            .collect::<Result<Vec<_>, _>>()?;

        let decomposition_wins: Vec<usize> = comparisons
            .iter()
            .filter(|c| c.decomposition_wins())
            .map(|c| c.size)
            .collect();
        info!(event = "comparison_end", wins = ?decomposition_wins);

        Ok(ComparisonReport {
            summary: ComparisonSummary {
                total_modules: catalog.modules().len(),
                halls: catalog.halls().len(),
                days: catalog.days().len(),
                slots_per_day: catalog.slots_per_day(),
                scenarios: comparisons.len(),
                decomposition_wins,
            },
            sizes: comparisons,
        })
    }

    /// Runs both strategies on the first `size` modules of `catalog`.
    pub fn compare_size(
        &self,
        catalog: &Catalog,
        size: usize,
    ) -> Result<SizeComparison, CatalogError> {
        let scoped = catalog.prefix(size);
        let filtered = self
            .filter
            .apply(scoped.modules(), scoped.halls(), scoped.slots_per_day());

        let naive = self.run_naive(&scoped, &filtered)?;
        let intelligent = self.run_intelligent(&scoped, &filtered)?;
        info!(
            event = "comparison_size",
            size,
            modules = filtered.kept.len(),
            excluded = filtered.excluded_count(),
            naive = %naive.status,
            naive_ms = naive.runtime_ms,
            intelligent = %intelligent.status,
            intelligent_ms = intelligent.runtime_ms,
        );

        Ok(SizeComparison {
            size,
            naive,
            intelligent,
        })
    }

    fn run_naive(
        &self,
        catalog: &Catalog,
        filtered: &FilterOutcome,
    ) -> Result<StrategyRun, CatalogError> {
        let problem = SubProblem::new(
            "naive",
            filtered.kept.clone(),
            catalog.halls().to_vec(),
            catalog.days().to_vec(),
            catalog.slots_per_day(),
        );

        let start = Instant::now();
        let run = self.orchestrator.solve_isolated(&problem);
        let runtime = start.elapsed();

        let failure = run.failure.clone();
        let timetable = run.into_timetable();
        let evaluation = self
            .evaluator
            .evaluate(&timetable, &catalog.with_modules(filtered.kept.clone())?);

        Ok(StrategyRun {
            strategy: Strategy::Naive,
            status: timetable.status,
            runtime_ms: runtime.as_secs_f64() * 1000.0,
            modules: filtered.kept.len(),
            excluded: filtered.excluded.clone(),
            halls: catalog.halls().len(),
            evaluation,
            groups: Vec::new(),
            failure,
        })
    }

    fn run_intelligent(
        &self,
        catalog: &Catalog,
        filtered: &FilterOutcome,
    ) -> Result<StrategyRun, CatalogError> {
        let mut excluded = filtered.excluded.clone();
        let unassigned = self.partitioner.unassigned(&filtered.kept);
        for module in &unassigned {
            warn!(
                event = "module_unpartitioned",
                module = module.code(),
                semester = module.semester(),
            );
            excluded.push(ExcludedModule {
                code: module.code().to_string(),
                reason: ExclusionReason::NoPartition {
                    semester: module.semester(),
                },
            });
        }
        let partitioned: Vec<_> = filtered
            .kept
            .iter()
            .filter(|m| !unassigned.iter().any(|u| u.code() == m.code()))
            .cloned()
            .collect();

        let start = Instant::now();
        let groups = self.partitioner.partition(&partitioned, catalog.days());
        let solve = self
            .orchestrator
            .solve(groups, catalog.halls(), catalog.slots_per_day());
        let runtime = start.elapsed();

        let modules = partitioned.len();
        let evaluation = self
            .evaluator
            .evaluate(&solve.timetable, &catalog.with_modules(partitioned)?);

        Ok(StrategyRun {
            strategy: Strategy::Intelligent,
            status: solve.timetable.status,
            runtime_ms: runtime.as_secs_f64() * 1000.0,
            modules,
            excluded,
            halls: catalog.halls().len(),
            evaluation,
            groups: solve.groups,
            failure: None,
        })
    }
}

#[cfg(test)]
#[path = "harness_tests.rs"]
mod tests;
