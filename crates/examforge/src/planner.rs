//! High-level planner entry points.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use examforge_benchmark::{ComparisonHarness, ComparisonReport};
use examforge_config::PlannerConfig;
use examforge_core::{Catalog, Timetable};
use examforge_scoring::{EvaluationReport, Evaluator};
use examforge_solver::{
    DecomposedSolve, DecomposedSolverOrchestrator, FilterOutcome, FirstFitEngine,
    PartitionStrategy, PreconditionFilter, SemesterBandPartitioner, SolverEngine, SubProblem,
};
use tracing::info;

use crate::error::{ExamForgeError, Result};

/// Ties a configuration and an engine to the planner components.
///
/// A planner holds no mutable state: every call recomputes from its
/// arguments, so one planner can serve many catalogs.
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    engine: Arc<dyn SolverEngine>,
    partitioner: SemesterBandPartitioner,
    orchestrator: DecomposedSolverOrchestrator,
    evaluator: Evaluator,
}

impl Planner {
    /// Creates a planner solving with [`FirstFitEngine`] under the
    /// configured engine limits.
    ///
    /// # Errors
    ///
    /// Returns [`ExamForgeError::Config`] if `config` fails
    /// [`PlannerConfig::validate`].
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let engine = Arc::new(FirstFitEngine::from_config(&config.engine));
        Self::with_engine(config, engine)
    }

    /// Creates a planner solving with `engine`.
    ///
    /// # Errors
    ///
    /// Returns [`ExamForgeError::Config`] if `config` fails
    /// [`PlannerConfig::validate`].
    pub fn with_engine(config: PlannerConfig, engine: Arc<dyn SolverEngine>) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, engine))
    }

    /// Loads a TOML or YAML configuration file, chosen by extension.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = PlannerConfig::load(path)?;
        let engine = Arc::new(FirstFitEngine::from_config(&config.engine));
        Ok(Self::assemble(config, engine))
    }

    fn assemble(config: PlannerConfig, engine: Arc<dyn SolverEngine>) -> Self {
        #[cfg(feature = "console")]
        examforge_console::init();

        Self {
            partitioner: SemesterBandPartitioner::from_config(&config),
            orchestrator: DecomposedSolverOrchestrator::new(
                Arc::clone(&engine),
                config.orchestrator.clone(),
            ),
            evaluator: Evaluator::new(&config.evaluation),
            engine,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<dyn SolverEngine> {
        &self.engine
    }

    /// Reads a JSON catalog file.
    pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ExamForgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Catalog::from_json_str(&json)?)
    }

    /// Splits the catalog's modules into schedulable and excluded ones.
    pub fn filter(&self, catalog: &Catalog) -> FilterOutcome {
        PreconditionFilter::new().apply(
            catalog.modules(),
            catalog.halls(),
            catalog.slots_per_day(),
        )
    }

    /// Filters, partitions and solves the catalog band by band.
    ///
    /// Modules whose semester belongs to no band are not solved.
    pub fn solve_decomposed(&self, catalog: &Catalog) -> DecomposedSolve {
        let filtered = self.filter(catalog);
        let groups = self.partitioner.partition(&filtered.kept, catalog.days());
        info!(
            event = "plan",
            modules = filtered.kept.len(),
            excluded = filtered.excluded_count(),
            unpartitioned = self.partitioner.unassigned(&filtered.kept).len(),
            groups = groups.len(),
        );
        self.orchestrator
            .solve(groups, catalog.halls(), catalog.slots_per_day())
    }

    /// Filters and solves the catalog in one engine call over every day.
    pub fn solve_naive(&self, catalog: &Catalog) -> Timetable {
        let filtered = self.filter(catalog);
        let problem = SubProblem::new(
            "naive",
            filtered.kept,
            catalog.halls().to_vec(),
            catalog.days().to_vec(),
            catalog.slots_per_day(),
        );
        self.orchestrator.solve_isolated(&problem).into_timetable()
    }

    /// Evaluates `timetable` against `catalog` with the configured weights.
    pub fn evaluate(&self, timetable: &Timetable, catalog: &Catalog) -> EvaluationReport {
        self.evaluator.evaluate(timetable, catalog)
    }

    /// Compares naive and decomposed solving over the configured size steps.
    pub fn compare(&self, catalog: &Catalog) -> Result<ComparisonReport> {
        let harness = ComparisonHarness::new(Arc::clone(&self.engine), &self.config);
        Ok(harness.run(catalog, &self.config.comparison.size_steps)?)
    }
}

impl Default for Planner {
    fn default() -> Self {
        let config = PlannerConfig::default();
        let engine = Arc::new(FirstFitEngine::from_config(&config.engine));
        Self::assemble(config, engine)
    }
}

/// Evaluates `timetable` against `catalog` with default weights.
pub fn evaluate(timetable: &Timetable, catalog: &Catalog) -> EvaluationReport {
    Evaluator::default().evaluate(timetable, catalog)
}

/// Validates `config` and runs the naive-versus-decomposed comparison.
pub fn compare(catalog: &Catalog, config: &PlannerConfig) -> Result<ComparisonReport> {
    Planner::new(config.clone())?.compare(catalog)
}
