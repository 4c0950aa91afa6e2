//! Deterministic backtracking reference engine.

use std::time::{Duration, Instant};

use examforge_config::EngineConfig;
use examforge_core::{Module, SolveStatus};
use tracing::debug;

use crate::engine::{Assignment, CancelToken, EngineError, SolverEngine, SolverOutput, SubProblem};

/// First-fit-decreasing search with chronological backtracking.
///
/// Modules are placed largest first (students, then duration, then code).
/// For each module every (day, start slot) is tried in order, preferring
/// placements that add no soft same-department overlap, and the smallest free
/// hall that seats every student is taken. Multi-slot exams block their hall
/// and their groups for all occupied slots.
///
/// The hard rules match the constraint validator: hall exclusivity, hall
/// capacity, department-semester exclusivity, and common modules apart from
/// department modules of the same semester. Two common modules of one
/// semester are also kept apart.
///
/// A proven dead end and an exhausted node or time budget both report
/// [`SolveStatus::Infeasible`]. A found placement is `Optimal` when it has no
/// soft overlap and `Feasible` otherwise.
///
/// # Example
///
/// ```
/// use examforge_core::{Day, Hall, ModuleRecord, SolveStatus};
/// use examforge_solver::{CancelToken, FirstFitEngine, SolverEngine, SubProblem};
///
/// let problem = SubProblem::new(
///     "naive",
///     vec![
///         ModuleRecord::new("CE1101", "CE", 1, 40).build().unwrap(),
///         ModuleRecord::new("CE1102", "CE", 1, 40).build().unwrap(),
///     ],
///     vec![Hall::new("LR1", 50).unwrap()],
///     Day::sequence(1),
///     2,
/// );
///
/// let output = FirstFitEngine::new().solve(&problem, &CancelToken::new()).unwrap();
/// assert_eq!(output.status, SolveStatus::Optimal);
/// assert_eq!(output.assignments[0].slot, 0);
/// assert_eq!(output.assignments[1].slot, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstFitEngine {
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
}

impl FirstFitEngine {
    pub const DEFAULT_NODE_LIMIT: u64 = 200_000;

    pub fn new() -> Self {
        Self {
            node_limit: Some(Self::DEFAULT_NODE_LIMIT),
            time_limit: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            node_limit: config.node_limit,
            time_limit: config.time_limit(),
        }
    }

    /// Caps the number of placements tried. `None` searches exhaustively.
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

impl Default for FirstFitEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverEngine for FirstFitEngine {
    fn solve(
        &self,
        problem: &SubProblem,
        cancel: &CancelToken,
    ) -> Result<SolverOutput, EngineError> {
        let mut search = Search::new(problem, cancel, self.node_limit, self.time_limit);
        let outcome = search.run();
        debug!(
            event = "first_fit",
            problem = %problem.name,
            modules = problem.modules.len(),
            nodes = search.nodes,
            found = matches!(outcome, Ok(true)),
        );

        match outcome {
            Ok(true) => Ok(search.into_output()),
            Ok(false) | Err(Halt::Budget) => Ok(SolverOutput::infeasible()),
            Err(Halt::Cancelled) => Err(EngineError::Cancelled),
        }
    }

    fn name(&self) -> &str {
        "first_fit"
    }
}

enum Halt {
    Budget,
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    day: usize,
    start: usize,
    hall: usize,
    soft: usize,
}

struct Search<'a> {
    problem: &'a SubProblem,
    cancel: &'a CancelToken,
    node_limit: Option<u64>,
    deadline: Option<Instant>,
    nodes: u64,
    slots: usize,
    /// Module indices in placement order.
    order: Vec<usize>,
    /// Hall indices by ascending capacity.
    halls_by_size: Vec<usize>,
    /// Modules occupying each (day, slot) cell.
    occupants: Vec<Vec<usize>>,
    /// Modules starting in each cell.
    starters: Vec<Vec<usize>>,
    hall_busy: Vec<Vec<bool>>,
    placements: Vec<Option<Placement>>,
}

impl<'a> Search<'a> {
    fn new(
        problem: &'a SubProblem,
        cancel: &'a CancelToken,
        node_limit: Option<u64>,
        time_limit: Option<Duration>,
    ) -> Self {
        let modules = &problem.modules;
        let mut order: Vec<usize> = (0..modules.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&modules[a], &modules[b]);
            b.number_of_students()
                .cmp(&a.number_of_students())
                .then(b.duration().cmp(&a.duration()))
                .then(a.code().cmp(b.code()))
        });

        let mut halls_by_size: Vec<usize> = (0..problem.halls.len()).collect();
        halls_by_size.sort_by(|&a, &b| {
            let (a, b) = (&problem.halls[a], &problem.halls[b]);
            a.capacity()
                .cmp(&b.capacity())
                .then(a.name().cmp(b.name()))
        });

        let slots = problem.slots_per_day as usize;
        let cells = problem.days.len() * slots;
        Self {
            problem,
            cancel,
            node_limit,
            deadline: time_limit.map(|limit| Instant::now() + limit),
            nodes: 0,
            slots,
            order,
            halls_by_size,
            occupants: vec![Vec::new(); cells],
            starters: vec![Vec::new(); cells],
            hall_busy: vec![vec![false; problem.halls.len()]; cells],
            placements: vec![None; modules.len()],
        }
    }

    fn run(&mut self) -> Result<bool, Halt> {
        self.place(0)
    }

    fn place(&mut self, depth: usize) -> Result<bool, Halt> {
        let Some(&module) = self.order.get(depth) else {
            return Ok(true);
        };

        for candidate in self.candidates(module) {
            self.tick()?;
            self.apply(module, candidate);
            if self.place(depth + 1)? {
                return Ok(true);
            }
            self.undo(module, candidate);
        }
        Ok(false)
    }

    fn tick(&mut self) -> Result<(), Halt> {
        if self.cancel.is_cancelled() {
            return Err(Halt::Cancelled);
        }
        if self.node_limit.is_some_and(|limit| self.nodes >= limit) {
            return Err(Halt::Budget);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Halt::Budget);
        }
        self.nodes += 1;
        Ok(())
    }

    fn candidates(&self, index: usize) -> Vec<Placement> {
        let module = &self.problem.modules[index];
        let duration = module.duration() as usize;
        if duration > self.slots {
            return Vec::new();
        }

        let mut candidates = Vec::new();
        for day in 0..self.problem.days.len() {
            for start in 0..=self.slots - duration {
                let cells = self.cells(day, start, duration);
                if cells.clone().any(|cell| self.group_clash(module, cell)) {
                    continue;
                }
                let Some(hall) = self.free_hall(module, cells) else {
                    continue;
                };
                let soft = self.soft_overlaps(module, day * self.slots + start);
                candidates.push(Placement {
                    day,
                    start,
                    hall,
                    soft,
                });
            }
        }
        candidates.sort_by_key(|c| c.soft);
        candidates
    }

    fn cells(&self, day: usize, start: usize, duration: usize) -> std::ops::Range<usize> {
        let first = day * self.slots + start;
        first..first + duration
    }

    fn group_clash(&self, module: &Module, cell: usize) -> bool {
        self.occupants[cell]
            .iter()
            .any(|&other| clashes(module, &self.problem.modules[other]))
    }

    fn free_hall(&self, module: &Module, cells: std::ops::Range<usize>) -> Option<usize> {
        self.halls_by_size.iter().copied().find(|&hall| {
            self.problem.halls[hall].fits(module.number_of_students())
                && cells.clone().all(|cell| !self.hall_busy[cell][hall])
        })
    }

    fn soft_overlaps(&self, module: &Module, cell: usize) -> usize {
        if module.department().is_empty() {
            return 0;
        }
        self.starters[cell]
            .iter()
            .map(|&other| &self.problem.modules[other])
            .filter(|other| {
                other.department() == module.department() && other.semester() != module.semester()
            })
            .count()
    }

    fn apply(&mut self, module: usize, placement: Placement) {
        let duration = self.problem.modules[module].duration() as usize;
        for cell in self.cells(placement.day, placement.start, duration) {
            self.occupants[cell].push(module);
            self.hall_busy[cell][placement.hall] = true;
        }
        self.starters[placement.day * self.slots + placement.start].push(module);
        self.placements[module] = Some(placement);
    }

    fn undo(&mut self, module: usize, placement: Placement) {
        let duration = self.problem.modules[module].duration() as usize;
        for cell in self.cells(placement.day, placement.start, duration) {
            self.occupants[cell].retain(|&m| m != module);
            self.hall_busy[cell][placement.hall] = false;
        }
        self.starters[placement.day * self.slots + placement.start].retain(|&m| m != module);
        self.placements[module] = None;
    }

    fn into_output(self) -> SolverOutput {
        let problem = self.problem;
        let mut soft = 0;
        let assignments = problem
            .modules
            .iter()
            .zip(&self.placements)
            .filter_map(|(module, placement)| {
                let p = placement.as_ref()?;
                soft += p.soft;
                Some(Assignment::new(
                    module.code(),
                    problem.days[p.day].clone(),
                    p.start as u32,
                    vec![problem.halls[p.hall].label()],
                ))
            })
            .collect();

        let status = if soft == 0 {
            SolveStatus::Optimal
        } else {
            SolveStatus::Feasible
        };
        SolverOutput::new(status, assignments)
    }
}

// Modules without a department are never grouped.
fn clashes(a: &Module, b: &Module) -> bool {
    if a.department().is_empty() || b.department().is_empty() {
        return false;
    }
    if a.semester() != b.semester() {
        return false;
    }
    if a.is_common() || b.is_common() {
        return true;
    }
    a.department() == b.department()
}

#[cfg(test)]
mod tests {
    use examforge_core::{Day, Hall, ModuleRecord};
    use examforge_test::{common_module, days, hall, module};

    use super::*;

    fn problem(modules: Vec<Module>, halls: Vec<Hall>, day_count: usize, slots: u32) -> SubProblem {
        SubProblem::new("test", modules, halls, days(day_count), slots)
    }

    fn solve(problem: &SubProblem) -> SolverOutput {
        FirstFitEngine::new()
            .solve(problem, &CancelToken::new())
            .unwrap()
    }

    fn placed<'a>(output: &'a SolverOutput, code: &str) -> &'a Assignment {
        output
            .assignments
            .iter()
            .find(|a| a.module_code == code)
            .unwrap()
    }

    #[test]
    fn test_empty_problem_is_optimal() {
        let output = solve(&problem(vec![], vec![hall("LR1", 10)], 1, 1));
        assert_eq!(output.status, SolveStatus::Optimal);
        assert!(output.assignments.is_empty());
    }

    #[test]
    fn test_smallest_fitting_hall_is_taken() {
        let modules = vec![module("CE1101", "CE", 1, 40), module("IS1101", "IS", 1, 100)];
        let halls = vec![hall("BIG", 120), hall("SMALL", 50)];
        let output = solve(&problem(modules, halls, 1, 1));

        assert_eq!(output.status, SolveStatus::Optimal);
        assert_eq!(placed(&output, "IS1101").halls, ["BIG-120"]);
        assert_eq!(placed(&output, "CE1101").halls, ["SMALL-50"]);
    }

    #[test]
    fn test_assignments_follow_input_order() {
        let modules = vec![module("A", "CE", 1, 10), module("B", "CE", 2, 90)];
        let output = solve(&problem(modules, vec![hall("LR1", 100)], 2, 1));
        let codes: Vec<_> = output.assignments.iter().map(|a| a.module_code.as_str()).collect();
        assert_eq!(codes, ["A", "B"]);
    }

    #[test]
    fn test_same_department_semester_needs_separate_slots() {
        let modules = vec![module("CE1101", "CE", 1, 10), module("CE1102", "CE", 1, 10)];
        let halls = vec![hall("LR1", 50), hall("LR2", 50)];

        let output = solve(&problem(modules.clone(), halls.clone(), 1, 2));
        assert_eq!(output.status, SolveStatus::Optimal);
        assert_ne!(placed(&output, "CE1101").slot, placed(&output, "CE1102").slot);

        let output = solve(&problem(modules, halls, 1, 1));
        assert_eq!(output.status, SolveStatus::Infeasible);
        assert!(output.assignments.is_empty());
    }

    #[test]
    fn test_common_module_avoids_its_semester() {
        let modules = vec![
            common_module("MA1101", "MA", 1, 300),
            module("CE1101", "CE", 1, 10),
            module("EE3101", "EE", 3, 10),
        ];
        let halls = vec![hall("LR1", 550), hall("AUD", 200)];
        let output = solve(&problem(modules, halls, 1, 2));

        let common = placed(&output, "MA1101");
        assert_ne!(common.slot, placed(&output, "CE1101").slot);
        assert_eq!(common.slot, placed(&output, "EE3101").slot);
    }

    #[test]
    fn test_unavoidable_soft_overlap_is_feasible() {
        let modules = vec![module("CE1101", "CE", 1, 10), module("CE2101", "CE", 2, 10)];
        let halls = vec![hall("LR1", 50), hall("LR2", 50)];

        assert_eq!(
            solve(&problem(modules.clone(), halls.clone(), 1, 1)).status,
            SolveStatus::Feasible
        );
        assert_eq!(solve(&problem(modules, halls, 1, 2)).status, SolveStatus::Optimal);
    }

    #[test]
    fn test_multi_slot_exam_blocks_its_hall() {
        let long = ModuleRecord::new("CE1101", "CE", 1, 10)
            .duration(2)
            .build()
            .unwrap();
        let modules = vec![long, module("IS1101", "IS", 1, 10)];

        let output = solve(&problem(modules.clone(), vec![hall("LR1", 50)], 1, 2));
        assert_eq!(output.status, SolveStatus::Infeasible);

        let output = solve(&problem(modules, vec![hall("LR1", 50)], 2, 2));
        assert_eq!(placed(&output, "CE1101").day, Day::new("day1"));
        assert_eq!(placed(&output, "IS1101").day, Day::new("day2"));
    }

    #[test]
    fn test_no_fitting_hall_is_infeasible() {
        let output = solve(&problem(vec![module("A", "CE", 1, 60)], vec![hall("LR1", 50)], 3, 3));
        assert_eq!(output.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_exhausted_node_budget_is_infeasible() {
        let engine = FirstFitEngine::new().with_node_limit(Some(0));
        let output = engine
            .solve(
                &problem(vec![module("A", "CE", 1, 10)], vec![hall("LR1", 50)], 1, 1),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(output.status, SolveStatus::Infeasible);
    }

    #[test]
    fn test_cancelled_token_stops_search() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = FirstFitEngine::new().solve(
            &problem(vec![module("A", "CE", 1, 10)], vec![hall("LR1", 50)], 1, 1),
            &cancel,
        );
        assert_eq!(result, Err(EngineError::Cancelled));
    }

    #[test]
    fn test_from_config_copies_limits() {
        let config = EngineConfig {
            node_limit: None,
            seconds_spent_limit: Some(3),
        };
        let engine = FirstFitEngine::from_config(&config);
        assert_eq!(engine.node_limit(), None);
        assert_eq!(engine.time_limit(), Some(Duration::from_secs(3)));
    }
}
