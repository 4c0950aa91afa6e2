use examforge::{
    AccuracyScorer, ConstraintValidator, Day, Module, ModuleRecord, Planner, PlannerConfig,
    TimetableEntry,
};
use examforge_test::{catalog, days, hall, placed, timetable};
use proptest::prelude::*;

const DEPARTMENTS: [&str; 3] = ["CE", "EE", "IS"];

fn modules_strategy(max: usize) -> impl Strategy<Value = Vec<Module>> {
    prop::collection::vec((0usize..3, 1u32..=7, 1u32..=120, any::<bool>()), 1..max).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (dept, semester, students, common))| {
                    let dept = DEPARTMENTS[dept];
                    ModuleRecord::new(format!("{dept}{semester}{i:03}"), dept, semester, students)
                        .common(common && i % 4 == 0)
                        .build()
                        .unwrap()
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // One module per (day, slot) cell rules out every hard conflict.
    #[test]
    fn prop_one_module_per_cell_has_no_hard_violations(modules in modules_strategy(12)) {
        let grid = days(4);
        let cat = catalog(modules.clone(), vec![hall("LR1", 200), hall("AUD", 150)], grid, 3);
        let entries: Vec<TimetableEntry> = modules
            .iter()
            .enumerate()
            .map(|(i, m)| placed(m, &format!("day{}", i / 3 + 1), (i % 3) as u32, &["LR1-200"]))
            .collect();

        let outcome = ConstraintValidator::new().validate(&timetable(entries), &cat);
        prop_assert!(outcome.is_feasible(), "{:?}", outcome.hard);
        prop_assert_eq!(outcome.soft_count(), 0);
    }

    #[test]
    fn prop_validation_is_idempotent(
        modules in modules_strategy(10),
        cells in prop::collection::vec((0usize..2, 0u32..2, any::<bool>()), 10),
    ) {
        let cat = catalog(modules.clone(), vec![hall("LR1", 100)], days(2), 2);
        let entries: Vec<TimetableEntry> = modules
            .iter()
            .zip(&cells)
            .map(|(m, &(day, slot, big))| {
                let label = if big { "LR1-100" } else { "Room42" };
                placed(m, Day::sequence(2)[day].as_str(), slot, &[label])
            })
            .collect();
        let tt = timetable(entries);

        let validator = ConstraintValidator::new();
        let first = validator.validate(&tt, &cat);
        let second = validator.validate(&tt, &cat);
        prop_assert_eq!(&first, &second);

        let scorer = AccuracyScorer::default();
        let score = scorer.score(first.hard_count(), first.soft_count());
        prop_assert!(score <= 100);
    }

    // Disjoint bands cannot collide, so a fully solved decomposition is
    // globally feasible.
    #[test]
    fn prop_solved_disjoint_decomposition_is_feasible(modules in modules_strategy(16)) {
        let cat = catalog(modules, vec![hall("LR1", 200), hall("AUD", 150)], days(6), 2);
        let planner = Planner::new(PlannerConfig::default()).unwrap();

        let solve = planner.solve_decomposed(&cat);
        let report = planner.evaluate(&solve.timetable, &cat);
        if solve.groups.iter().all(|g| g.status.is_solved()) {
            prop_assert!(report.feasible, "{:?}", report.hard_violations);
        }
        prop_assert_eq!(report.total_exams_scheduled, solve.timetable.len());
    }
}
