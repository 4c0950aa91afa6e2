use std::sync::Arc;

use examforge::{
    compare, BandConfig, DaySlicing, FirstFitEngine, MarkdownReport, Planner, PlannerConfig,
    SolveStatus, SolverEngine, ViolationKind,
};
use examforge_test::{catalog, days, hall, module, PanickingEngine};

fn two_bands(slicing: DaySlicing) -> PlannerConfig {
    PlannerConfig::default()
        .with_bands(vec![
            BandConfig::new("lower", vec![1, 2]),
            BandConfig::new("upper", vec![3, 4]),
        ])
        .with_day_slicing(slicing)
}

#[test]
fn test_decomposition_succeeds_where_naive_fails() {
    // Three CE semester-1 exams need three (day, slot) pairs; there are two.
    let cat = catalog(
        vec![
            module("CE1101", "CE", 1, 60),
            module("CE1102", "CE", 1, 60),
            module("CE1103", "CE", 1, 60),
            module("CE3101", "CE", 3, 60),
        ],
        vec![hall("LR1", 100), hall("LR2", 100)],
        days(2),
        1,
    );
    let config = two_bands(DaySlicing::Disjoint).with_size_steps(vec![4]);

    let report = compare(&cat, &config).unwrap();
    let size = &report.sizes[0];

    assert_eq!(size.naive.status, SolveStatus::Infeasible);
    assert_eq!(size.intelligent.status, SolveStatus::Feasible);
    assert_eq!(report.summary.decomposition_wins, vec![4]);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["sizes"][0]["intelligent"]["status"], "FEASIBLE");
    assert_eq!(json["sizes"][0]["naive"]["status"], "INFEASIBLE");

    let md = MarkdownReport::new(&report).to_string();
    assert!(md.contains("- 4 modules: intelligent solved, naive INFEASIBLE"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let cat = catalog(vec![module("CE1101", "CE", 1, 10)], vec![hall("LR1", 50)], days(2), 1);
    let config = PlannerConfig::default().with_bands(vec![]);
    assert!(matches!(
        compare(&cat, &config),
        Err(examforge::ExamForgeError::Config(_))
    ));
}

#[test]
fn test_planner_rejects_semester_in_two_bands() {
    let config = PlannerConfig::default().with_bands(vec![
        BandConfig::new("a", vec![1]),
        BandConfig::new("b", vec![1, 3]),
    ]);

    assert!(matches!(
        Planner::new(config.clone()),
        Err(examforge::ExamForgeError::Config(_))
    ));
    assert!(matches!(
        Planner::with_engine(config, Arc::new(FirstFitEngine::new())),
        Err(examforge::ExamForgeError::Config(_))
    ));
}

#[test]
fn test_planner_rejects_zero_partition_timeout() {
    let config = PlannerConfig::default().with_partition_timeout_secs(0);
    assert!(Planner::new(config).is_err());
}

#[test]
fn test_overlapping_days_can_collide_after_merge() {
    // With one shared day, both bands may pick day2 in the single hall.
    let cat = catalog(
        vec![
            module("CE1101", "CE", 1, 10),
            module("CE1102", "CE", 1, 10),
            module("EE3101", "EE", 3, 10),
        ],
        vec![hall("LR1", 50)],
        days(3),
        1,
    );

    let planner =
        Planner::new(two_bands(DaySlicing::Overlapping { overlap_days: 1 })).unwrap();
    let solve = planner.solve_decomposed(&cat);
    assert_eq!(solve.groups[0].assigned_days, days(2));
    assert_eq!(solve.groups[1].assigned_days, days(3)[1..].to_vec());
    assert_eq!(solve.solved_count(), 2);

    let report = planner.evaluate(&solve.timetable, &cat);
    assert!(!report.feasible);
    assert!(report
        .hard_violations
        .iter()
        .any(|v| v.kind == ViolationKind::HallConflict));

    let disjoint = Planner::new(two_bands(DaySlicing::Disjoint)).unwrap();
    let solve = disjoint.solve_decomposed(&cat);
    let report = disjoint.evaluate(&solve.timetable, &cat);
    assert_eq!(report.hard_violation_count, 0);
}

#[test]
fn test_panicking_partition_keeps_other_bands() {
    let cat = catalog(
        vec![module("CE1101", "CE", 1, 10), module("CE3101", "CE", 3, 10)],
        vec![hall("LR1", 50)],
        days(4),
        1,
    );
    let planner = Planner::with_engine(
        two_bands(DaySlicing::Disjoint),
        Arc::new(PanickingEngine::on("lower")),
    )
    .unwrap();

    let solve = planner.solve_decomposed(&cat);
    assert_eq!(solve.timetable.status, SolveStatus::Feasible);
    assert_eq!(solve.timetable.entries[0].module_code, "CE3101");

    let report = planner.evaluate(&solve.timetable, &cat);
    assert_eq!(report.hard_violation_count, 1);
    assert!(report.hard_violations[0].involves("CE1101"));
}

#[test]
fn test_default_planner_uses_first_fit() {
    let planner = Planner::default();
    assert_eq!(planner.engine().name(), FirstFitEngine::new().name());
    assert_eq!(planner.config().bands.len(), 3);
}
