use examforge::{
    evaluate, extract_hall_name, AccuracyScorer, Catalog, Planner, PlannerConfig, SolveStatus,
    Timetable, UtilizationAnalyzer, ViolationKind,
};
use examforge_test::{catalog, common_module, days, entry, hall, module, placed, timetable};

const CATALOG_JSON: &str = r#"{
    "modules": [
        {"code": "CE1101", "name": "Programming", "department": "CE", "semester": 1, "number_of_students": 120},
        {"code": "IS1402", "name": "Mathematics", "department": "IS", "semester": 1, "number_of_students": 400, "iscommon": true},
        {"code": "CE3101", "department": "CE", "semester": 3, "students": 90, "duration": 2}
    ],
    "halls": [
        {"name": "LR1", "capacity": 550},
        {"hall": "AUD", "capacity": 200}
    ],
    "days": ["day1", "day2", "day3"],
    "slots_per_day": 2
}"#;

#[test]
fn test_hall_names_are_extracted_from_labels() {
    assert_eq!(extract_hall_name("LR1-550"), "LR1");
    assert_eq!(extract_hall_name("AUD-200"), "AUD");
    assert_eq!(extract_hall_name("Room42"), "Room42");
}

#[test]
fn test_accuracy_examples() {
    let scorer = AccuracyScorer::default();
    assert_eq!(scorer.score(0, 0), 100);
    assert_eq!(scorer.score(11, 0), 0);
    assert_eq!(scorer.score(3, 4), 66);
}

#[test]
fn test_utilization_of_three_occupied_triples() {
    let tt = timetable(vec![
        entry("A", "CE", 1, "day1", 0, &["LR1-100"]),
        entry("B", "CE", 2, "day1", 1, &["LR1-100"]),
        entry("C", "EE", 1, "day2", 0, &["AUD-50"]),
    ]);
    let utilization = UtilizationAnalyzer::new().analyze(
        &tt,
        &[hall("LR1", 100), hall("AUD", 50)],
        &days(2),
        2,
    );
    assert_eq!(utilization.percent, 37.5);
}

#[test]
fn test_common_module_conflict_example() {
    let common = common_module("IS1402", "IS", 1, 300);
    let dept = module("CE1101", "CE", 1, 100);
    let cat = catalog(
        vec![common.clone(), dept.clone()],
        vec![hall("LR1", 550), hall("AUD", 200)],
        days(5),
        2,
    );
    let tt = timetable(vec![
        placed(&common, "day3", 0, &["LR1-550"]),
        placed(&dept, "day3", 0, &["AUD-200"]),
    ]);

    let report = evaluate(&tt, &cat);
    let common_conflicts: Vec<_> = report
        .hard_violations
        .iter()
        .filter(|v| v.kind == ViolationKind::CommonModuleConflict)
        .collect();
    assert_eq!(common_conflicts.len(), 1);
    assert!(common_conflicts[0].involves("IS1402"));
    assert!(common_conflicts[0].involves("CE1101"));
    assert!(report
        .hard_violations
        .iter()
        .all(|v| v.kind != ViolationKind::DeptSemesterConflict));
}

#[test]
fn test_precondition_filter_examples() {
    let long = examforge::ModuleRecord::new("CE1101", "CE", 1, 10)
        .duration(3)
        .build()
        .unwrap();
    let crowd = module("IS1101", "IS", 1, 600);
    let fine = module("EE1101", "EE", 1, 100);
    let cat = catalog(vec![long, crowd, fine], vec![hall("LR1", 550)], days(6), 2);

    let planner = Planner::default();
    let filtered = planner.filter(&cat);
    assert_eq!(filtered.excluded_count(), 2);

    let solve = planner.solve_decomposed(&cat);
    let solved: Vec<_> = solve
        .timetable
        .entries
        .iter()
        .map(|e| e.module_code.as_str())
        .collect();
    assert_eq!(solved, ["EE1101"]);
    assert!(solve.groups.iter().all(|g| g.module_count == 1));
}

#[test]
fn test_json_catalog_and_timetable_evaluate() {
    let cat = Catalog::from_json_str(CATALOG_JSON).unwrap();
    assert_eq!(cat.modules()[2].duration(), 2);
    assert!(cat.modules()[1].is_common());

    let tt: Timetable = serde_json::from_str(
        r#"{
            "status": "FEASIBLE",
            "timetable": [
                {"code": "CE1101", "day": "day1", "slot": 0, "halls": ["AUD-200"],
                 "students": 120, "department": "CE", "semester": 1},
                {"code": "IS1402", "day": "day2", "slot": 0, "halls": ["LR1-550"],
                 "students": 400, "department": "IS", "semester": 1, "iscommon": true},
                {"code": "CE3101", "day": "day1", "slot": 0, "halls": ["LR1-550"],
                 "students": 90, "department": "CE", "semester": 3}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(tt.status, SolveStatus::Feasible);

    let report = evaluate(&tt, &cat);
    assert!(report.feasible);
    assert_eq!(report.soft_violation_count, 1);
    assert_eq!(report.accuracy_score, 99);
    assert_eq!(report.total_exams_scheduled, 3);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["soft_violations"][0]["kind"], "SoftDeptOverlap");
    assert_eq!(json["day_load_distribution"].as_object().unwrap().len(), 3);
    assert_eq!(json["day_load_distribution"]["day1"], 2);
    assert_eq!(json["day_load_distribution"]["day3"], 0);
}

#[test]
fn test_invalid_catalogs_are_rejected_before_solving() {
    let no_halls = CATALOG_JSON.replace(
        r#"{"name": "LR1", "capacity": 550},
        {"hall": "AUD", "capacity": 200}"#,
        "",
    );
    assert_ne!(no_halls, CATALOG_JSON);
    assert!(Catalog::from_json_str(&no_halls).is_err());

    let zero_slots = CATALOG_JSON.replace(r#""slots_per_day": 2"#, r#""slots_per_day": 0"#);
    assert!(Catalog::from_json_str(&zero_slots).is_err());

    let semester_zero = CATALOG_JSON.replace(r#""semester": 3"#, r#""semester": 0"#);
    assert!(Catalog::from_json_str(&semester_zero).is_err());
}

#[test]
fn test_load_catalog_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Planner::load_catalog(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, examforge::ExamForgeError::Io { .. }));
}

#[test]
fn test_load_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, CATALOG_JSON).unwrap();
    let cat = Planner::load_catalog(&path).unwrap();

    assert_eq!(cat.modules().len(), 3);
    assert_eq!(cat.slot_capacity(), 6);
}

#[test]
fn test_planner_from_yaml_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.yaml");
    std::fs::write(
        &path,
        "bands:\n  - name: all\n    semesters: [1, 2, 3, 4, 5, 6, 7, 8]\n",
    )
    .unwrap();

    let planner = Planner::from_config_file(&path).unwrap();
    assert_eq!(planner.config().bands.len(), 1);

    let bad = dir.path().join("bad.yml");
    std::fs::write(&bad, "bands: []\n").unwrap();
    assert!(matches!(
        Planner::from_config_file(&bad),
        Err(examforge::ExamForgeError::Config(_))
    ));
}

#[test]
fn test_naive_and_decomposed_agree_on_easy_catalog() {
    let cat = Catalog::from_json_str(CATALOG_JSON).unwrap();
    let planner = Planner::new(PlannerConfig::default()).unwrap();

    let naive = planner.solve_naive(&cat);
    assert!(naive.status.is_solved());
    assert!(planner.evaluate(&naive, &cat).feasible);

    let decomposed = planner.solve_decomposed(&cat);
    assert_eq!(decomposed.timetable.len(), 3);
    assert!(planner.evaluate(&decomposed.timetable, &cat).feasible);
}
